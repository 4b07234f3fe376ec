//! Host port
//!
//! The emulated CPU writes the PSG through I/O ports. Before each write the
//! host usually renders the audio produced so far (so the write lands at the
//! right sample) and may record the raw byte to a trace file. [`PsgPort`]
//! ties a chip to the host collaborator providing those hooks.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use sn76489::{PsgHost, PsgPort, Sn76489, WaveformStore};
//!
//! #[derive(Default)]
//! struct Renderer {
//!     pending: usize,
//!     out: Vec<[i32; 2]>,
//! }
//!
//! impl PsgHost for Renderer {
//!     fn flush(&mut self, chip: &mut Sn76489) {
//!         for _ in 0..std::mem::take(&mut self.pending) {
//!             let mut frame = [0; 2];
//!             chip.mix_into(&mut frame);
//!             self.out.push(frame);
//!         }
//!     }
//! }
//!
//! let chip = Sn76489::new(Arc::new(WaveformStore::squares()));
//! let mut port = PsgPort::new(chip, Renderer::default());
//! port.host_mut().pending = 100;
//! port.write(0x90);
//! assert_eq!(port.host().out.len(), 100);
//! ```

use crate::sn76489::Sn76489;

/// Collaborator hooks invoked around every port write
///
/// All methods default to no-ops.
pub trait PsgHost {
    /// Render pending audio up to the current emulated time
    ///
    /// Called before the write is applied, with the chip still in its old
    /// state.
    fn flush(&mut self, chip: &mut Sn76489) {
        let _ = chip;
    }

    /// Raw byte written to the tone/volume port
    fn trace_register(&mut self, byte: u8) {
        let _ = byte;
    }

    /// Raw byte written to the stereo port
    fn trace_stereo(&mut self, byte: u8) {
        let _ = byte;
    }
}

/// Host without hooks
impl PsgHost for () {}

/// A chip plus its host collaborator
#[derive(Debug, Clone)]
pub struct PsgPort<H> {
    chip: Sn76489,
    host: H,
}

impl<H: PsgHost> PsgPort<H> {
    /// Attach a host to a chip
    pub fn new(chip: Sn76489, host: H) -> Self {
        Self { chip, host }
    }

    /// Write to the tone/volume port: flush, trace, then apply
    pub fn write(&mut self, byte: u8) {
        self.host.flush(&mut self.chip);
        self.host.trace_register(byte);
        self.chip.write_register(byte);
    }

    /// Write to the stereo port: flush, trace, then apply
    pub fn write_stereo(&mut self, byte: u8) {
        self.host.flush(&mut self.chip);
        self.host.trace_stereo(byte);
        self.chip.write_stereo(byte);
    }

    /// The chip
    pub fn chip(&self) -> &Sn76489 {
        &self.chip
    }

    /// The chip, mutably (for ticking outside of writes)
    pub fn chip_mut(&mut self) -> &mut Sn76489 {
        &mut self.chip
    }

    /// The host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Split back into chip and host
    pub fn into_parts(self) -> (Sn76489, H) {
        (self.chip, self.host)
    }
}

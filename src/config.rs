//! Chip configuration
//!
//! Host-supplied parameters fixed at initialization: output sample rate,
//! chip clock and whether the stereo enhancement echo is applied.

use crate::sn76489::constants::{clock_increment, DEFAULT_CHIP_CLOCK, DEFAULT_SAMPLE_RATE};
use crate::{Result, Sn76489Error};
use serde::{Deserialize, Serialize};

/// Largest chip clock whose `<< 5` fixed-point scale fits in an `i32`
pub const MAX_CHIP_CLOCK: u32 = (i32::MAX >> 5) as u32;

/// Largest clock step per sample; the fastest noise rate is this `<< 3`
pub const MAX_CLOCK_STEP: i32 = i32::MAX >> 3;

/// PSG configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsgConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Chip input clock in Hz
    pub clock_hz: u32,
    /// Apply the echo enhancement to channels 0 and 1
    pub enhance: bool,
}

impl PsgConfig {
    /// Configuration for a given output rate, NTSC clock, no enhancement
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    /// Set the chip clock
    pub fn with_clock(mut self, clock_hz: u32) -> Self {
        self.clock_hz = clock_hz;
        self
    }

    /// Enable or disable the echo enhancement
    pub fn with_enhance(mut self, enhance: bool) -> Self {
        self.enhance = enhance;
        self
    }

    /// Check that the fixed-point clock scale is representable
    ///
    /// # Errors
    ///
    /// Returns [`Sn76489Error::ConfigError`] for a zero sample rate, a
    /// chip clock above [`MAX_CHIP_CLOCK`], or a clock/rate ratio whose
    /// per-sample step exceeds [`MAX_CLOCK_STEP`].
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(Sn76489Error::ConfigError(
                "sample rate must be non-zero".to_string(),
            ));
        }
        if self.clock_hz > MAX_CHIP_CLOCK {
            return Err(Sn76489Error::ConfigError(format!(
                "chip clock {} Hz exceeds {} Hz",
                self.clock_hz, MAX_CHIP_CLOCK
            )));
        }
        let step = clock_increment(self.clock_hz, self.sample_rate);
        if step > MAX_CLOCK_STEP {
            return Err(Sn76489Error::ConfigError(format!(
                "chip clock {} Hz too fast for {} Hz output (step {} > {})",
                self.clock_hz, self.sample_rate, step, MAX_CLOCK_STEP
            )));
        }
        Ok(())
    }
}

impl Default for PsgConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            clock_hz: DEFAULT_CHIP_CLOCK,
            enhance: false,
        }
    }
}

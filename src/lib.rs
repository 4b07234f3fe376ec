//! SN76489 PSG Emulator for Sega 8-bit consoles
//!
//! A sample-exact emulation of the Texas Instruments SN76489 Programmable
//! Sound Generator as integrated into the Sega Master System and Game Gear.
//! Reproduces the register protocol, noise feedback and Game Gear stereo
//! quirks so that software driving the real chip gets identical audio.
//!
//! # Features
//! - Byte-level register protocol decoding (latch and data bytes)
//! - Sampled-waveform tone channels driven from a shared waveform store
//! - 17-bit LFSR noise with periodic and white feedback
//! - Game Gear stereo register with quarter-level attenuation
//! - Optional echo enhancement on channels 0 and 1
//! - Register bank snapshots for save states
//!
//! # Crate feature flags
//! - `export-wav` (opt-in): Render chip output to WAV files (`export`)
//!
//! # Quick start
//! ```
//! use std::sync::Arc;
//! use sn76489::{Sn76489, WaveformStore};
//!
//! let mut chip = Sn76489::new(Arc::new(WaveformStore::squares()));
//! chip.write_register(0x90); // Channel 0 loudest
//! chip.write_register(0x8E); // Channel 0 period low
//! chip.write_register(0x0F); // Channel 0 period high
//!
//! let mut total = [0i32; 2];
//! chip.mix_into(&mut total);
//! ```
//!
//! # Host integration
//! Wrap the chip in a [`PsgPort`] to get the flush and trace hooks around
//! every write. See the [`host`] module.

#![warn(missing_docs)]

// Domain modules
pub mod config; // Host-supplied parameters
pub mod host; // Port wrapper and collaborator hooks
pub mod sn76489; // SN76489 PSG Emulation (core)
pub mod waveform; // Tone waveform assets

#[cfg(feature = "export-wav")]
pub mod export; // WAV rendering

/// Error types for SN76489 emulator operations
///
/// Register writes and sample generation never fail; errors only come from
/// setting the chip up.
#[derive(thiserror::Error, Debug)]
pub enum Sn76489Error {
    /// Waveform data violates the playback bounds
    #[error("Invalid waveform: {0}")]
    InvalidWaveform(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for Sn76489Error {
    /// Converts a String into `Sn76489Error::Other`.
    ///
    /// Prefer the specific variants where the failure has a known cause.
    fn from(msg: String) -> Self {
        Sn76489Error::Other(msg)
    }
}

impl From<&str> for Sn76489Error {
    /// Converts a string slice into `Sn76489Error::Other`.
    fn from(msg: &str) -> Self {
        Sn76489Error::Other(msg.to_string())
    }
}

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, Sn76489Error>;

// Public API exports
pub use config::PsgConfig;
pub use host::{PsgHost, PsgPort};
pub use sn76489::{RegisterBank, Sn76489, StereoMask};
pub use waveform::{Waveform, WaveformId, WaveformStore};

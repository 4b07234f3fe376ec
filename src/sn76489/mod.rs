//! SN76489 PSG Emulation Domain
//!
//! Core Texas Instruments SN76489 Programmable Sound Generator emulation as
//! found in the Sega Master System and Game Gear, including the register
//! protocol, waveform playback, noise synthesis and stereo mixing.

// Internal modules
pub mod channel;
pub mod chip;
pub mod constants;
pub mod decoder;
pub mod echo;
pub mod mixer;
pub mod noise;
pub mod registers;

// Re-export public API
pub use channel::ChannelState;
pub use chip::Sn76489;
pub use constants::scaled_volume;
pub use decoder::{decode, RegisterWrite};
pub use mixer::{Pan, StereoMask};
pub use noise::NoiseGenerator;
pub use registers::{LatchState, Register, RegisterBank};

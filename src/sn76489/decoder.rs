//! Register write protocol decoder
//!
//! The chip is programmed one byte at a time:
//!
//! | Byte       | Meaning                                           |
//! |------------|---------------------------------------------------|
//! | `1cc1vvvv` | latch channel `cc` volume, set volume             |
//! | `1cc0pppp` | latch channel `cc` period, set low 4 period bits  |
//! | `0---vvvv` | after a volume latch: set volume                  |
//! | `0-PPPPPP` | after a period latch: set high 6 period bits      |
//!
//! Volume nibbles are attenuation on the wire; they are inverted here so the
//! decoded value is loudness.

use super::registers::{LatchState, Register};

/// A decoded register update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterWrite {
    /// Set channel loudness (0-15, 15 = loudest)
    Volume {
        /// Target channel
        channel: usize,
        /// Loudness value
        loudness: u8,
    },
    /// Replace the low four period bits
    PeriodLow {
        /// Target channel
        channel: usize,
        /// Low nibble
        bits: u8,
    },
    /// Replace the high six period bits
    PeriodHigh {
        /// Target channel
        channel: usize,
        /// High six bits (unshifted)
        bits: u8,
    },
}

impl RegisterWrite {
    /// Register touched by this write
    pub fn register(&self) -> Register {
        match *self {
            RegisterWrite::Volume { channel, .. } => Register::Volume(channel),
            RegisterWrite::PeriodLow { channel, .. } | RegisterWrite::PeriodHigh { channel, .. } => {
                if channel == 3 {
                    Register::NoiseControl
                } else {
                    Register::Tone(channel)
                }
            }
        }
    }
}

/// Decode one protocol byte
///
/// # Arguments
/// * `byte` - Raw byte written to the PSG port
/// * `latch` - Latch state left by the previous latch byte
///
/// # Returns
/// The register update and the latch state to use for the next byte.
/// Data bytes leave the latch state unchanged.
pub fn decode(byte: u8, latch: LatchState) -> (RegisterWrite, LatchState) {
    match byte & 0x90 {
        0x90 => {
            let next = LatchState::from_latch(byte);
            let write = RegisterWrite::Volume {
                channel: next.channel(),
                loudness: !byte & 0x0f,
            };
            (write, next)
        }
        0x80 => {
            let next = LatchState::from_latch(byte);
            let write = RegisterWrite::PeriodLow {
                channel: next.channel(),
                bits: byte & 0x0f,
            };
            (write, next)
        }
        _ => {
            let write = match latch {
                LatchState::Volume(channel) => RegisterWrite::Volume {
                    channel,
                    loudness: !byte & 0x0f,
                },
                LatchState::Period(channel) => RegisterWrite::PeriodHigh {
                    channel,
                    bits: byte & 0x3f,
                },
            };
            (write, latch)
        }
    }
}

//! SN76489 Register Definitions
//!
//! The chip has eight internal registers: a 4-bit volume and a 10-bit
//! tone period for each of the four channels (channel 3's "period" holds the
//! noise control bits). The Game Gear adds a separate 8-bit stereo register.

use super::constants::NUM_CHANNELS;
use super::mixer::StereoMask;
use serde::{Deserialize, Serialize};
use std::fmt;

/// SN76489 register, addressed by channel and register type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// Tone period of channel 0-2
    Tone(usize),
    /// Noise control (period register of channel 3)
    NoiseControl,
    /// Volume of channel 0-3
    Volume(usize),
}

impl Register {
    /// Decode the register selected by a latch byte (`1cct....`)
    pub fn from_latch(byte: u8) -> Self {
        let channel = ((byte >> 5) & 0x03) as usize;
        if byte & 0x10 != 0 {
            Register::Volume(channel)
        } else if channel == 3 {
            Register::NoiseControl
        } else {
            Register::Tone(channel)
        }
    }

    /// Channel this register belongs to
    pub fn channel(&self) -> usize {
        match *self {
            Register::Tone(c) | Register::Volume(c) => c,
            Register::NoiseControl => 3,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::Tone(c) => write!(f, "Tone {c} Period"),
            Register::NoiseControl => write!(f, "Noise Control"),
            Register::Volume(c) => write!(f, "Channel {c} Volume"),
        }
    }
}

/// Protocol state left behind by the last latch byte
///
/// Data bytes (high bit clear) carry no address; they continue whichever
/// register the previous latch byte selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LatchState {
    /// Next data byte sets the volume of this channel
    Volume(usize),
    /// Next data byte sets the high six period bits of this channel
    Period(usize),
}

impl LatchState {
    /// Latch state selected by a latch byte
    pub fn from_latch(byte: u8) -> Self {
        let channel = ((byte >> 5) & 0x03) as usize;
        if byte & 0x10 != 0 {
            LatchState::Volume(channel)
        } else {
            LatchState::Period(channel)
        }
    }

    /// Channel the latch points at
    pub fn channel(&self) -> usize {
        match *self {
            LatchState::Volume(c) | LatchState::Period(c) => c,
        }
    }

    /// Same latch with the channel folded into 0-3, as the wire masks it
    pub fn masked(self) -> Self {
        match self {
            LatchState::Volume(c) => LatchState::Volume(c & 0x03),
            LatchState::Period(c) => LatchState::Period(c & 0x03),
        }
    }
}

impl Default for LatchState {
    /// Power-on state: an all-zero latch byte (period of channel 0)
    fn default() -> Self {
        LatchState::Period(0)
    }
}

/// Programmable chip state
///
/// Volumes are stored as loudness (the wire value inverted), so 15 is the
/// loudest setting and 0 is silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegisterBank {
    /// Loudness per channel (0-15)
    pub volume: [u8; NUM_CHANNELS],
    /// Period per channel (10-bit through the write protocol)
    pub period: [u16; NUM_CHANNELS],
    /// Register selected by the last latch byte
    pub latch: LatchState,
    /// Stereo mask, stored inverted from the wire value
    pub stereo: u8,
}

impl RegisterBank {
    /// Create a register bank in power-on state
    pub fn new() -> Self {
        Self::default()
    }

    /// Stereo mask as flags
    pub fn stereo_mask(&self) -> StereoMask {
        StereoMask::from_bits_retain(self.stereo)
    }

    /// Fold restored fields back into their register widths
    ///
    /// A bank restored from outside (a save state) may hold a latch channel
    /// or loudness the write protocol could never produce.
    pub fn clamped(mut self) -> Self {
        self.latch = self.latch.masked();
        for volume in &mut self.volume {
            *volume &= 0x0f;
        }
        self
    }

    /// Noise control bits (period register of channel 3)
    #[inline]
    pub fn noise_control(&self) -> u16 {
        self.period[3]
    }

    /// Replace the low four period bits, keeping the high bits
    #[inline]
    pub fn set_period_low(&mut self, channel: usize, bits: u8) {
        self.period[channel] = (self.period[channel] & 0xff0) | (bits & 0x0f) as u16;
    }

    /// Replace the high six period bits, keeping the low bits
    #[inline]
    pub fn set_period_high(&mut self, channel: usize, bits: u8) {
        self.period[channel] = (self.period[channel] & 0x00f) | (((bits & 0x3f) as u16) << 4);
    }
}

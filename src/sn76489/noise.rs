//! Noise generator
//!
//! A 17-bit shift register clocked from a 22.10 phase accumulator. The
//! feedback bit is written into bit 16 before each shift, so the register
//! behaves as a 16-bit LFSR once seeded:
//! - periodic mode (control bit 2 clear): bit 0 only, the seed rotates
//!   through 16 positions
//! - white mode (control bit 2 set): bit 0 XOR bit 3

use super::constants::PHASE_ONE;

/// LFSR seed after power-on and after every noise control latch write
pub const NOISE_SEED: u32 = 1;

/// Noise control bit selecting the two-tap (white) feedback
pub const WHITE_NOISE: u16 = 0x04;

/// Noise control rate value that follows channel 2's period
const RATE_FROM_TONE2: u16 = 0x03;

/// Noise generator state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoiseGenerator {
    /// 17-bit LFSR, bit 0 is the current output
    lfsr: u32,
    /// Phase accumulator, one shift per [`PHASE_ONE`]
    phase: i32,
}

impl NoiseGenerator {
    /// Create a new noise generator
    pub fn new() -> Self {
        Self {
            lfsr: NOISE_SEED,
            phase: 0,
        }
    }

    /// Restore the LFSR seed (phase is kept)
    #[inline]
    pub fn reseed(&mut self) {
        self.lfsr = NOISE_SEED;
    }

    /// Restart the phase accumulator
    #[inline]
    pub fn reset_phase(&mut self) {
        self.phase = 0;
    }

    /// Current output bit
    #[inline]
    pub fn output(&self) -> bool {
        self.lfsr & 1 != 0
    }

    /// Raw LFSR value
    #[inline]
    pub fn lfsr(&self) -> u32 {
        self.lfsr
    }

    /// Current phase accumulator value
    #[inline]
    pub fn phase(&self) -> i32 {
        self.phase
    }

    /// Phase step per output sample
    ///
    /// # Arguments
    /// * `control` - Noise control register (period of channel 3)
    /// * `tone2_period` - Period register of channel 2
    /// * `clock_increment` - Fixed-point clock step per output sample
    pub fn rate(control: u16, tone2_period: u16, clock_increment: i32) -> i32 {
        let shift = control & 0x03;
        if shift == RATE_FROM_TONE2 {
            if tone2_period > 0 {
                clock_increment / tone2_period as i32
            } else {
                clock_increment << 3
            }
        } else {
            clock_increment << (3 - shift)
        }
    }

    /// Shift the register once
    #[inline]
    pub fn step(&mut self, white: bool) {
        self.lfsr ^= (self.lfsr & 1) << 16;
        if white {
            self.lfsr ^= (self.lfsr & 8) << 13;
        }
        self.lfsr >>= 1;
    }

    /// Advance by one output sample
    ///
    /// # Arguments
    /// * `control` - Noise control register (period of channel 3)
    /// * `tone2_period` - Period register of channel 2
    /// * `clock_increment` - Fixed-point clock step per output sample
    pub fn tick(&mut self, control: u16, tone2_period: u16, clock_increment: i32) {
        self.phase = self
            .phase
            .wrapping_add(Self::rate(control, tone2_period, clock_increment));

        let white = control & WHITE_NOISE != 0;
        while self.phase >= PHASE_ONE {
            self.step(white);
            self.phase -= PHASE_ONE;
        }
    }
}

impl Default for NoiseGenerator {
    fn default() -> Self {
        Self::new()
    }
}

//! Tone channel playback state
//!
//! Each tone channel walks through its assigned waveform with a 22.10
//! fixed-point position. The increment is chosen so that one tone period of
//! the chip covers `len / period_count` samples.

use super::constants::{PHASE_BITS, PHASE_GRID_MASK};
use crate::waveform::{Waveform, WaveformId};

/// Runtime state of one channel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelState {
    /// Assigned waveform, `None` until the next note starts
    pub waveform: Option<WaveformId>,
    /// Playback position (22.10 fixed point)
    pub position: i32,
    /// Position step per output sample
    pub increment: i32,
    /// Linear amplitude
    pub volume: i32,
}

impl ChannelState {
    /// Create an idle channel
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase increment for a waveform at a given period
    ///
    /// Returns `None` when the waveform carries no pitch information
    /// (`period_count == 0`) or the period is zero.
    pub fn increment_for(wave: &Waveform, period: u16, clock_increment: i32) -> Option<i32> {
        if wave.period_count() == 0 || period == 0 {
            return None;
        }
        let step = wave.len() as i64 * clock_increment as i64
            / period as i64
            / wave.period_count() as i64;
        Some(step as i32)
    }

    /// Bring the position back inside the waveform
    ///
    /// Each pass subtracts at least one whole sample, since `loop_distance`
    /// is at least 1, and the result stays non-negative because
    /// `loop_distance <= len`.
    ///
    /// # Returns
    ///
    /// The integer sample index after rewinding
    #[inline]
    pub fn rewind(&mut self, wave: &Waveform) -> i32 {
        let len = wave.len() as i32;
        let loop_step = (wave.loop_distance() as i32) << PHASE_BITS;

        let mut index = self.position >> PHASE_BITS;
        while index >= len {
            self.position -= loop_step;
            // Snap to the sample grid so short loops don't drift
            self.position &= PHASE_GRID_MASK;
            index = self.position >> PHASE_BITS;
        }
        index
    }

    /// Produce one sample from the waveform and advance
    ///
    /// # Returns
    ///
    /// `(volume * sample) >> 4`, or 0 if the position is negative
    #[inline]
    pub fn render(&mut self, wave: &Waveform) -> i32 {
        let index = self.rewind(wave);

        let output = if index >= 0 {
            (self.volume * wave.sample(index as usize)) >> 4
        } else {
            0
        };

        self.position = self.position.wrapping_add(self.increment);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize, loop_distance: usize) -> Waveform {
        let data = (0..len).map(|i| (0x80 + i) as u8).collect();
        Waveform::new(data, loop_distance, 1).unwrap()
    }

    #[test]
    fn test_increment_formula() {
        let wave = Waveform::square(16, 1);
        // 32 * 2597 / 0x3F0 / 1
        assert_eq!(ChannelState::increment_for(&wave, 0x3F0, 2597), Some(82));

        let wave = Waveform::square(4, 4);
        // 32 * 2597 / 100 / 4
        assert_eq!(ChannelState::increment_for(&wave, 100, 2597), Some(207));
    }

    #[test]
    fn test_increment_guarded() {
        let wave = Waveform::new(vec![0x80; 4], 4, 0).unwrap();
        assert_eq!(ChannelState::increment_for(&wave, 100, 2597), None);

        let wave = Waveform::square(4, 1);
        assert_eq!(ChannelState::increment_for(&wave, 0, 2597), None);
    }

    #[test]
    fn test_rewind_lands_inside_waveform() {
        for (len, dist) in [(32, 32), (32, 1), (10, 3), (7, 7), (100, 40)] {
            let wave = ramp(len, dist);
            for start in [len, len + 1, 2 * len, 5 * len + 3, 1000] {
                let mut ch = ChannelState {
                    position: (start as i32) << PHASE_BITS | 0x155,
                    ..ChannelState::new()
                };
                let index = ch.rewind(&wave);
                assert!(
                    (0..len as i32).contains(&index),
                    "len={len} dist={dist} start={start} -> {index}"
                );
                assert_eq!(ch.position & 0x3FF, 0);
            }
        }
    }

    #[test]
    fn test_rewind_keeps_fraction_inside_bounds() {
        let wave = ramp(8, 8);
        let mut ch = ChannelState {
            position: (3 << PHASE_BITS) | 0x200,
            ..ChannelState::new()
        };
        assert_eq!(ch.rewind(&wave), 3);
        assert_eq!(ch.position, (3 << PHASE_BITS) | 0x200);
    }

    #[test]
    fn test_render_reads_then_advances() {
        let wave = ramp(4, 2);
        let mut ch = ChannelState {
            volume: 16,
            increment: 1 << PHASE_BITS,
            ..ChannelState::new()
        };

        // 0,1,2,3 then loop back by 2: 2,3,2,3
        let out: Vec<i32> = (0..8).map(|_| ch.render(&wave)).collect();
        assert_eq!(out, vec![0, 1, 2, 3, 2, 3, 2, 3]);
    }

    #[test]
    fn test_render_negative_position_is_silent() {
        let wave = ramp(4, 4);
        let mut ch = ChannelState {
            position: -2048,
            volume: 16,
            increment: 1024,
            ..ChannelState::new()
        };
        assert_eq!(ch.render(&wave), 0);
        assert_eq!(ch.position, -1024);
    }
}

//! SN76489 Stereo Mixer
//!
//! Pans the four channel outputs according to the Game Gear stereo register
//! and adds them into a running stereo total.
//!
//! The register is written active-low and stored inverted. A channel whose
//! mask bit is set on one side stays at full level there and drops to a
//! quarter on the other; with both bits set it plays at a quarter on both
//! sides. The "off" side is attenuated, never silenced.

use super::constants::NUM_CHANNELS;
use bitflags::bitflags;

bitflags! {
    /// Stored stereo mask (inverted wire value)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StereoMask: u8 {
        /// Channel 0 left bit
        const LEFT_0 = 0x01;
        /// Channel 1 left bit
        const LEFT_1 = 0x02;
        /// Channel 2 left bit
        const LEFT_2 = 0x04;
        /// Channel 3 left bit
        const LEFT_3 = 0x08;
        /// Channel 0 right bit
        const RIGHT_0 = 0x10;
        /// Channel 1 right bit
        const RIGHT_1 = 0x20;
        /// Channel 2 right bit
        const RIGHT_2 = 0x40;
        /// Channel 3 right bit
        const RIGHT_3 = 0x80;
    }
}

impl StereoMask {
    /// Decode a stereo register write (active-low on the wire)
    pub fn from_wire(value: u8) -> Self {
        StereoMask::from_bits_retain(!value)
    }

    /// Pan setting of one channel
    pub fn pan(&self, channel: usize) -> Pan {
        match (self.bits() >> channel) & 0x11 {
            0x01 => Pan::Left,
            0x10 => Pan::Right,
            0x11 => Pan::Quiet,
            _ => Pan::Center,
        }
    }
}

/// Per-channel stereo placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pan {
    /// Full level on both sides
    Center,
    /// Full left, quarter right
    Left,
    /// Quarter left, full right
    Right,
    /// Quarter level on both sides
    Quiet,
}

impl Pan {
    /// Split a channel output into (left, right)
    ///
    /// Quarter levels use an arithmetic shift, so negative samples round
    /// toward negative infinity.
    #[inline]
    pub fn split(self, sample: i32) -> (i32, i32) {
        match self {
            Pan::Center => (sample, sample),
            Pan::Left => (sample, sample >> 2),
            Pan::Right => (sample >> 2, sample),
            Pan::Quiet => (sample >> 2, sample >> 2),
        }
    }
}

/// Pan all channels and add them into `total`
///
/// # Arguments
///
/// * `outputs` - Mono output of channels 0-3
/// * `mask` - Stored stereo mask
/// * `total` - Running (left, right) total owned by the caller
#[inline]
pub fn mix_stereo(outputs: &[i32; NUM_CHANNELS], mask: StereoMask, total: &mut [i32; 2]) {
    let (mut left, mut right) = (0, 0);
    for (channel, &sample) in outputs.iter().enumerate() {
        let (l, r) = mask.pan(channel).split(sample);
        left += l;
        right += r;
    }
    total[0] += left;
    total[1] += right;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_from_wire_inverts() {
        assert_eq!(StereoMask::from_wire(0x00), StereoMask::all());
        assert_eq!(StereoMask::from_wire(0xFF), StereoMask::empty());
        assert_eq!(StereoMask::from_wire(0xFE), StereoMask::LEFT_0);
    }

    #[test]
    fn test_pan_decoding() {
        let mask =
            StereoMask::LEFT_0 | StereoMask::RIGHT_1 | StereoMask::LEFT_2 | StereoMask::RIGHT_2;
        assert_eq!(mask.pan(0), Pan::Left);
        assert_eq!(mask.pan(1), Pan::Right);
        assert_eq!(mask.pan(2), Pan::Quiet);
        assert_eq!(mask.pan(3), Pan::Center);
    }

    #[test]
    fn test_left_pan_quarters_right_side() {
        for p in [4096, 1000, 3, 0, -1, -3, -1000, -4096] {
            assert_eq!(Pan::Left.split(p), (p, p >> 2));
        }
        // arithmetic shift on negatives
        assert_eq!(Pan::Left.split(-3), (-3, -1));
        assert_eq!(Pan::Right.split(-8), (-2, -8));
    }

    #[test]
    fn test_mix_stereo_accumulates() {
        let mut total = [10, -10];
        mix_stereo(&[100, 200, 0, -40], StereoMask::LEFT_0, &mut total);
        // ch0 left-only: 100 / 25; others centered
        assert_eq!(total, [10 + 100 + 200 - 40, -10 + 25 + 200 - 40]);
    }

    #[test]
    fn test_mix_stereo_all_bits_set_quarters_everything() {
        let mut total = [0, 0];
        mix_stereo(&[400, 400, 400, 400], StereoMask::all(), &mut total);
        assert_eq!(total, [400, 400]);
    }
}

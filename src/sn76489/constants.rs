//! SN76489 Hardware Constants
//!
//! Shared constants and lookup tables used across PSG components.

/// Number of PSG channels (three tone channels plus noise)
pub const NUM_CHANNELS: usize = 4;

/// Index of the noise channel
pub const NOISE_CHANNEL: usize = 3;

/// Nominal chip input clock (NTSC colour burst, in Hz)
pub const DEFAULT_CHIP_CLOCK: u32 = 3_579_540;

/// Default host output sample rate
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Fractional bits of the 22.10 phase accumulators
pub const PHASE_BITS: u32 = 10;

/// One whole sample (or one noise step) in phase units
pub const PHASE_ONE: i32 = 1 << PHASE_BITS;

/// Clears the fractional bits (and the sign bit) after a loop rewind
pub const PHASE_GRID_MASK: i32 = 0x7fff_fc00;

/// Periods at or above this value play the shared digital waveform
pub const DIGITAL_WAVE_PERIOD: u16 = 0x9f0;

/// Periods at or below this value output the channel volume directly
pub const DIRECT_OUTPUT_PERIOD: u16 = 4;

/// A loudness rise larger than this in one write starts a new note
pub const ATTACK_THRESHOLD: u8 = 2;

/// PSG attenuation curve, indexed by loudness (0 = silent, 15 = loudest)
///
/// The chip attenuates in roughly 2dB steps. This table is the linear
/// amplitude for each of the 16 steps, in units of 1/256.
pub const ATTENUATION_TABLE: [i32; 16] = [
    0x000, 0x011, 0x017, 0x01d, 0x028, 0x031, 0x03a, 0x04b, 0x060, 0x074, 0x094, 0x0bd, 0x0e0,
    0x0fc, 0x0ff, 0x100,
];

/// Headroom shift applied to table amplitudes
pub const VOLUME_SHIFT: u32 = 4;

/// Linear channel amplitude for a loudness value
///
/// Masks the input to the 4-bit register range before the table lookup.
///
/// # Arguments
/// * `loudness` - Loudness register value (any u8, will be masked to 0-15)
///
/// # Returns
/// Scaled amplitude (0 to 0x1000)
#[inline]
pub fn scaled_volume(loudness: u8) -> i32 {
    ATTENUATION_TABLE[(loudness & 0x0F) as usize] << VOLUME_SHIFT
}

/// Fixed-point clock step per output sample
///
/// Stepping a phase accumulator by `clock_increment(..) / period` for one full
/// tone period lands on [`PHASE_ONE`].
///
/// Returns 0 for a zero sample rate, which leaves every channel inert.
#[inline]
pub fn clock_increment(chip_clock: u32, sample_rate: u32) -> i32 {
    if sample_rate == 0 {
        return 0;
    }
    (((chip_clock as i64) << 5) / sample_rate as i64) as i32
}

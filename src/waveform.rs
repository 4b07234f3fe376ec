//! Waveform store
//!
//! Tone channels do not synthesize square waves directly. Each channel plays
//! back a sampled waveform at a pitch derived from its period register. The
//! waveforms are assets supplied by the host and shared read-only between
//! chips; channels refer to them by [`WaveformId`].
//!
//! Store layout:
//! - index 0: shared digital/square waveform, used for very low periods
//! - index 1 + c: instrument for channel `c`
//!
//! # Example
//!
//! ```
//! use sn76489::waveform::{Waveform, WaveformId, WaveformStore};
//!
//! let square = Waveform::square(16, 1);
//! let store = WaveformStore::new(square.clone(), vec![square; 3]);
//! assert!(store.get(WaveformId::instrument(2)).is_some());
//! ```

use crate::{Result, Sn76489Error};

/// Center value of unsigned 8-bit samples
pub const SAMPLE_CENTER: i32 = 0x80;

/// Largest waveform length whose 22.10 position still fits in an `i32`
pub const MAX_WAVEFORM_LEN: usize = 1 << 20;

/// Index of a waveform in a [`WaveformStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaveformId(pub usize);

impl WaveformId {
    /// Shared digital/square waveform
    pub const DIGITAL: WaveformId = WaveformId(0);

    /// Instrument waveform of a channel
    #[inline]
    pub const fn instrument(channel: usize) -> Self {
        WaveformId(1 + channel)
    }
}

/// A sampled tone source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waveform {
    /// Unsigned 8-bit samples centered at [`SAMPLE_CENTER`]
    data: Vec<u8>,
    /// Samples to rewind when playback runs off the end
    loop_distance: usize,
    /// Chip periods covered by the whole sample at nominal pitch
    period_count: u32,
}

impl Waveform {
    /// Create a waveform
    ///
    /// # Arguments
    ///
    /// * `data` - Unsigned 8-bit samples centered at 0x80
    /// * `loop_distance` - Samples to rewind at the end (1..=len)
    /// * `period_count` - Tone periods spanned by the data; 0 leaves the
    ///   channel without a pitch
    ///
    /// # Errors
    ///
    /// Returns [`Sn76489Error::InvalidWaveform`] for empty or oversized data
    /// or a loop distance outside `1..=len`.
    pub fn new(data: Vec<u8>, loop_distance: usize, period_count: u32) -> Result<Self> {
        if data.is_empty() {
            return Err(Sn76489Error::InvalidWaveform(
                "waveform has no samples".to_string(),
            ));
        }
        if data.len() > MAX_WAVEFORM_LEN {
            return Err(Sn76489Error::InvalidWaveform(format!(
                "waveform length {} exceeds {}",
                data.len(),
                MAX_WAVEFORM_LEN
            )));
        }
        if loop_distance == 0 || loop_distance > data.len() {
            return Err(Sn76489Error::InvalidWaveform(format!(
                "loop distance {} outside 1..={}",
                loop_distance,
                data.len()
            )));
        }

        Ok(Self {
            data,
            loop_distance,
            period_count,
        })
    }

    /// Build a looping square wave
    ///
    /// # Arguments
    ///
    /// * `half_period` - Samples per half cycle (at least 1)
    /// * `periods` - Full cycles in the buffer (at least 1)
    ///
    /// Both are clamped so the buffer stays within [`MAX_WAVEFORM_LEN`].
    pub fn square(half_period: usize, periods: u32) -> Self {
        let max_periods = (MAX_WAVEFORM_LEN / 2) as u32;
        let periods = periods.clamp(1, max_periods);
        let half_period = half_period.clamp(1, MAX_WAVEFORM_LEN / (2 * periods as usize));

        let data: Vec<u8> = (0..periods as usize)
            .flat_map(|_| {
                std::iter::repeat(0xFFu8)
                    .take(half_period)
                    .chain(std::iter::repeat(0x01u8).take(half_period))
            })
            .collect();
        let loop_distance = data.len();

        Self {
            data,
            loop_distance,
            period_count: periods,
        }
    }

    /// Number of samples
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the waveform has no samples (never true once constructed)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Samples to rewind at the end
    #[inline]
    pub fn loop_distance(&self) -> usize {
        self.loop_distance
    }

    /// Tone periods spanned by the data
    #[inline]
    pub fn period_count(&self) -> u32 {
        self.period_count
    }

    /// Raw sample data
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Signed sample at `index` (-128..=127)
    #[inline]
    pub fn sample(&self, index: usize) -> i32 {
        self.data[index] as i32 - SAMPLE_CENTER
    }
}

/// Indexable set of waveforms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveformStore {
    waves: Vec<Waveform>,
}

impl WaveformStore {
    /// Create a store from the digital waveform and per-channel instruments
    pub fn new(digital: Waveform, instruments: Vec<Waveform>) -> Self {
        let mut waves = Vec::with_capacity(1 + instruments.len());
        waves.push(digital);
        waves.extend(instruments);
        Self { waves }
    }

    /// Square waves for every slot
    ///
    /// The digital waveform is a single 32-sample cycle; channel instruments
    /// hold four 8-sample cycles.
    pub fn squares() -> Self {
        let instrument = Waveform::square(4, 4);
        Self::new(Waveform::square(16, 1), vec![instrument; 4])
    }

    /// Look up a waveform
    #[inline]
    pub fn get(&self, id: WaveformId) -> Option<&Waveform> {
        self.waves.get(id.0)
    }

    /// Number of waveforms, including the digital one
    pub fn len(&self) -> usize {
        self.waves.len()
    }

    /// Always false: the digital waveform is mandatory
    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }
}

impl Default for WaveformStore {
    fn default() -> Self {
        Self::squares()
    }
}

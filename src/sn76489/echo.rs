//! Stereo enhancement echo
//!
//! Feeds a delayed mix of channels 0 and 1 back into channel 0, giving the
//! two melody channels a wider sound. The delay is one ring buffer length
//! (4096 samples, about 93ms at 44.1kHz).

/// History buffer size (4096 samples)
const HISTORY_SIZE_BITS: usize = 12;
const HISTORY_SIZE: usize = 1 << HISTORY_SIZE_BITS;
const HISTORY_MASK: usize = HISTORY_SIZE - 1;

/// Echo filter over channels 0 and 1
#[derive(Clone)]
pub struct EchoFilter {
    /// Circular buffer of past (ch0 + ch1) / 2 mixes
    buffer: Box<[i32; HISTORY_SIZE]>,
    /// Current write position in buffer
    position: usize,
}

impl EchoFilter {
    /// Create a new echo filter with silent history
    pub fn new() -> Self {
        Self {
            buffer: Box::new([0; HISTORY_SIZE]),
            position: 0,
        }
    }

    /// Apply the echo to one sample of channels 0 and 1
    ///
    /// # Arguments
    ///
    /// * `ch0` - Channel 0 output, receives the echo
    /// * `ch1` - Channel 1 output
    ///
    /// # Returns
    ///
    /// The attenuated (ch0, ch1) pair
    #[inline]
    pub fn process(&mut self, ch0: i32, ch1: i32) -> (i32, i32) {
        let delayed = self.buffer[(self.position + 1) & HISTORY_MASK];

        let ch0 = (ch0 + delayed) * 3 >> 2;
        let ch1 = ch1 * 3 >> 2;

        self.buffer[self.position] = (ch0 + ch1) >> 1;
        self.position = (self.position + 1) & HISTORY_MASK;

        (ch0, ch1)
    }

    /// Clear the history
    pub fn reset(&mut self) {
        self.buffer.fill(0);
        self.position = 0;
    }
}

impl Default for EchoFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EchoFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EchoFilter")
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

//! SN76489 PSG emulation core
//!
//! Operates once per host output sample. Tone channels play sampled
//! waveforms from a shared [`WaveformStore`], the noise channel runs a 17-bit
//! LFSR, and the result is panned through the Game Gear stereo register into
//! a caller-owned running total.
//!
//! Two heuristics stand in for the key-on signal the chip does not have:
//! - a loudness rise of more than two steps in one write starts a new note
//!   (waveform re-picked, playback restarted)
//! - periods of 4 or less output the channel volume as a DC level, which is
//!   how games drive the chip as a crude DAC for speech

use std::sync::Arc;

use super::channel::ChannelState;
use super::constants::{
    clock_increment, scaled_volume, ATTACK_THRESHOLD, DIGITAL_WAVE_PERIOD, DIRECT_OUTPUT_PERIOD,
    NOISE_CHANNEL, NUM_CHANNELS,
};
use super::decoder::{decode, RegisterWrite};
use super::echo::EchoFilter;
use super::mixer::{mix_stereo, StereoMask};
use super::noise::NoiseGenerator;
use super::registers::RegisterBank;
use crate::config::PsgConfig;
use crate::waveform::{WaveformId, WaveformStore};
use crate::Result;

/// SN76489 PSG emulator
#[derive(Clone)]
pub struct Sn76489 {
    config: PsgConfig,
    clock_increment: i32,
    regs: RegisterBank,
    channels: [ChannelState; NUM_CHANNELS],
    noise: NoiseGenerator,
    echo: EchoFilter,
    waves: Arc<WaveformStore>,
}

impl Sn76489 {
    /// Create a chip with the default configuration (44.1kHz, NTSC clock)
    pub fn new(waves: Arc<WaveformStore>) -> Self {
        let config = PsgConfig::default();
        let mut chip = Self {
            config,
            clock_increment: 0,
            regs: RegisterBank::new(),
            channels: [ChannelState::new(); NUM_CHANNELS],
            noise: NoiseGenerator::new(),
            echo: EchoFilter::new(),
            waves,
        };
        chip.reset();
        chip
    }

    /// Create a chip with a custom configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails
    /// [`PsgConfig::validate`].
    pub fn with_config(config: PsgConfig, waves: Arc<WaveformStore>) -> Result<Self> {
        config.validate()?;
        let mut chip = Self::new(waves);
        chip.config = config;
        chip.reset();
        Ok(chip)
    }

    /// Reinitialize the runtime state
    ///
    /// Clears channel playback, reseeds the noise generator, empties the
    /// echo history and re-derives every channel from the register bank,
    /// which is kept as is.
    pub fn reset(&mut self) {
        self.channels = [ChannelState::new(); NUM_CHANNELS];
        self.noise = NoiseGenerator::new();
        self.echo.reset();
        self.clock_increment = clock_increment(self.config.clock_hz, self.config.sample_rate);
        log::debug!(
            "psg reset: {} Hz output, clock step {}, enhance {}",
            self.config.sample_rate,
            self.clock_increment,
            self.config.enhance
        );
        self.recalc_all();
    }

    /// Change the output sample rate
    ///
    /// Playback positions and waveform assignments survive; only the
    /// increments are re-derived.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero rate.
    pub fn set_sample_rate(&mut self, sample_rate: u32) -> Result<()> {
        let config = PsgConfig {
            sample_rate,
            ..self.config
        };
        config.validate()?;

        self.config = config;
        self.clock_increment = clock_increment(config.clock_hz, sample_rate);
        log::debug!(
            "psg sample rate {} Hz, clock step {}",
            sample_rate,
            self.clock_increment
        );
        self.recalc_all();
        Ok(())
    }

    /// Enable or disable the echo enhancement
    pub fn set_enhance(&mut self, enhance: bool) {
        if enhance && !self.config.enhance {
            self.echo.reset();
        }
        self.config.enhance = enhance;
    }

    /// Current configuration
    pub fn config(&self) -> &PsgConfig {
        &self.config
    }

    /// Fixed-point clock step per output sample
    pub fn clock_step(&self) -> i32 {
        self.clock_increment
    }

    /// Register bank
    pub fn registers(&self) -> &RegisterBank {
        &self.regs
    }

    /// Restore a register bank (e.g. from a save state)
    ///
    /// Runtime state is re-derived without restarting playback. Out-of-range
    /// latch channels and loudness values are masked to the register width.
    pub fn load_registers(&mut self, regs: RegisterBank) {
        self.regs = regs.clamped();
        log::debug!("psg registers loaded: {:?}", self.regs);
        self.recalc_all();
    }

    /// Runtime state of a channel
    ///
    /// # Panics
    ///
    /// Panics if `channel >= 4`.
    pub fn channel(&self, channel: usize) -> &ChannelState {
        &self.channels[channel]
    }

    /// Noise generator state
    pub fn noise(&self) -> &NoiseGenerator {
        &self.noise
    }

    /// Shared waveform store
    pub fn waveforms(&self) -> &Arc<WaveformStore> {
        &self.waves
    }

    /// Write a byte to the tone/volume port
    pub fn write_register(&mut self, byte: u8) {
        let (write, latch) = decode(byte, self.regs.latch);
        self.regs.latch = latch;
        log::trace!("psg {:#04x}: {} {:?}", byte, write.register(), write);

        match write {
            RegisterWrite::Volume { channel, loudness } => self.set_volume(channel, loudness),
            RegisterWrite::PeriodLow { channel, bits } => {
                self.regs.set_period_low(channel, bits);
                self.recalc_increment(channel);
                if channel == NOISE_CHANNEL {
                    self.noise.reseed();
                }
            }
            RegisterWrite::PeriodHigh { channel, bits } => {
                self.regs.set_period_high(channel, bits);
                self.recalc_increment(channel);
            }
        }
    }

    /// Write a byte to the stereo port (active-low enables)
    pub fn write_stereo(&mut self, byte: u8) {
        self.regs.stereo = !byte;
        log::trace!("psg stereo {:#04x}: mask {:?}", byte, self.regs.stereo_mask());
    }

    fn set_volume(&mut self, channel: usize, loudness: u8) {
        if loudness > self.regs.volume[channel].saturating_add(ATTACK_THRESHOLD) {
            // Louder: most likely a new note
            self.channels[channel].waveform = None;
            self.recalc_increment(channel);
        }
        self.regs.volume[channel] = loudness;
        self.recalc_volume(channel);
    }

    fn recalc_volume(&mut self, channel: usize) {
        self.channels[channel].volume = scaled_volume(self.regs.volume[channel]);
    }

    fn recalc_increment(&mut self, channel: usize) {
        let period = self.regs.period[channel];
        if period == 0 {
            return;
        }

        let id = match self.channels[channel].waveform {
            Some(id) => id,
            None => {
                let id = if period >= DIGITAL_WAVE_PERIOD {
                    WaveformId::DIGITAL
                } else {
                    WaveformId::instrument(channel)
                };
                self.channels[channel].waveform = Some(id);
                if channel == NOISE_CHANNEL {
                    self.noise.reset_phase();
                } else {
                    self.channels[channel].position = 0;
                }
                id
            }
        };

        if let Some(increment) = self
            .waves
            .get(id)
            .and_then(|wave| ChannelState::increment_for(wave, period, self.clock_increment))
        {
            self.channels[channel].increment = increment;
        }
    }

    /// Re-derive increments and volumes of all channels from the registers
    pub fn recalc_all(&mut self) {
        for channel in 0..NUM_CHANNELS {
            self.recalc_increment(channel);
            self.recalc_volume(channel);
        }
    }

    /// Mono output of a tone channel for this sample
    fn tone_output(&mut self, channel: usize) -> i32 {
        let state = &mut self.channels[channel];
        if state.volume <= 0 {
            return 0;
        }
        if self.regs.period[channel] <= DIRECT_OUTPUT_PERIOD {
            return state.volume;
        }

        let Some(wave) = state.waveform.and_then(|id| self.waves.get(id)) else {
            return 0;
        };
        state.render(wave)
    }

    /// Mono output of all four channels for this sample, before stereo
    ///
    /// Advances every generator and the echo history by one sample.
    pub fn channel_outputs(&mut self) -> [i32; NUM_CHANNELS] {
        let mut outputs = [0i32; NUM_CHANNELS];
        for (channel, out) in outputs.iter_mut().enumerate().take(NOISE_CHANNEL) {
            *out = self.tone_output(channel);
        }

        let noise_volume = self.channels[NOISE_CHANNEL].volume;
        outputs[NOISE_CHANNEL] = if self.noise.output() {
            noise_volume
        } else {
            -noise_volume
        };
        self.noise.tick(
            self.regs.noise_control(),
            self.regs.period[2],
            self.clock_increment,
        );

        if self.config.enhance {
            let (ch0, ch1) = self.echo.process(outputs[0], outputs[1]);
            outputs[0] = ch0;
            outputs[1] = ch1;
        }

        outputs
    }

    /// Produce one output sample and add it into `total`
    ///
    /// # Arguments
    ///
    /// * `total` - Running (left, right) mix owned by the caller
    pub fn mix_into(&mut self, total: &mut [i32; 2]) {
        let outputs = self.channel_outputs();
        mix_stereo(&outputs, self.regs.stereo_mask(), total);
    }

    /// Produce one output sample on its own
    ///
    /// # Returns
    ///
    /// `(left, right)` contribution of this chip
    pub fn tick(&mut self) -> (i32, i32) {
        let mut total = [0i32; 2];
        self.mix_into(&mut total);
        (total[0], total[1])
    }

    /// Add consecutive samples into a caller-provided stereo buffer
    ///
    /// Each frame is accumulated into, not overwritten.
    pub fn generate_into(&mut self, buffer: &mut [[i32; 2]]) {
        for frame in buffer.iter_mut() {
            self.mix_into(frame);
        }
    }

    /// Stereo mask currently applied
    pub fn stereo_mask(&self) -> StereoMask {
        self.regs.stereo_mask()
    }
}

impl std::fmt::Debug for Sn76489 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sn76489")
            .field("config", &self.config)
            .field("regs", &self.regs)
            .field("channels", &self.channels)
            .field("noise", &self.noise)
            .finish_non_exhaustive()
    }
}

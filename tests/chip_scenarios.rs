use std::sync::Arc;

use approx::assert_relative_eq;
use sn76489::sn76489::constants::DEFAULT_CHIP_CLOCK;
use sn76489::{PsgConfig, PsgHost, PsgPort, RegisterBank, Sn76489, StereoMask, WaveformStore};

/// Full-scale output of an instrument square wave at loudness 15
const SQUARE_PEAK: i32 = (0x1000 * 127) >> 4;

fn chip() -> Sn76489 {
    Sn76489::new(Arc::new(WaveformStore::squares()))
}

/// Channel 0 loudest, period 0x3F0
fn start_tone(chip: &mut Sn76489) {
    chip.write_register(0x90);
    chip.write_register(0x80);
    chip.write_register(0x3F);
}

#[test]
fn tone_follows_waveform_shape() {
    let mut chip = chip();
    start_tone(&mut chip);
    assert_eq!(chip.registers().period[0], 0x3F0);

    let increment = chip.channel(0).increment;
    assert_eq!(increment, 20);

    // Before the first loop the position is exactly n * increment;
    // the instrument holds four 8-sample square cycles.
    for n in 0..1600 {
        let (left, right) = chip.tick();
        let index = (n * increment) >> 10;
        let expected = if index % 8 < 4 { SQUARE_PEAK } else { -SQUARE_PEAK };
        assert_eq!(left, expected, "tick {n}");
        assert_eq!(right, expected, "tick {n}");
    }
}

#[test]
fn tone_pitch_matches_chip_clock() {
    let mut chip = chip();
    start_tone(&mut chip);

    let mut rising_edges = 0;
    let mut previous = 0;
    for _ in 0..44_100 {
        let (left, _) = chip.tick();
        assert_ne!(left, 0);
        if previous < 0 && left > 0 {
            rising_edges += 1;
        }
        previous = left;
    }

    // Hardware tone frequency: clock / (32 * period)
    let expected = DEFAULT_CHIP_CLOCK as f64 / (32.0 * 0x3F0 as f64);
    assert_relative_eq!(rising_edges as f64, expected, max_relative = 0.05);
}

#[test]
fn stereo_zero_byte_quarters_every_channel() {
    let mut chip = chip();
    chip.write_stereo(0x00);
    assert_eq!(chip.stereo_mask(), StereoMask::all());
    assert_eq!(chip.registers().stereo, 0xFF);

    // Channel 0 as a DC level (period 4)
    chip.write_register(0x90);
    chip.write_register(0x84);
    chip.write_register(0x00);
    assert_eq!(chip.tick(), (0x400, 0x400));
}

#[test]
fn stereo_left_only_uses_arithmetic_shift() {
    let mut chip = chip();
    chip.write_register(0xF0); // noise loudest
    chip.write_register(0xE4); // white noise
    chip.write_stereo(!StereoMask::LEFT_3.bits());

    let mut saw_negative = false;
    for _ in 0..2_000 {
        let (left, right) = chip.tick();
        assert_eq!(left.abs(), 0x1000);
        assert_eq!(right, left >> 2);
        saw_negative |= left < 0;
    }
    assert!(saw_negative);
}

#[test]
fn noise_reseeds_from_any_state() {
    let mut chip = chip();
    chip.write_register(0xF0);
    for control in [0xE4u8, 0xE5, 0xE6, 0xE0, 0xE3] {
        chip.write_register(control);
        for _ in 0..37 {
            chip.tick();
        }
        chip.write_register(control);
        assert_eq!(chip.noise().lfsr(), 1, "control {control:#04x}");
    }
}

#[test]
fn enhancement_echo_returns_after_buffer_length() {
    let waves = Arc::new(WaveformStore::squares());
    let config = PsgConfig::default().with_enhance(true);
    let mut chip = Sn76489::with_config(config, waves).unwrap();

    chip.write_register(0x90);
    chip.write_register(0x84);
    chip.write_register(0x00);

    for _ in 0..4095 {
        assert_eq!(chip.tick(), (3072, 3072));
    }
    // (4096 + 1536) * 3 / 4
    assert_eq!(chip.tick(), (4224, 4224));
}

#[test]
fn totals_accumulate() {
    let mut chip = chip();
    chip.write_register(0x90);
    chip.write_register(0x84);
    chip.write_register(0x00);

    let mut buffer = vec![[1, -1]; 8];
    chip.generate_into(&mut buffer);
    assert!(buffer.iter().all(|&frame| frame == [0x1001, 0x0FFF]));

    let mut total = [0i32; 2];
    chip.mix_into(&mut total);
    chip.mix_into(&mut total);
    assert_eq!(total, [0x2000, 0x2000]);
}

#[test]
fn register_snapshot_round_trip() {
    let mut source = chip();
    for byte in [0x90, 0x8A, 0x1C, 0xB3, 0xA4, 0x08, 0xF2, 0xE5] {
        source.write_register(byte);
    }
    source.write_stereo(0x5A);

    let json = serde_json::to_string(source.registers()).unwrap();
    let restored: RegisterBank = serde_json::from_str(&json).unwrap();
    assert_eq!(&restored, source.registers());

    let mut reloaded = chip();
    reloaded.load_registers(restored);

    for n in 0..5_000 {
        assert_eq!(source.tick(), reloaded.tick(), "tick {n}");
    }
}

#[test]
fn corrupt_snapshot_latch_is_masked() {
    for latch in [r#"{"Period":4}"#, r#"{"Volume":7}"#] {
        let json = format!(
            r#"{{"volume":[0,0,0,0],"period":[0,0,0,0],"latch":{latch},"stereo":0}}"#
        );
        let regs: RegisterBank = serde_json::from_str(&json).unwrap();

        let mut chip = chip();
        chip.load_registers(regs);
        assert!(chip.registers().latch.channel() < 4);

        chip.write_register(0x05);
        chip.tick();
    }
}

#[test]
fn chips_are_independent() {
    let waves = Arc::new(WaveformStore::squares());
    let mut a = Sn76489::new(waves.clone());
    let mut b = Sn76489::with_config(PsgConfig::new(22_050), waves).unwrap();

    start_tone(&mut a);
    assert_eq!(b.registers(), &RegisterBank::new());
    assert_eq!(b.tick(), (0, 0));
    assert_ne!(a.tick(), (0, 0));
}

/// Renders a fixed number of samples before each write
#[derive(Default)]
struct ScheduledRenderer {
    samples_per_write: usize,
    frames: Vec<(i32, i32)>,
    trace: Vec<u8>,
}

impl PsgHost for ScheduledRenderer {
    fn flush(&mut self, chip: &mut Sn76489) {
        for _ in 0..self.samples_per_write {
            self.frames.push(chip.tick());
        }
    }

    fn trace_register(&mut self, byte: u8) {
        self.trace.push(byte);
    }
}

#[test]
fn port_renders_before_applying_writes() {
    let host = ScheduledRenderer {
        samples_per_write: 4,
        ..Default::default()
    };
    let mut port = PsgPort::new(chip(), host);

    port.write(0x90); // loud, period 0
    port.write(0x84); // period 4: DC level from the previous write on
    port.write(0x9F); // silence

    let host = port.host();
    assert_eq!(host.trace, vec![0x90, 0x84, 0x9F]);
    assert_eq!(host.frames.len(), 12);
    // Nothing audible before the first write landed
    assert!(host.frames[..4].iter().all(|&f| f == (0, 0)));
    // Loud with period 0 also takes the DC path
    assert!(host.frames[4..].iter().all(|&f| f == (0x1000, 0x1000)));
    assert_eq!(port.chip().registers().volume[0], 0);
}

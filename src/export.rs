//! WAV file export
//!
//! Renders chip output straight to a 16-bit stereo WAV file. Useful for
//! comparing the emulation against hardware recordings.

use crate::sn76489::Sn76489;
use crate::Result;
use std::path::Path;

/// Render `frames` samples from the chip into a WAV file
///
/// Each frame is the chip's own contribution, clamped to the 16-bit range.
///
/// # Arguments
///
/// * `chip` - Chip to render (advanced by `frames` samples)
/// * `frames` - Number of stereo frames to render
/// * `output_path` - Path where the WAV file will be written
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use sn76489::export::export_to_wav;
/// use sn76489::{Sn76489, WaveformStore};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut chip = Sn76489::new(Arc::new(WaveformStore::squares()));
/// chip.write_register(0x90);
/// chip.write_register(0x8E);
/// chip.write_register(0x0F);
/// export_to_wav(&mut chip, 44_100, "tone.wav")?;
/// # Ok(())
/// # }
/// ```
pub fn export_to_wav<P: AsRef<Path>>(
    chip: &mut Sn76489,
    frames: usize,
    output_path: P,
) -> Result<()> {
    let mut buffer = vec![[0i32; 2]; frames];
    chip.generate_into(&mut buffer);

    log::debug!(
        "writing {} frames to {}",
        frames,
        output_path.as_ref().display()
    );
    write_wav_file(output_path.as_ref(), &buffer, chip.config().sample_rate)
}

/// Write stereo frames to a WAV file
fn write_wav_file(path: &Path, frames: &[[i32; 2]], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| format!("Failed to create WAV file: {}", e))?;

    for frame in frames {
        for &sample in frame {
            writer
                .write_sample(to_i16(sample))
                .map_err(|e| format!("Failed to write sample: {}", e))?;
        }
    }

    writer
        .finalize()
        .map_err(|e| format!("Failed to finalize WAV file: {}", e))?;

    Ok(())
}

/// Clamp a mixed sample to 16 bits
#[inline]
fn to_i16(sample: i32) -> i16 {
    sample.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_i16_clamps() {
        assert_eq!(to_i16(40_000), i16::MAX);
        assert_eq!(to_i16(-40_000), i16::MIN);
        assert_eq!(to_i16(-123), -123);
    }
}

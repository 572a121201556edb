//! WAV encoding and decoding for interleaved PCM audio.

use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tt_ir::{RenderFormat, SampleBuffer};

use crate::WavError;

/// Output container settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WavSettings {
    /// 8, 16, 24 or 32
    pub bits_per_sample: u16,
}

impl Default for WavSettings {
    fn default() -> Self {
        Self { bits_per_sample: 16 }
    }
}

impl WavSettings {
    pub const SUPPORTED_BITS: [u16; 4] = [8, 16, 24, 32];

    pub fn new(bits_per_sample: u16) -> Result<Self, WavError> {
        if !Self::SUPPORTED_BITS.contains(&bits_per_sample) {
            return Err(WavError::UnsupportedBitDepth(bits_per_sample));
        }
        Ok(Self { bits_per_sample })
    }

    /// Full-scale integer value: `2^(bits-1) - 1`.
    pub fn scale(&self) -> f64 {
        ((1i64 << (self.bits_per_sample - 1)) - 1) as f64
    }

    /// Quantize one sample: scale, truncate toward zero, saturate.
    pub fn quantize(&self, sample: f32) -> i32 {
        let scale = self.scale();
        let scaled = sample as f64 * scale;
        if scaled.is_nan() {
            return 0;
        }
        scaled.clamp(-scale - 1.0, scale) as i32
    }
}

// --- Writing ---

/// Encode interleaved samples as PCM WAV.
pub fn write_wav<W: Write + Seek>(
    w: W,
    samples: &[f32],
    format: RenderFormat,
    settings: WavSettings,
) -> Result<(), WavError> {
    let settings = WavSettings::new(settings.bits_per_sample)?;
    let spec = WavSpec {
        channels: format.channels,
        sample_rate: format.sample_rate,
        bits_per_sample: settings.bits_per_sample,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::new(w, spec)?;
    for &sample in samples {
        let q = settings.quantize(sample);
        match settings.bits_per_sample {
            8 => writer.write_sample(q as i8)?,
            16 => writer.write_sample(q as i16)?,
            _ => writer.write_sample(q)?,
        }
    }
    writer.finalize()?;
    Ok(())
}

/// Encode into an in-memory WAV file.
pub fn samples_to_wav(
    samples: &[f32],
    format: RenderFormat,
    settings: WavSettings,
) -> Result<Vec<u8>, WavError> {
    let mut cursor = Cursor::new(Vec::new());
    write_wav(&mut cursor, samples, format, settings)?;
    Ok(cursor.into_inner())
}

// --- Reading ---

/// Decode a PCM WAV into its format and interleaved float samples.
///
/// Integer samples are divided by the same full-scale value the encoder
/// multiplies by.
pub fn read_wav<R: Read>(r: R) -> Result<(RenderFormat, SampleBuffer), WavError> {
    let mut reader = WavReader::new(r)?;
    let spec = reader.spec();
    let format = RenderFormat {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    };
    let samples = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let scale = WavSettings::new(spec.bits_per_sample)?.scale();
            reader
                .samples::<i32>()
                .map(|s| s.map(|x| (x as f64 / scale) as f32))
                .collect::<Result<Vec<_>, _>>()?
        }
    };
    Ok((format, SampleBuffer::from_samples(samples)))
}

/// Load a WAV file from disk.
pub fn load_wav(path: impl AsRef<Path>) -> Result<(RenderFormat, SampleBuffer), WavError> {
    let file = std::fs::File::open(path)?;
    read_wav(std::io::BufReader::new(file))
}

use crate::error::LoadError;
use hound::{SampleFormat, WavReader};
use std::io::Cursor;
use std::path::Path;

/// Divisor mapping signed 16-bit PCM onto `[-1.0, 1.0)`.
pub const I16_SCALE: f32 = 32768.0;

/// Mono float samples at the clip's own sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Read a 16-bit PCM WAV file into canonical mono audio.
///
/// Stereo input is averaged per frame, integer samples are scaled by
/// [`I16_SCALE`] and the declared sample rate is kept as is. The file is
/// read in one go and closed before decoding starts.
pub fn read_wav<P: AsRef<Path>>(file_path: P) -> Result<AudioBuffer, LoadError> {
    let mut bytes = std::fs::read(file_path)?;

    if let Some(fmt) = FmtChunk::find(&bytes) {
        let bits = fmt.stored_width_bits();
        if bits != 16 {
            return Err(LoadError::UnsupportedSampleWidth { bits });
        }
        fmt.widen_short_pcm(&mut bytes);
    }

    let mut reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    if spec.sample_format != SampleFormat::Int {
        return Err(LoadError::ReadFailure {
            reason: "16-bit samples must be integer PCM".into(),
        });
    }
    if spec.channels > 2 {
        return Err(LoadError::UnsupportedChannelCount {
            channels: spec.channels,
        });
    }

    let samples: Vec<i16> = reader.samples::<i16>().collect::<Result<Vec<_>, _>>()?;

    let samples = match spec.channels {
        1 => {
            let mut samples_f32 = vec![0.0; samples.len()];
            knf_rs::convert_integer_to_float_audio(&samples, &mut samples_f32);
            samples_f32
        }
        2 => downmix_stereo(&samples)?,
        _ => {
            return Err(LoadError::ReadFailure {
                reason: "wav header declares no channels".into(),
            })
        }
    };

    Ok(AudioBuffer {
        samples,
        sample_rate: spec.sample_rate,
    })
}

const WAVE_FORMAT_PCM: u16 = 1;

/// The fields of a `fmt ` chunk that hound does not hand back.
#[derive(Debug, Clone, Copy)]
struct FmtChunk {
    /// Offset of the chunk body in the file.
    offset: usize,
    format_tag: u16,
    channels: u16,
    block_align: u16,
    bits_per_sample: u16,
}

impl FmtChunk {
    fn find(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
            return None;
        }

        let read_u16 = |at: usize| -> Option<u16> {
            Some(u16::from_le_bytes(bytes.get(at..at + 2)?.try_into().ok()?))
        };

        let mut offset = 12usize;
        while offset + 8 <= bytes.len() {
            let id = &bytes[offset..offset + 4];
            let chunk_size =
                u32::from_le_bytes(bytes[offset + 4..offset + 8].try_into().ok()?) as usize;
            let body = offset + 8;

            if id == b"fmt " {
                if chunk_size < 16 {
                    return None;
                }
                return Some(Self {
                    offset: body,
                    format_tag: read_u16(body)?,
                    channels: read_u16(body + 2)?,
                    block_align: read_u16(body + 12)?,
                    bits_per_sample: read_u16(body + 14)?,
                });
            }

            offset = body.checked_add(chunk_size)?;
            if chunk_size % 2 == 1 {
                offset = offset.checked_add(1)?;
            }
        }
        None
    }

    /// Bytes each sample occupies on disk, times eight.
    fn stored_width_bits(&self) -> u16 {
        if self.channels == 0 {
            return self.bits_per_sample.div_ceil(8) * 8;
        }
        (self.block_align / self.channels) * 8
    }

    /// Plain PCM with fewer than 16 valid bits in 2-byte slots is rejected by
    /// hound. The samples are left-justified, so declaring 16 bits reads them
    /// as the raw 16-bit words.
    fn widen_short_pcm(&self, bytes: &mut [u8]) {
        if self.format_tag == WAVE_FORMAT_PCM && self.bits_per_sample < 16 {
            bytes[self.offset + 14..self.offset + 16].copy_from_slice(&16u16.to_le_bytes());
        }
    }
}

/// Equal-weight average of interleaved left/right frames, then scaled.
///
/// The sum of two `i16` values fits exactly in `f32`, so halving keeps the
/// `.5` instead of truncating.
pub fn downmix_stereo(interleaved: &[i16]) -> Result<Vec<f32>, LoadError> {
    let frames = interleaved.chunks_exact(2);
    if !frames.remainder().is_empty() {
        return Err(LoadError::ReadFailure {
            reason: format!(
                "stereo data ends with an incomplete frame ({} samples)",
                interleaved.len()
            ),
        });
    }

    Ok(frames
        .map(|frame| {
            let sum = i32::from(frame[0]) + i32::from(frame[1]);
            (sum as f32 / 2.0) / I16_SCALE
        })
        .collect())
}

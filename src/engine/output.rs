//! Master output stage and raw PCM sink

use std::io::{self, BufWriter, Write};

/// Full-scale value of a signed 16-bit sample
pub const FULL_SCALE: f64 = 32767.0;

/// Master volume, limiter and 16-bit quantizer
#[derive(Debug, Clone, Copy)]
pub struct OutputStage {
    volume: f64,
}

impl OutputStage {
    pub fn new(volume: f64) -> Self {
        Self { volume }
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Scale by the master volume and hard-clamp to [-1, 1]
    pub fn limit(&self, mix: f64) -> f64 {
        let scaled = mix * self.volume;
        if scaled.is_nan() {
            return 0.0;
        }
        scaled.clamp(-1.0, 1.0)
    }

    /// Limit then quantize to a signed 16-bit sample in [-32767, 32767]
    pub fn encode(&self, mix: f64) -> i16 {
        (self.limit(mix) * FULL_SCALE).round() as i16
    }
}

impl Default for OutputStage {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Headerless little-endian 16-bit mono PCM writer
pub struct PcmWriter<W: Write> {
    writer: BufWriter<W>,
    samples_written: u64,
}

impl<W: Write> PcmWriter<W> {
    /// Wrap `inner`, buffering `buffer_samples` samples between writes
    pub fn new(inner: W, buffer_samples: usize) -> Self {
        Self {
            writer: BufWriter::with_capacity(buffer_samples.max(1) * 2, inner),
            samples_written: 0,
        }
    }

    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Append one sample
    pub fn write_sample(&mut self, sample: i16) -> io::Result<()> {
        self.writer.write_all(&sample.to_le_bytes())?;
        self.samples_written += 1;
        Ok(())
    }

    /// Append a block of samples
    pub fn write_block(&mut self, samples: &[i16]) -> io::Result<()> {
        for &sample in samples {
            self.writer.write_all(&sample.to_le_bytes())?;
        }
        self.samples_written += samples.len() as u64;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}

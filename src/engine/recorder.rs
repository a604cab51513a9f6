//! Offline rendering to WAV
//!
//! A render is the same 16-bit mono stream `stream` produces, wrapped in a
//! canonical 44-byte RIFF header so ordinary players can open it.

use super::Engine;
use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use std::time::Duration;

/// WAV format matching the raw stream: mono, signed 16-bit
pub fn pcm16_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Writes engine output into a WAV container
pub struct Recorder<W: Write + Seek> {
    writer: WavWriter<W>,
    sample_rate: u32,
    frames: u64,
}

impl Recorder<BufWriter<File>> {
    /// Create `path` and write the header
    pub fn create(path: &Path, sample_rate: u32) -> Result<Self> {
        let writer = WavWriter::create(path, pcm16_spec(sample_rate))
            .with_context(|| format!("failed to create WAV file {:?}", path))?;
        Ok(Self::from_writer(writer, sample_rate))
    }
}

impl<W: Write + Seek> Recorder<W> {
    /// Record into any seekable sink
    pub fn new(inner: W, sample_rate: u32) -> Result<Self> {
        let writer =
            WavWriter::new(inner, pcm16_spec(sample_rate)).context("failed to write WAV header")?;
        Ok(Self::from_writer(writer, sample_rate))
    }

    fn from_writer(writer: WavWriter<W>, sample_rate: u32) -> Self {
        Self {
            writer,
            sample_rate,
            frames: 0,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Samples written so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Audio recorded so far
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames as f64 / self.sample_rate as f64)
    }

    /// Append one block of samples
    pub fn write_block(&mut self, block: &[i16]) -> Result<()> {
        let mut samples = self.writer.get_i16_writer(block.len() as u32);
        for &sample in block {
            samples.write_sample(sample);
        }
        samples.flush().context("failed to write samples")?;
        self.frames += block.len() as u64;
        Ok(())
    }

    /// Pull `total` samples from `engine`, `block_size` at a time
    pub fn record(&mut self, engine: &mut Engine, total: u64, block_size: usize) -> Result<()> {
        let mut block = vec![0i16; block_size.max(1)];
        let mut remaining = total;
        while remaining > 0 {
            let len = remaining.min(block.len() as u64) as usize;
            engine.fill_buffer(&mut block[..len]);
            self.write_block(&block[..len])?;
            remaining -= len as u64;
        }
        Ok(())
    }

    /// Patch the header sizes and flush
    ///
    /// Dropping a recorder without this leaves a truncated header.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize().context("failed to finalize WAV file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::SceneKind;
    use std::io::Cursor;

    fn tone_engine() -> Engine {
        Engine::new(SceneKind::Tone.build(8000, None), 8000, 0.5, Some(1))
    }

    #[test]
    fn test_canonical_header() {
        let mut bytes = Cursor::new(Vec::new());
        let mut recorder = Recorder::new(&mut bytes, 44100).unwrap();
        recorder.write_block(&[0; 100]).unwrap();
        recorder.finalize().unwrap();

        let bytes = bytes.into_inner();
        assert_eq!(bytes.len(), 44 + 200);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32::from_le_bytes([bytes[40], bytes[41], bytes[42], bytes[43]]), 200);
    }

    #[test]
    fn test_record_in_uneven_blocks() {
        let mut bytes = Cursor::new(Vec::new());
        let mut recorder = Recorder::new(&mut bytes, 8000).unwrap();
        let mut engine = tone_engine();

        recorder.record(&mut engine, 1000, 64).unwrap();
        assert_eq!(recorder.frames(), 1000);
        assert_eq!(recorder.duration(), Duration::from_millis(125));
        assert_eq!(engine.clock().samples(), 1000);
        recorder.finalize().unwrap();
    }

    #[test]
    fn test_render_matches_stream() {
        let file = tempfile::NamedTempFile::new().unwrap();
        {
            let mut recorder = Recorder::create(file.path(), 8000).unwrap();
            recorder.record(&mut tone_engine(), 800, 128).unwrap();
            recorder.finalize().unwrap();
        }

        let reader = hound::WavReader::open(file.path()).unwrap();
        assert_eq!(reader.spec(), pcm16_spec(8000));

        let samples: Vec<i16> = reader.into_samples().map(|s| s.unwrap()).collect();
        let streamed: Vec<i16> = tone_engine().take(800).collect();
        assert_eq!(samples, streamed);
    }
}

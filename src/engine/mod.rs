//! Audio engine for pulsebox
//!
//! Drives a scene one sample at a time, applies the master output stage and
//! hands 16-bit samples to whoever pulls them.

mod clock;
mod mixer;
mod output;
mod recorder;
mod sequencer;

pub use clock::{Clock, StepGrid, StepTrigger};
pub use mixer::{VoicePool, MIN_VOICE_AGE, SILENCE_THRESHOLD};
pub use output::{OutputStage, PcmWriter, FULL_SCALE};
pub use recorder::Recorder;
pub use sequencer::Pattern;

use crate::config::PulseConfig;
use crate::scenes::{Scene, SceneKind};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// A synthesis session: one scene, its clock, its RNG and the output stage
pub struct Engine {
    scene: Box<dyn Scene>,
    clock: Clock,
    rng: SmallRng,
    output: OutputStage,
}

impl Engine {
    /// Create an engine around `scene`
    ///
    /// With a seed every noise burst, pluck and thunder clap is reproducible.
    pub fn new(scene: Box<dyn Scene>, sample_rate: u32, volume: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        Self {
            scene,
            clock: Clock::new(sample_rate),
            rng,
            output: OutputStage::new(volume),
        }
    }

    /// Build `kind` with tempo, volume and seed taken from `config`
    pub fn from_config(kind: SceneKind, config: &PulseConfig) -> Self {
        let sample_rate = config.audio.sample_rate;
        let scene = kind.build(sample_rate, config.bpm_for(kind));
        let volume = config.volume_for(kind);
        debug!(scene = %kind, sample_rate, volume, "engine created");
        Self::new(scene, sample_rate, volume, config.master.seed)
    }

    pub fn sample_rate(&self) -> u32 {
        self.clock.sample_rate()
    }

    pub fn scene(&self) -> SceneKind {
        self.scene.kind()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn volume(&self) -> f64 {
        self.output.volume()
    }

    /// Voices currently sounding in the scene
    pub fn active_voices(&self) -> usize {
        self.scene.active_voices()
    }

    /// Generate the next limited sample in [-1, 1]
    pub fn process(&mut self) -> f64 {
        let mix = self.scene.next_sample(&self.clock, &mut self.rng);
        self.clock.advance();
        self.output.limit(mix)
    }

    /// Generate the next 16-bit sample
    pub fn next_sample(&mut self) -> i16 {
        let mix = self.scene.next_sample(&self.clock, &mut self.rng);
        self.clock.advance();
        self.output.encode(mix)
    }

    /// Fill a buffer with samples
    pub fn fill_buffer(&mut self, buffer: &mut [i16]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Stream samples into `writer` until `running` is cleared or `limit`
    /// samples have been written
    ///
    /// Returns the number of samples written. Any write error ends the
    /// stream immediately.
    pub fn stream_to<W: Write>(
        &mut self,
        writer: &mut PcmWriter<W>,
        running: &AtomicBool,
        limit: Option<u64>,
    ) -> io::Result<u64> {
        let mut written = 0u64;
        while running.load(Ordering::Relaxed) {
            if limit.is_some_and(|limit| written >= limit) {
                break;
            }
            writer.write_sample(self.next_sample())?;
            written += 1;
        }
        writer.flush()?;
        Ok(written)
    }
}

impl Iterator for Engine {
    type Item = i16;

    /// The stream never ends on its own
    fn next(&mut self) -> Option<i16> {
        Some(self.next_sample())
    }
}

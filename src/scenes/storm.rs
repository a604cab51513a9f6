//! Rain and thunder
//!
//! Pink noise plays constantly as rain. While no thunder is rolling, every
//! sample carries a tiny chance of starting a two-second rumble.

use super::{Scene, SceneKind};
use crate::engine::{Clock, VoicePool};
use crate::synth::{Instrument, PinkNoise};
use rand::rngs::SmallRng;
use rand::Rng;
use tracing::debug;

/// Per-sample probability of a thunder clap starting
pub const THUNDER_CHANCE: f64 = 0.00005;

const RAIN_GAIN: f64 = 0.5;
const THUNDER_GAIN: f64 = 0.8;

pub struct Storm {
    rain: PinkNoise,
    thunder: VoicePool,
    claps: u64,
}

impl Storm {
    pub fn new() -> Self {
        Self {
            rain: PinkNoise::new(),
            thunder: VoicePool::with_capacity_limit(1),
            claps: 0,
        }
    }

    /// Thunder claps started so far
    pub fn claps(&self) -> u64 {
        self.claps
    }

    pub fn is_thundering(&self) -> bool {
        !self.thunder.is_empty()
    }
}

impl Default for Storm {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for Storm {
    fn kind(&self) -> SceneKind {
        SceneKind::Storm
    }

    fn next_sample(&mut self, clock: &Clock, rng: &mut SmallRng) -> f64 {
        let now = clock.time();
        let rain = self.rain.next(rng);

        if !self.is_thundering() && rng.random::<f64>() < THUNDER_CHANCE {
            self.thunder.spawn(Instrument::Thunder, now);
            self.claps += 1;
            debug!(at = now, "thunder");
        }

        let thunder = self.thunder.mix(now, rng);
        rain * RAIN_GAIN + thunder * THUNDER_GAIN
    }

    fn active_voices(&self) -> usize {
        self.thunder.len()
    }
}

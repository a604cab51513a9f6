//! Plucked strings
//!
//! Picks a random note of the A minor pentatonic scale, plucks a fresh
//! Karplus-Strong string and waits a random one, two or half beats before
//! the next pluck. Only the three most recent strings keep ringing.

use super::{Scene, SceneKind};
use crate::engine::{Clock, VoicePool};
use crate::synth::{Instrument, KarplusString};
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;

/// Four plucks per second
pub const BPM: f64 = 240.0;

/// A2, C3, D3, E3, G3, A3
const NOTES: [f64; 6] = [110.0, 130.81, 146.83, 164.81, 196.00, 220.00];

/// Gap between plucks, in beats
const RHYTHM: [f64; 3] = [1.0, 2.0, 0.5];

const MAX_STRINGS: usize = 3;

pub struct Guitar {
    samples_per_beat: u64,
    /// Sample index of the next pluck
    next_pluck: u64,
    pool: VoicePool,
}

impl Guitar {
    pub fn new(bpm: f64, sample_rate: u32) -> Self {
        Self {
            samples_per_beat: (sample_rate as f64 * 60.0 / bpm) as u64,
            next_pluck: 0,
            pool: VoicePool::with_capacity_limit(MAX_STRINGS),
        }
    }

    pub fn samples_per_beat(&self) -> u64 {
        self.samples_per_beat
    }

    fn pluck(&mut self, clock: &Clock, rng: &mut SmallRng) {
        let freq = NOTES.choose(rng).copied().unwrap_or(NOTES[0]);
        let string = KarplusString::new(freq, clock.sample_rate() as f64, rng);
        self.pool.spawn(Instrument::Pluck(string), clock.time());

        let beats = RHYTHM.choose(rng).copied().unwrap_or(1.0);
        let gap = (self.samples_per_beat as f64 * beats).ceil() as u64;
        self.next_pluck = clock.samples() + gap.max(1);
    }
}

impl Scene for Guitar {
    fn kind(&self) -> SceneKind {
        SceneKind::Guitar
    }

    fn next_sample(&mut self, clock: &Clock, rng: &mut SmallRng) -> f64 {
        if clock.samples() >= self.next_pluck {
            self.pluck(clock, rng);
        }
        self.pool.mix(clock.time(), rng)
    }

    fn active_voices(&self) -> usize {
        self.pool.len()
    }
}

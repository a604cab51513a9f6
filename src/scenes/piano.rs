//! Electric piano comping a ii-V-I-vi progression
//!
//! Every chord is strummed: each note starts 50 ms after the one below it.
//! Chords last two seconds, but on each change there is a 30% chance the
//! next ones switch to one, two or four seconds.

use super::{Scene, SceneKind};
use crate::engine::{Clock, Pattern, VoicePool};
use crate::synth::{note, Instrument};
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

const PROGRESSION: [[&str; 4]; 4] = [
    ["D3", "F3", "A3", "C4"], // Dm7
    ["G2", "F3", "A3", "B3"], // G7
    ["C3", "E3", "G3", "B3"], // Cmaj7
    ["A2", "C3", "E3", "G3"], // Am7
];

const STRUM_DELAY: f64 = 0.05;
const NOTE_DECAY: f64 = 2.0;
const INITIAL_CHORD_SECONDS: f64 = 2.0;
const CHORD_LENGTHS: [f64; 3] = [1.0, 2.0, 4.0];
const CHANGE_LENGTH_CHANCE: f64 = 0.3;

/// Two full chords may ring at once
const MAX_VOICES: usize = 8;

pub struct Piano {
    progression: Pattern<Vec<f64>>,
    /// Number of chords struck so far
    chords_played: u64,
    /// Sample index at which the current chord was struck
    chord_start: u64,
    chord_seconds: f64,
    pool: VoicePool,
}

impl Piano {
    pub fn new() -> Self {
        let progression: Vec<Vec<f64>> = PROGRESSION
            .iter()
            .map(|names| names.iter().filter_map(|name| note(name).ok()).collect())
            .collect();

        Self {
            progression: Pattern::new(progression),
            chords_played: 0,
            chord_start: 0,
            chord_seconds: INITIAL_CHORD_SECONDS,
            pool: VoicePool::with_capacity_limit(MAX_VOICES),
        }
    }

    /// Length of the current chord in seconds
    pub fn chord_seconds(&self) -> f64 {
        self.chord_seconds
    }

    fn strike(&mut self, clock: &Clock) {
        let now = clock.time();
        let chord = self.progression.at(self.chords_played);
        for (i, &freq) in chord.iter().enumerate() {
            let onset = now + STRUM_DELAY * i as f64;
            self.pool.spawn(
                Instrument::Piano {
                    freq,
                    decay: NOTE_DECAY,
                },
                onset,
            );
        }

        self.chord_start = clock.samples();
        self.chords_played += 1;
    }

    fn chord_finished(&self, clock: &Clock) -> bool {
        let length = clock.seconds_to_samples(self.chord_seconds);
        clock.samples() - self.chord_start >= length
    }
}

impl Default for Piano {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for Piano {
    fn kind(&self) -> SceneKind {
        SceneKind::Piano
    }

    fn next_sample(&mut self, clock: &Clock, rng: &mut SmallRng) -> f64 {
        if self.chords_played == 0 {
            self.strike(clock);
        } else if self.chord_finished(clock) {
            if rng.random::<f64>() < CHANGE_LENGTH_CHANCE {
                self.chord_seconds = CHORD_LENGTHS
                    .choose(rng)
                    .copied()
                    .unwrap_or(INITIAL_CHORD_SECONDS);
                debug!(seconds = self.chord_seconds, "chord length changed");
            }
            self.strike(clock);
        }
        self.pool.mix(clock.time(), rng)
    }

    fn active_voices(&self) -> usize {
        self.pool.len()
    }
}

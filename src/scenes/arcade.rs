//! Chiptune "level 1" theme
//!
//! Sixteenth-note saw bass, a chip kick on every beat, a noise snare on
//! beats two and four, and a square lead stepping through an A minor
//! arpeggio one beat at a time.

use super::{Scene, SceneKind};
use crate::engine::{Clock, Pattern, StepGrid, StepTrigger, VoicePool};
use crate::synth::{BassShape, Instrument};
use rand::rngs::SmallRng;

pub const BPM: f64 = 135.0;
const STEPS_PER_BEAT: u32 = 4;

/// A, A, C, A, D, A, C, A
const BASS_LINE: [f64; 8] = [55.0, 55.0, 65.4, 55.0, 73.4, 55.0, 65.4, 55.0];

/// (frequency, length in beats): A C E A G E C D
const LEAD_MELODY: [(f64, f64); 8] = [
    (440.0, 0.5),
    (523.25, 0.5),
    (659.25, 0.5),
    (880.0, 0.5),
    (783.99, 0.5),
    (659.25, 0.5),
    (523.25, 0.5),
    (587.33, 0.5),
];

pub struct Arcade {
    seconds_per_beat: f64,
    steps: StepTrigger,
    beats: StepTrigger,
    bass_line: Pattern<f64>,
    melody: Pattern<(f64, f64)>,
    pool: VoicePool,
}

impl Arcade {
    pub fn new(bpm: f64) -> Self {
        Self {
            seconds_per_beat: 60.0 / bpm,
            steps: StepTrigger::new(StepGrid::new(bpm, STEPS_PER_BEAT)),
            beats: StepTrigger::new(StepGrid::new(bpm, 1)),
            bass_line: Pattern::new(BASS_LINE.to_vec()),
            melody: Pattern::new(LEAD_MELODY.to_vec()),
            pool: VoicePool::new(),
        }
    }

    fn on_step(&mut self, step: u64, now: f64) {
        if step % 4 == 0 {
            self.pool.spawn(Instrument::ChipKick, now);
        }
        if step % 8 == 4 {
            self.pool.spawn(Instrument::Snare, now);
        }

        let freq = *self.bass_line.at(step);
        self.pool.spawn(
            Instrument::Bass {
                freq,
                shape: BassShape::Saw,
            },
            now,
        );
    }

    fn on_beat(&mut self, beat: u64, now: f64) {
        let (freq, beats) = *self.melody.at(beat);
        self.pool.spawn(
            Instrument::Lead {
                freq,
                duration: beats * self.seconds_per_beat,
            },
            now,
        );
    }
}

impl Scene for Arcade {
    fn kind(&self) -> SceneKind {
        SceneKind::Arcade
    }

    fn next_sample(&mut self, clock: &Clock, rng: &mut SmallRng) -> f64 {
        let now = clock.time();
        if let Some(step) = self.steps.poll(now) {
            self.on_step(step, now);
        }
        if let Some(beat) = self.beats.poll(now) {
            self.on_beat(beat, now);
        }
        self.pool.mix(now, rng)
    }

    fn active_voices(&self) -> usize {
        self.pool.len()
    }
}

//! Random-walk melody
//!
//! Starts on middle C and wanders by a small random interval every eighth
//! note, staying on the C major scale and inside three octaves.

use super::{Scene, SceneKind};
use crate::engine::{Clock, StepGrid, StepTrigger, VoicePool};
use crate::synth::{midi_to_hz, Instrument, Scale};
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use tracing::debug;

pub const BPM: f64 = 120.0;
const STEPS_PER_BEAT: u32 = 2;

const START_PITCH: i32 = 60;
const LOWEST: i32 = 48;
const HIGHEST: i32 = 84;
const MOVES: [i32; 4] = [-1, 1, 0, 2];
const NOTE_DECAY: f64 = 0.5;

pub struct Walk {
    steps: StepTrigger,
    scale: Scale,
    pitch: i32,
    pool: VoicePool,
}

impl Walk {
    pub fn new(bpm: f64) -> Self {
        Self {
            steps: StepTrigger::new(StepGrid::new(bpm, STEPS_PER_BEAT)),
            scale: Scale::major(),
            pitch: START_PITCH,
            pool: VoicePool::with_capacity_limit(8),
        }
    }

    /// MIDI pitch of the most recent note
    pub fn pitch(&self) -> i32 {
        self.pitch
    }

    fn wander(&mut self, rng: &mut SmallRng) {
        let step = MOVES.choose(rng).copied().unwrap_or(0);
        let mut pitch = self.pitch + step;
        if pitch > HIGHEST {
            pitch -= 12;
        }
        if pitch < LOWEST {
            pitch += 12;
        }
        self.pitch = self.scale.snap_down(START_PITCH, pitch).max(LOWEST);
    }
}

impl Scene for Walk {
    fn kind(&self) -> SceneKind {
        SceneKind::Walk
    }

    fn next_sample(&mut self, clock: &Clock, rng: &mut SmallRng) -> f64 {
        let now = clock.time();
        if let Some(step) = self.steps.poll(now) {
            if step > 0 {
                self.wander(rng);
            }
            debug!(pitch = self.pitch, "note");
            self.pool.spawn(
                Instrument::Piano {
                    freq: midi_to_hz(self.pitch),
                    decay: NOTE_DECAY,
                },
                now,
            );
        }
        self.pool.mix(now, rng)
    }

    fn active_voices(&self) -> usize {
        self.pool.len()
    }
}

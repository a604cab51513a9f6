//! Small orchestra loop
//!
//! A four-beat score of kick, hats, triangle bass and a bowed C major
//! chord, one entry per beat.

use super::{Scene, SceneKind};
use crate::engine::{Clock, Pattern, StepGrid, StepTrigger, VoicePool};
use crate::synth::{BassShape, Instrument};
use rand::rngs::SmallRng;

pub const BPM: f64 = 100.0;

/// What a score entry can ask for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    Kick,
    Hat,
    /// Low C
    BassC,
    /// Low G
    BassG,
    /// C major triad on strings
    Chord,
}

const SCORE: [&[Hit]; 4] = [
    &[Hit::Kick, Hit::Hat, Hit::Chord],
    &[Hit::Hat],
    &[Hit::Kick, Hit::Hat, Hit::BassC],
    &[Hit::Hat, Hit::BassG],
];

const CHORD: [f64; 3] = [261.63, 329.63, 392.00];
const CHORD_SECONDS: f64 = 1.0;

pub struct Orchestra {
    beats: StepTrigger,
    score: Pattern<&'static [Hit]>,
    pool: VoicePool,
}

impl Orchestra {
    pub fn new(bpm: f64) -> Self {
        Self {
            beats: StepTrigger::new(StepGrid::new(bpm, 1)),
            score: Pattern::new(SCORE.to_vec()),
            pool: VoicePool::new(),
        }
    }

    fn play(&mut self, hit: Hit, now: f64) {
        match hit {
            Hit::Kick => self.pool.spawn(Instrument::Kick, now),
            Hit::Hat => self.pool.spawn(Instrument::Hat, now),
            Hit::BassC => self.pool.spawn(triangle_bass(65.4), now),
            Hit::BassG => self.pool.spawn(triangle_bass(98.0), now),
            Hit::Chord => {
                for freq in CHORD {
                    self.pool.spawn(
                        Instrument::Violin {
                            freq,
                            duration: CHORD_SECONDS,
                        },
                        now,
                    );
                }
            }
        }
    }
}

fn triangle_bass(freq: f64) -> Instrument {
    Instrument::Bass {
        freq,
        shape: BassShape::Triangle,
    }
}

impl Scene for Orchestra {
    fn kind(&self) -> SceneKind {
        SceneKind::Orchestra
    }

    fn next_sample(&mut self, clock: &Clock, rng: &mut SmallRng) -> f64 {
        let now = clock.time();
        if let Some(beat) = self.beats.poll(now) {
            let hits = *self.score.at(beat);
            for &hit in hits {
                self.play(hit, now);
            }
        }
        self.pool.mix(now, rng)
    }

    fn active_voices(&self) -> usize {
        self.pool.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_downbeat_spawns_kick_hat_and_chord() {
        let mut orchestra = Orchestra::new(BPM);
        let mut rng = SmallRng::seed_from_u64(2);
        let clock = Clock::new(44100);

        orchestra.next_sample(&clock, &mut rng);
        assert_eq!(orchestra.active_voices(), 5);

        let violins = orchestra
            .pool
            .voices()
            .iter()
            .filter(|v| matches!(v.instrument(), Instrument::Violin { .. }))
            .count();
        assert_eq!(violins, 3);
    }

    #[test]
    fn test_score_cycles_every_four_beats() {
        let orchestra = Orchestra::new(BPM);
        assert_eq!(orchestra.score.len(), 4);
        assert_eq!(*orchestra.score.at(4), *orchestra.score.at(0));
        assert_eq!(*orchestra.score.at(7), &[Hit::Hat, Hit::BassG][..]);
    }

    #[test]
    fn test_pool_stays_bounded() {
        let mut orchestra = Orchestra::new(BPM);
        let mut rng = SmallRng::seed_from_u64(4);
        let mut clock = Clock::new(44100);

        let mut most = 0;
        for _ in 0..44100 * 10 {
            orchestra.next_sample(&clock, &mut rng);
            most = most.max(orchestra.active_voices());
            clock.advance();
        }
        // Finished voices are retired, so the pool never accumulates a backlog
        assert!(most <= 8, "pool grew to {}", most);
    }
}

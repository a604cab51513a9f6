//! Steady sine test tone

use super::{Scene, SceneKind};
use crate::engine::Clock;
use crate::synth::sine;
use rand::rngs::SmallRng;

/// Concert A
pub const FREQUENCY: f64 = 440.0;

pub struct Tone {
    frequency: f64,
}

impl Tone {
    pub fn new(frequency: f64) -> Self {
        Self { frequency }
    }
}

impl Scene for Tone {
    fn kind(&self) -> SceneKind {
        SceneKind::Tone
    }

    fn next_sample(&mut self, clock: &Clock, _rng: &mut SmallRng) -> f64 {
        sine(clock.time(), self.frequency)
    }

    fn active_voices(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_tone_is_sine() {
        let mut tone = Tone::new(FREQUENCY);
        let mut rng = SmallRng::seed_from_u64(0);
        let mut clock = Clock::new(44100);
        for n in 0..1000 {
            let expected = (2.0 * std::f64::consts::PI * 440.0 * n as f64 / 44100.0).sin();
            assert!((tone.next_sample(&clock, &mut rng) - expected).abs() < 1e-9);
            clock.advance();
        }
    }
}

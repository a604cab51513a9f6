//! Voice pool and mixer
//!
//! The pool owns every sounding voice. Once per sample it renders each
//! voice that has reached its onset, sums the results, and drops voices
//! that have gone quiet. Retirement is mark-and-compact (`retain_mut`), so
//! every voice is visited exactly once per sample regardless of removals.

use crate::synth::{Instrument, Voice};
use rand::Rng;

/// Envelope level below which a voice counts as silent
pub const SILENCE_THRESHOLD: f64 = 0.001;

/// Minimum age in seconds before a quiet voice may be retired
pub const MIN_VOICE_AGE: f64 = 0.5;

/// The set of active voices
#[derive(Debug, Clone, Default)]
pub struct VoicePool {
    voices: Vec<Voice>,
    /// Maximum simultaneous voices; the oldest is evicted beyond this
    max_voices: Option<usize>,
}

impl VoicePool {
    /// Create an unbounded pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pool that keeps at most `max_voices` voices
    pub fn with_capacity_limit(max_voices: usize) -> Self {
        Self {
            voices: Vec::with_capacity(max_voices + 1),
            max_voices: Some(max_voices.max(1)),
        }
    }

    pub fn max_voices(&self) -> Option<usize> {
        self.max_voices
    }

    /// Number of voices currently held
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Start `instrument` at global time `onset`
    ///
    /// When the pool is full the oldest voice is dropped regardless of how
    /// loud it still is.
    pub fn spawn(&mut self, instrument: Instrument, onset: f64) {
        self.voices.push(Voice::new(instrument, onset));
        if let Some(max) = self.max_voices {
            if self.voices.len() > max {
                let excess = self.voices.len() - max;
                self.voices.drain(..excess);
            }
        }
    }

    /// Drop every voice
    pub fn clear(&mut self) {
        self.voices.clear();
    }

    /// Render and sum all voices at global time `now`
    ///
    /// Voices whose onset lies in the future are skipped untouched. A voice
    /// is retired on the sample where it is both quiet and older than
    /// [`MIN_VOICE_AGE`], or once it passes its instrument's cutoff; a
    /// retired voice contributes nothing to that sample or any later one.
    pub fn mix<R: Rng + ?Sized>(&mut self, now: f64, rng: &mut R) -> f64 {
        let mut sum = 0.0;

        self.voices.retain_mut(|voice| {
            let t = voice.local_time(now);
            if t < 0.0 {
                return true;
            }

            let value = voice.render(t, rng);
            let quiet = voice.level(t) < SILENCE_THRESHOLD && t > MIN_VOICE_AGE;
            if quiet || voice.is_past_cutoff(t) {
                return false;
            }

            sum += value;
            true
        });

        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{BassShape, KarplusString};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const RATE: f64 = 44100.0;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(99)
    }

    #[test]
    fn test_pool_creation() {
        let pool = VoicePool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.max_voices(), None);
    }

    #[test]
    fn test_pool_sums_voices() {
        let mut rng = rng();
        let mut pool = VoicePool::new();
        let bass = Instrument::Bass { freq: 55.0, shape: BassShape::Saw };
        pool.spawn(bass.clone(), 0.0);
        pool.spawn(bass.clone(), 0.0);

        let t = 0.01;
        let single = bass.clone().render(t, &mut rng);
        let mixed = pool.mix(t, &mut rng);
        assert!((mixed - 2.0 * single).abs() < 1e-12);
    }

    #[test]
    fn test_future_voice_is_silent_until_onset() {
        let mut rng = rng();
        let mut pool = VoicePool::new();
        pool.spawn(Instrument::Piano { freq: 261.63, decay: 2.0 }, 1.0);

        for n in 0..44100 {
            assert_eq!(pool.mix(n as f64 / RATE, &mut rng), 0.0);
        }
        assert_eq!(pool.len(), 1);

        let mut heard = false;
        for n in 44100..44200 {
            heard |= pool.mix(n as f64 / RATE, &mut rng) != 0.0;
        }
        assert!(heard);
    }

    #[test]
    fn test_retired_after_cutoff() {
        let mut rng = rng();
        let mut pool = VoicePool::new();
        pool.spawn(Instrument::Hat, 0.0);

        let mut n = 0u64;
        while !pool.is_empty() {
            pool.mix(n as f64 / RATE, &mut rng);
            n += 1;
        }
        // 0.05 s cutoff is 2205 samples; removed on the first sample past it
        assert_eq!(n, 2207);

        for m in n..n + 1000 {
            assert_eq!(pool.mix(m as f64 / RATE, &mut rng), 0.0);
        }
    }

    #[test]
    fn test_kick_silent_after_cutoff() {
        let mut rng = rng();
        let mut pool = VoicePool::new();
        pool.spawn(Instrument::Kick, 0.0);

        let mut output = Vec::new();
        let mut n = 0u64;
        while !pool.is_empty() {
            output.push(pool.mix(n as f64 / RATE, &mut rng));
            n += 1;
        }
        // 0.3 s at 44.1 kHz
        let last = n - 1;
        assert!((13_230..=13_232).contains(&last), "retired at {}", last);

        let head = output[..2205].iter().fold(0.0f64, |m, v| m.max(v.abs()));
        let tail = output[11_025..13_230].iter().fold(0.0f64, |m, v| m.max(v.abs()));
        assert!(tail < head / 3.0);

        for m in n..n + 44_100 {
            assert_eq!(pool.mix(m as f64 / RATE, &mut rng), 0.0);
        }
    }

    #[test]
    fn test_quiet_voice_kept_until_min_age() {
        let mut rng = rng();
        let mut pool = VoicePool::new();
        // A bowed note starts from zero level
        pool.spawn(Instrument::Violin { freq: 261.63, duration: 1.0 }, 0.0);

        for n in 0..(0.4 * RATE) as u64 {
            pool.mix(n as f64 / RATE, &mut rng);
        }
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_fading_voice_retired_when_quiet_and_old() {
        let mut rng = rng();
        let mut pool = VoicePool::new();
        let decay = 0.5;
        pool.spawn(Instrument::Piano { freq: 440.0, decay }, 0.0);

        let mut n = 0u64;
        while !pool.is_empty() {
            pool.mix(n as f64 / RATE, &mut rng);
            n += 1;
        }

        // 0.5 · exp(-3t / decay) drops below the threshold at t = ln(500) · decay / 3
        let expected = (500f64).ln() * decay / 3.0;
        let retired_at = (n - 1) as f64 / RATE;
        assert!(retired_at >= expected);
        assert!(retired_at - expected < 2.0 / RATE);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut rng = rng();
        let mut pool = VoicePool::with_capacity_limit(3);
        for (i, freq) in [110.0, 130.81, 146.83, 164.81, 196.0].iter().enumerate() {
            let string = KarplusString::new(*freq, RATE, &mut rng);
            pool.spawn(Instrument::Pluck(string), i as f64);
        }

        assert_eq!(pool.len(), 3);
        let onsets: Vec<f64> = pool.voices().iter().map(|v| v.onset()).collect();
        assert_eq!(onsets, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_removal_does_not_skip_neighbours() {
        let mut rng = rng();
        let mut pool = VoicePool::new();
        // Hat retires first; the bass voices after it must still be rendered
        pool.spawn(Instrument::Hat, 0.0);
        let bass = Instrument::Bass { freq: 65.4, shape: BassShape::Triangle };
        pool.spawn(bass.clone(), 0.0);
        pool.spawn(bass.clone(), 0.0);

        let t = 0.06;
        let expected = 2.0 * bass.clone().render(t, &mut rng);
        let mixed = pool.mix(t, &mut rng);
        assert_eq!(pool.len(), 2);
        assert!((mixed - expected).abs() < 1e-12);
    }

    #[test]
    fn test_clear() {
        let mut pool = VoicePool::new();
        pool.spawn(Instrument::Kick, 0.0);
        pool.clear();
        assert!(pool.is_empty());
    }
}

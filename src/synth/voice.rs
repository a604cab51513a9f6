//! A sounding note

use super::Instrument;
use rand::Rng;

/// One active sound: an instrument plus the moment it started
#[derive(Debug, Clone)]
pub struct Voice {
    instrument: Instrument,
    /// Global time of the onset, in seconds
    onset: f64,
}

impl Voice {
    pub fn new(instrument: Instrument, onset: f64) -> Self {
        Self { instrument, onset }
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub fn onset(&self) -> f64 {
        self.onset
    }

    /// Seconds since onset; negative while the voice is still scheduled
    pub fn local_time(&self, now: f64) -> f64 {
        now - self.onset
    }

    /// Whether the onset has been reached at global time `now`
    pub fn has_started(&self, now: f64) -> bool {
        self.local_time(now) >= 0.0
    }

    /// Render one sample at local time `t` (must be non-negative)
    pub fn render<R: Rng + ?Sized>(&mut self, t: f64, rng: &mut R) -> f64 {
        debug_assert!(t >= 0.0, "voice rendered before its onset");
        self.instrument.render(t, rng)
    }

    /// Envelope level at local time `t`
    pub fn level(&self, t: f64) -> f64 {
        self.instrument.level(t)
    }

    /// Whether `t` is past the instrument's hard cutoff
    pub fn is_past_cutoff(&self, t: f64) -> bool {
        self.instrument.cutoff().is_some_and(|cutoff| t > cutoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_local_time() {
        let voice = Voice::new(Instrument::Hat, 1.5);
        assert_eq!(voice.onset(), 1.5);
        assert_eq!(voice.local_time(2.0), 0.5);
        assert!(!voice.has_started(1.0));
        assert!(voice.has_started(1.5));
    }

    #[test]
    fn test_voice_cutoff() {
        let voice = Voice::new(Instrument::Kick, 0.0);
        assert!(!voice.is_past_cutoff(0.3));
        assert!(voice.is_past_cutoff(0.31));

        let piano = Voice::new(Instrument::Piano { freq: 220.0, decay: 2.0 }, 0.0);
        assert!(!piano.is_past_cutoff(1000.0));
    }
}

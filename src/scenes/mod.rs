//! Scenes: complete generators built from sequencers and voice pools
//!
//! A scene owns its patterns, its voices and any background layers. The
//! engine asks it for one mixed sample at a time.

mod arcade;
mod guitar;
mod orchestra;
mod piano;
mod storm;
mod tone;
mod walk;

pub use arcade::Arcade;
pub use guitar::Guitar;
pub use orchestra::Orchestra;
pub use piano::Piano;
pub use storm::Storm;
pub use tone::Tone;
pub use walk::Walk;

use crate::engine::Clock;
use rand::rngs::SmallRng;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A generator producing one pre-volume mix value per sample
pub trait Scene: Send {
    fn kind(&self) -> SceneKind;

    /// Advance sequencers to `clock` and return the summed voices
    fn next_sample(&mut self, clock: &Clock, rng: &mut SmallRng) -> f64;

    /// Voices currently held by the scene's pool
    fn active_voices(&self) -> usize;
}

/// Unknown scene name
#[derive(Debug, Error, PartialEq)]
#[error("unknown scene '{0}' (expected one of: {names})", names = SceneKind::names().join(", "))]
pub struct SceneError(pub String);

/// Every built-in scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    /// Chiptune action theme: square lead, saw bass, noise snare
    Arcade,
    /// Kick, hats, triangle bass and a bowed string chord
    Orchestra,
    /// Random Karplus-Strong plucks over a pentatonic scale
    Guitar,
    /// FM electric piano strumming a jazz progression
    Piano,
    /// Pink-noise rain with occasional thunder
    Storm,
    /// Random-walk melody on the FM piano
    Walk,
    /// Steady 440 Hz sine
    Tone,
}

impl SceneKind {
    pub const ALL: [SceneKind; 7] = [
        SceneKind::Arcade,
        SceneKind::Orchestra,
        SceneKind::Guitar,
        SceneKind::Piano,
        SceneKind::Storm,
        SceneKind::Walk,
        SceneKind::Tone,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SceneKind::Arcade => "arcade",
            SceneKind::Orchestra => "orchestra",
            SceneKind::Guitar => "guitar",
            SceneKind::Piano => "piano",
            SceneKind::Storm => "storm",
            SceneKind::Walk => "walk",
            SceneKind::Tone => "tone",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|kind| kind.name()).collect()
    }

    pub fn description(&self) -> &'static str {
        match self {
            SceneKind::Arcade => "chiptune theme: square lead, saw bass, noise snare",
            SceneKind::Orchestra => "kick, hats, triangle bass and a bowed C major chord",
            SceneKind::Guitar => "random plucked strings over A minor pentatonic",
            SceneKind::Piano => "FM electric piano strumming ii-V-I-vi",
            SceneKind::Storm => "pink-noise rain with rare thunder",
            SceneKind::Walk => "random-walk melody on the electric piano",
            SceneKind::Tone => "steady 440 Hz sine test tone",
        }
    }

    /// Master volume the scene was mixed for
    pub fn default_volume(&self) -> f64 {
        match self {
            SceneKind::Arcade => 0.5,
            SceneKind::Orchestra => 0.6,
            SceneKind::Guitar => 20000.0 / 32767.0,
            SceneKind::Piano => 0.5,
            SceneKind::Storm => 0.3,
            SceneKind::Walk => 0.5,
            SceneKind::Tone => 1.0,
        }
    }

    /// Tempo for scenes driven by a beat grid
    pub fn default_bpm(&self) -> Option<f64> {
        match self {
            SceneKind::Arcade => Some(arcade::BPM),
            SceneKind::Orchestra => Some(orchestra::BPM),
            SceneKind::Guitar => Some(guitar::BPM),
            SceneKind::Walk => Some(walk::BPM),
            SceneKind::Piano | SceneKind::Storm | SceneKind::Tone => None,
        }
    }

    /// Construct the scene, optionally overriding its tempo
    pub fn build(&self, sample_rate: u32, bpm: Option<f64>) -> Box<dyn Scene> {
        let bpm = bpm.or(self.default_bpm()).unwrap_or(120.0);
        match self {
            SceneKind::Arcade => Box::new(Arcade::new(bpm)),
            SceneKind::Orchestra => Box::new(Orchestra::new(bpm)),
            SceneKind::Guitar => Box::new(Guitar::new(bpm, sample_rate)),
            SceneKind::Piano => Box::new(Piano::new()),
            SceneKind::Storm => Box::new(Storm::new()),
            SceneKind::Walk => Box::new(Walk::new(bpm)),
            SceneKind::Tone => Box::new(Tone::new(tone::FREQUENCY)),
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| SceneError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_parse_scene_names() {
        assert_eq!("arcade".parse::<SceneKind>(), Ok(SceneKind::Arcade));
        assert_eq!("Storm".parse::<SceneKind>(), Ok(SceneKind::Storm));
        assert_eq!(" guitar ".parse::<SceneKind>(), Ok(SceneKind::Guitar));

        let err = "polka".parse::<SceneKind>().unwrap_err();
        assert_eq!(err, SceneError("polka".to_string()));
        assert!(err.to_string().contains("orchestra"));
    }

    #[test]
    fn test_names_round_trip() {
        for kind in SceneKind::ALL {
            assert_eq!(kind.to_string().parse::<SceneKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_default_volumes_in_range() {
        for kind in SceneKind::ALL {
            let volume = kind.default_volume();
            assert!(volume > 0.0 && volume <= 1.0, "{} volume {}", kind, volume);
        }
    }

    #[test]
    fn test_every_scene_builds_and_plays() {
        let mut rng = SmallRng::seed_from_u64(1);
        for kind in SceneKind::ALL {
            let mut scene = kind.build(44100, None);
            assert_eq!(scene.kind(), kind);

            let mut clock = Clock::new(44100);
            let mut peak = 0.0f64;
            for _ in 0..44100 {
                let value = scene.next_sample(&clock, &mut rng);
                assert!(value.is_finite(), "{} produced {}", kind, value);
                peak = peak.max(value.abs());
                clock.advance();
            }
            assert!(peak > 0.0, "{} was silent", kind);
        }
    }
}

//! Instrument models
//!
//! Each instrument pairs a waveform with an amplitude envelope that is a
//! pure function of the voice's local time. Past its cutoff an instrument
//! renders silence rather than failing.

use super::oscillator::{saw, sine, white_noise, Waveform};
use super::string::KarplusString;
use rand::Rng;

/// Shape of a bass voice
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BassShape {
    /// Bright, short chiptune saw
    Saw,
    /// Rectified saw folded into a triangle, longer tail
    Triangle,
}

impl BassShape {
    fn gain(&self) -> f64 {
        match self {
            BassShape::Saw => 0.8,
            BassShape::Triangle => 0.6,
        }
    }

    fn decay_rate(&self) -> f64 {
        match self {
            BassShape::Saw => 10.0,
            BassShape::Triangle => 1.0,
        }
    }

    /// Seconds after which the voice is silent
    pub fn cutoff(&self) -> f64 {
        match self {
            BassShape::Saw => 0.2,
            BassShape::Triangle => 0.5,
        }
    }
}

/// What a voice plays
#[derive(Debug, Clone)]
pub enum Instrument {
    /// Sine kick sweeping exponentially down from 150 Hz
    Kick,
    /// Chiptune kick with a linear sweep down from 60 Hz
    ChipKick,
    /// Noise burst
    Snare,
    /// Very short noise tick
    Hat,
    Bass { freq: f64, shape: BassShape },
    /// Square "laser" lead sliding down in pitch
    Lead { freq: f64, duration: f64 },
    /// Bowed saw with vibrato
    Violin { freq: f64, duration: f64 },
    /// Two-operator FM electric piano
    Piano { freq: f64, decay: f64 },
    /// Long rumbling noise swell
    Thunder,
    Pluck(KarplusString),
}

impl Instrument {
    /// Seconds after onset past which the instrument is guaranteed silent
    ///
    /// `None` means the sound only ever fades out.
    pub fn cutoff(&self) -> Option<f64> {
        match self {
            Instrument::Kick => Some(0.3),
            Instrument::ChipKick => Some(0.2),
            Instrument::Snare => Some(0.15),
            Instrument::Hat => Some(0.05),
            Instrument::Bass { shape, .. } => Some(shape.cutoff()),
            Instrument::Lead { duration, .. } | Instrument::Violin { duration, .. } => {
                Some(*duration)
            }
            Instrument::Thunder => Some(2.0),
            Instrument::Piano { .. } | Instrument::Pluck(_) => None,
        }
    }

    /// Envelope level at local time `t`, independent of the waveform's phase
    pub fn level(&self, t: f64) -> f64 {
        if self.cutoff().is_some_and(|cutoff| t > cutoff) {
            return 0.0;
        }
        match self {
            Instrument::Kick => 0.8 * (-5.0 * t).exp(),
            Instrument::ChipKick => 0.8,
            Instrument::Snare => 0.6 * (-20.0 * t).exp(),
            Instrument::Hat => 0.4 * (-50.0 * t).exp(),
            Instrument::Bass { shape, .. } => shape.gain() * (-shape.decay_rate() * t).exp(),
            Instrument::Lead { .. } => 0.4 * (-2.0 * t).exp(),
            Instrument::Violin { duration, .. } => 0.4 * bow_envelope(t, *duration),
            Instrument::Piano { decay, .. } => 0.5 * piano_envelope(t, *decay),
            Instrument::Thunder => 0.8 * (-1.5 * t).exp(),
            Instrument::Pluck(string) => string.rms(),
        }
    }

    /// Render one sample at local time `t`
    ///
    /// Plucked strings advance their delay line on every call, so this must
    /// be called exactly once per output sample.
    pub fn render<R: Rng + ?Sized>(&mut self, t: f64, rng: &mut R) -> f64 {
        if let Instrument::Pluck(string) = self {
            return string.next_sample();
        }

        let level = self.level(t);
        if level == 0.0 {
            return 0.0;
        }

        let tone = match self {
            Instrument::Kick => sine(t, 150.0 * (-15.0 * t).exp()),
            Instrument::ChipKick => sine(t, 60.0 * (1.0 - 4.0 * t)),
            Instrument::Snare | Instrument::Hat | Instrument::Thunder => white_noise(rng),
            Instrument::Bass { freq, shape } => match shape {
                BassShape::Saw => saw(t, *freq),
                BassShape::Triangle => saw(t, *freq).abs() * 2.0 - 1.0,
            },
            Instrument::Lead { freq, .. } => Waveform::SQUARE.sample(t, *freq - 10.0 * t),
            Instrument::Violin { freq, .. } => {
                let vibrato = 1.0 + 0.01 * sine(t, 6.0);
                saw(t, *freq * vibrato)
            }
            Instrument::Piano { freq, decay } => {
                let index = 2.0 * piano_envelope(t, *decay);
                fm_operator(t, *freq, *freq, index)
            }
            Instrument::Pluck(_) => 0.0,
        };

        tone * level
    }
}

/// Attack/decay ramp of a bowed note: rises over 0.2 s, falls over the
/// last 0.2 s of `duration`
pub fn bow_envelope(t: f64, duration: f64) -> f64 {
    let attack = (t * 5.0).min(1.0);
    let decay = ((duration - t) * 5.0).max(0.0);
    attack.min(decay)
}

/// Electric piano amplitude, also used as the modulation depth
pub fn piano_envelope(t: f64, decay: f64) -> f64 {
    (-3.0 * t / decay).exp()
}

/// `sin(2π·fc·t + index·sin(2π·fm·t))`
pub fn fm_operator(t: f64, carrier: f64, modulator: f64, index: f64) -> f64 {
    let phase = 2.0 * std::f64::consts::PI * carrier * t;
    (phase + index * sine(t, modulator)).sin()
}

//! Waveform generators
//!
//! Periodic waveforms are pure functions of elapsed time and frequency, so a
//! voice only has to remember when it started. Noise sources draw from the
//! session RNG that is passed in.

use rand::Rng;
use std::f64::consts::PI;

/// Periodic waveform shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    Sine,
    Saw,
    /// Pulse wave, `duty` is the fraction of the period spent high
    Square { duty: f64 },
}

impl Waveform {
    /// 50% duty square, the classic NES lead tone
    pub const SQUARE: Waveform = Waveform::Square { duty: 0.5 };

    /// Evaluate the waveform at time `t` seconds for frequency `freq` Hz
    pub fn sample(&self, t: f64, freq: f64) -> f64 {
        match *self {
            Waveform::Sine => sine(t, freq),
            Waveform::Saw => saw(t, freq),
            Waveform::Square { duty } => square(t, freq, duty),
        }
    }
}

/// `sin(2π·f·t)`
pub fn sine(t: f64, freq: f64) -> f64 {
    (2.0 * PI * freq * t).sin()
}

/// Centered sawtooth in [-1, 1], zero at the start of each period
pub fn saw(t: f64, freq: f64) -> f64 {
    let cycles = t * freq;
    2.0 * (cycles - (0.5 + cycles).floor())
}

/// Pulse wave: +1 while the phase is below `duty`, -1 for the rest
pub fn square(t: f64, freq: f64, duty: f64) -> f64 {
    let cycles = t * freq;
    let phase = cycles - cycles.floor();
    if phase < duty {
        1.0
    } else {
        -1.0
    }
}

/// One uniform sample in [-1, 1]
pub fn white_noise<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random_range(-1.0..=1.0)
}

/// Pink noise using Paul Kellet's refined filter
///
/// Six leaky accumulators, each fed the same white sample, approximate a
/// -3 dB/octave slope. The state lives for the lifetime of one stream.
#[derive(Debug, Clone, Default)]
pub struct PinkNoise {
    state: [f64; 6],
}

impl PinkNoise {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next sample
    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        let white = white_noise(rng);

        self.state[0] = 0.99886 * self.state[0] + white * 0.0555179;
        self.state[1] = 0.99332 * self.state[1] + white * 0.0750759;
        self.state[2] = 0.96900 * self.state[2] + white * 0.1538520;
        self.state[3] = 0.86650 * self.state[3] + white * 0.3104856;
        self.state[4] = 0.55000 * self.state[4] + white * 0.5329522;
        self.state[5] = -0.7616 * self.state[5] - white * 0.0168980;

        let pink: f64 = self.state.iter().sum::<f64>() + white * 0.5362;
        pink * 0.11
    }

    /// Current accumulator values
    pub fn state(&self) -> &[f64; 6] {
        &self.state
    }
}

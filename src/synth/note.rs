//! Note names, MIDI numbers and scales

use thiserror::Error;

/// Errors raised when resolving a note name
#[derive(Debug, Error, PartialEq)]
pub enum NoteError {
    #[error("empty note name")]
    Empty,
    #[error("unknown note letter '{0}'")]
    UnknownLetter(char),
    #[error("invalid octave in note '{0}'")]
    InvalidOctave(String),
}

/// Ratio applied for a flat, a hair below an equal-tempered semitone
const FLAT_RATIO: f64 = 0.9438;

/// Resolve a note name such as `"C4"`, `"Bb3"` or `"A"` to Hz
///
/// The octave defaults to 4 when omitted.
pub fn note(name: &str) -> Result<f64, NoteError> {
    let mut chars = name.chars();
    let letter = chars.next().ok_or(NoteError::Empty)?;

    let mut base = match letter.to_ascii_uppercase() {
        'C' => 261.63,
        'D' => 293.66,
        'E' => 329.63,
        'F' => 349.23,
        'G' => 392.00,
        'A' => 440.00,
        'B' => 493.88,
        other => return Err(NoteError::UnknownLetter(other)),
    };

    let rest = chars.as_str();
    let rest = match rest.strip_prefix('b') {
        Some(after_flat) => {
            base *= FLAT_RATIO;
            after_flat
        }
        None => rest,
    };

    let octave: i32 = if rest.is_empty() {
        4
    } else {
        rest.parse()
            .map_err(|_| NoteError::InvalidOctave(name.to_string()))?
    };

    Ok(base * 2f64.powi(octave - 4))
}

/// Resolve a list of note names, failing on the first bad one
pub fn chord(names: &[&str]) -> Result<Vec<f64>, NoteError> {
    names.iter().map(|name| note(name)).collect()
}

/// Equal-tempered frequency of a MIDI note number (A4 = 69 = 440 Hz)
pub fn midi_to_hz(midi: i32) -> f64 {
    440.0 * 2f64.powf((midi - 69) as f64 / 12.0)
}

/// Musical scale as semitone offsets from the root
#[derive(Debug, Clone)]
pub struct Scale {
    name: &'static str,
    intervals: &'static [i32],
}

impl Scale {
    /// Major scale
    pub fn major() -> Self {
        Self {
            name: "major",
            intervals: &[0, 2, 4, 5, 7, 9, 11],
        }
    }

    /// Minor pentatonic scale (root, m3, P4, P5, m7)
    pub fn minor_pentatonic() -> Self {
        Self {
            name: "minor_pentatonic",
            intervals: &[0, 3, 5, 7, 10],
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// Whether `midi` is a degree of this scale rooted at `root`
    pub fn contains(&self, root: i32, midi: i32) -> bool {
        let offset = (midi - root).rem_euclid(12);
        self.intervals.contains(&offset)
    }

    /// Move `midi` down to the nearest scale degree at or below it
    pub fn snap_down(&self, root: i32, midi: i32) -> i32 {
        (0..12)
            .map(|d| midi - d)
            .find(|&m| self.contains(root, m))
            .unwrap_or(midi)
    }
}

//! Synthesis building blocks
//!
//! Contains oscillators, the plucked-string model, instrument envelopes,
//! note helpers and the voice type the mixer works with.

mod instrument;
mod note;
mod oscillator;
mod string;
mod voice;

pub use instrument::{bow_envelope, fm_operator, piano_envelope, BassShape, Instrument};
pub use note::{chord, midi_to_hz, note, NoteError, Scale};
pub use oscillator::{saw, sine, square, white_noise, PinkNoise, Waveform};
pub use string::{KarplusString, STRING_DECAY};
pub use voice::Voice;

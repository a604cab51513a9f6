//! Pulsebox - procedural music generators streaming raw PCM
//!
//! Each scene sequences a handful of synthesized voices (chip drums, saw
//! basses, bowed strings, FM piano, plucked strings, noise weather) and
//! the engine turns the mix into signed 16-bit mono samples.

pub mod config;
pub mod engine;
pub mod scenes;
pub mod synth;

pub use config::PulseConfig;
pub use engine::Engine;
pub use scenes::{Scene, SceneKind};

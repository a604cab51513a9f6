//! CLI interface for pulsebox

use clap::{Parser, Subcommand};
use pulsebox::SceneKind;
use std::path::PathBuf;

/// Procedural music generators streaming raw 16-bit PCM
#[derive(Parser)]
#[command(name = "pulsebox")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stream raw signed 16-bit little-endian mono PCM until interrupted
    ///
    /// Pipe into a player that is told the format, e.g.
    /// `pulsebox stream arcade | aplay -f S16_LE -r 44100 -c 1`
    Stream {
        /// Scene to play
        scene: SceneKind,

        /// Configuration file path (default: ./pulsebox.yaml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many seconds
        #[arg(short, long)]
        seconds: Option<f64>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a fixed length of a scene to a WAV file
    Render {
        /// Scene to render
        scene: SceneKind,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Duration in seconds
        #[arg(short, long, default_value = "2")]
        duration: f64,

        /// Configuration file path (default: ./pulsebox.yaml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List available scenes
    Scenes,

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "pulsebox.yaml")]
        config: PathBuf,
    },

    /// Generate an example configuration file
    Init,
}

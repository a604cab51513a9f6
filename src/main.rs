//! Pulsebox - procedural music generators streaming raw PCM

use anyhow::{bail, Context, Result};
use clap::Parser;
use pulsebox::config::{self, PulseConfig};
use pulsebox::engine::{Engine, PcmWriter, Recorder};
use pulsebox::SceneKind;
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // stdout carries audio, so diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stream {
            scene,
            config: config_path,
            seed,
            seconds,
            output,
        } => {
            let cfg = load(config_path.as_deref(), seed)?;
            let mut engine = Engine::from_config(scene, &cfg);
            let limit = seconds.map(|s| (s * cfg.audio.sample_rate as f64).round() as u64);

            let running = Arc::new(AtomicBool::new(true));
            let handler_flag = running.clone();
            ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))
                .context("failed to install Ctrl-C handler")?;

            info!(
                scene = %scene,
                sample_rate = cfg.audio.sample_rate,
                volume = engine.volume(),
                "streaming s16le mono"
            );

            let written = match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("failed to create {:?}", path))?;
                    let mut writer = PcmWriter::new(file, cfg.audio.buffer_size);
                    engine.stream_to(&mut writer, &running, limit)
                }
                None => {
                    let stdout = io::stdout().lock();
                    let mut writer = PcmWriter::new(stdout, cfg.audio.buffer_size);
                    engine.stream_to(&mut writer, &running, limit)
                }
            }
            .context("failed to write PCM stream")?;

            if !running.load(Ordering::SeqCst) {
                info!("interrupted, stopping");
            }
            info!(
                samples = written,
                seconds = written as f64 / cfg.audio.sample_rate as f64,
                "stream finished"
            );
        }

        Commands::Render {
            scene,
            output,
            duration,
            config: config_path,
            seed,
        } => {
            if duration.is_nan() || duration <= 0.0 {
                bail!("Duration must be positive");
            }
            let cfg = load(config_path.as_deref(), seed)?;
            let sample_rate = cfg.audio.sample_rate;
            let total_samples = (duration * sample_rate as f64).round() as u64;

            println!("Rendering {:.1}s of {} to {:?}...", duration, scene, output);

            let mut engine = Engine::from_config(scene, &cfg);
            let mut recorder = Recorder::create(&output, sample_rate)?;
            recorder.record(&mut engine, total_samples, cfg.audio.buffer_size)?;

            let recorded = recorder.duration().as_secs_f64();
            recorder.finalize()?;
            println!("Recorded {:.2}s to {:?}", recorded, output);
        }

        Commands::Scenes => {
            println!("Available scenes:\n");
            for kind in SceneKind::ALL {
                let tempo = kind
                    .default_bpm()
                    .map(|bpm| format!("{} BPM", bpm))
                    .unwrap_or_else(|| "free time".to_string());
                println!(
                    "  {:<10} {} ({}, volume {:.2})",
                    kind.name(),
                    kind.description(),
                    tempo,
                    kind.default_volume()
                );
            }
        }

        Commands::Check { config: config_path } => {
            println!("Checking configuration at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!("  Sample rate: {} Hz", cfg.audio.sample_rate);
                    println!("  Buffer size: {}", cfg.audio.buffer_size);
                    match cfg.master.seed {
                        Some(seed) => println!("  Seed: {}", seed),
                        None => println!("  Seed: random"),
                    }
                    for kind in SceneKind::ALL {
                        let bpm = cfg
                            .bpm_for(kind)
                            .or(kind.default_bpm())
                            .map(|bpm| format!(", {} BPM", bpm))
                            .unwrap_or_default();
                        println!(
                            "    - {:<10} volume {:.0}%{}",
                            kind.name(),
                            cfg.volume_for(kind) * 100.0,
                            bpm
                        );
                    }
                }
                Err(e) => {
                    println!("Configuration is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../pulsebox.example.yaml");

            let path = config::DEFAULT_CONFIG_FILE;
            if Path::new(path).exists() {
                warn!("{} already exists, not overwriting", path);
            } else {
                std::fs::write(path, example_config)
                    .with_context(|| format!("failed to write {}", path))?;
                println!("Created {} with example configuration.", path);
            }
        }
    }

    Ok(())
}

/// Load configuration and apply a command-line seed on top
fn load(path: Option<&Path>, seed: Option<u64>) -> Result<PulseConfig> {
    let mut cfg = config::load_or_default(path)?;
    if seed.is_some() {
        cfg.master.seed = seed;
    }
    Ok(cfg)
}

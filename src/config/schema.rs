//! Configuration schema definitions

use crate::scenes::SceneKind;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main configuration for pulsebox
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PulseConfig {
    /// Audio output settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Settings shared by every scene
    #[serde(default)]
    pub master: MasterConfig,

    /// Per-scene overrides keyed by scene name
    #[serde(default)]
    pub scenes: HashMap<String, SceneConfig>,
}

impl PulseConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate < 8000 || self.audio.sample_rate > 192000 {
            bail!("Sample rate must be between 8000 and 192000");
        }
        if self.audio.buffer_size < 64 || self.audio.buffer_size > 8192 {
            bail!("Buffer size must be between 64 and 8192");
        }

        if let Some(volume) = self.master.volume {
            if !(0.0..=1.0).contains(&volume) {
                bail!("Master volume must be between 0.0 and 1.0");
            }
        }

        for (name, scene) in &self.scenes {
            if name.parse::<SceneKind>().is_err() {
                bail!("Unknown scene '{}' in scenes section", name);
            }
            if let Some(volume) = scene.volume {
                if !(0.0..=1.0).contains(&volume) {
                    bail!("Volume for scene '{}' must be between 0.0 and 1.0", name);
                }
            }
            if let Some(bpm) = scene.bpm {
                if !(20.0..=300.0).contains(&bpm) {
                    bail!("BPM for scene '{}' must be between 20 and 300", name);
                }
            }
        }

        Ok(())
    }

    fn scene(&self, kind: SceneKind) -> Option<&SceneConfig> {
        self.scenes
            .iter()
            .find(|(name, _)| name.parse::<SceneKind>().ok() == Some(kind))
            .map(|(_, scene)| scene)
    }

    /// Master volume for `kind`: scene override, then master, then the
    /// scene's own default
    pub fn volume_for(&self, kind: SceneKind) -> f64 {
        self.scene(kind)
            .and_then(|scene| scene.volume)
            .or(self.master.volume)
            .unwrap_or_else(|| kind.default_volume())
    }

    /// Tempo override for `kind`, if any
    pub fn bpm_for(&self, kind: SceneKind) -> Option<f64> {
        self.scene(kind).and_then(|scene| scene.bpm)
    }
}

/// Audio output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz (default: 44100)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Samples buffered between writes to the sink (default: 1024)
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            buffer_size: default_buffer_size(),
        }
    }
}

fn default_sample_rate() -> u32 { 44100 }
fn default_buffer_size() -> usize { 1024 }

/// Master settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasterConfig {
    /// Volume 0.0-1.0 applied to every scene (default: per scene)
    pub volume: Option<f64>,

    /// RNG seed for reproducible output (default: random)
    pub seed: Option<u64>,
}

/// Overrides for a single scene
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Volume 0.0-1.0
    pub volume: Option<f64>,

    /// Tempo, for scenes that follow a beat grid
    pub bpm: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_audio_config() {
        let yaml = "sample_rate: 48000";
        let config: AudioConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.buffer_size, 1024); // default
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: PulseConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.audio.sample_rate, 44100);
        assert!(config.master.volume.is_none());
        assert!(config.scenes.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scene_config() {
        let yaml = r#"
scenes:
  arcade:
    bpm: 150
    volume: 0.4
  storm:
    volume: 0.2
"#;
        let config: PulseConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.bpm_for(SceneKind::Arcade), Some(150.0));
        assert_eq!(config.volume_for(SceneKind::Arcade), 0.4);
        assert_eq!(config.volume_for(SceneKind::Storm), 0.2);
        assert_eq!(config.bpm_for(SceneKind::Storm), None);
    }

    #[test]
    fn test_volume_precedence() {
        let mut config = PulseConfig::default();
        assert_eq!(config.volume_for(SceneKind::Orchestra), 0.6);

        config.master.volume = Some(0.9);
        assert_eq!(config.volume_for(SceneKind::Orchestra), 0.9);

        config.scenes.insert(
            "Orchestra".to_string(),
            SceneConfig {
                volume: Some(0.1),
                bpm: None,
            },
        );
        assert_eq!(config.volume_for(SceneKind::Orchestra), 0.1);
        assert_eq!(config.volume_for(SceneKind::Piano), 0.9);
    }

    #[test]
    fn test_config_validation() {
        let mut config = PulseConfig::default();
        assert!(config.validate().is_ok());

        config.audio.sample_rate = 4000;
        assert!(config.validate().is_err());
        config.audio.sample_rate = 44100;

        config.audio.buffer_size = 16;
        assert!(config.validate().is_err());
        config.audio.buffer_size = 1024;

        config.master.volume = Some(1.5);
        assert!(config.validate().is_err());
        config.master.volume = None;

        config.scenes.insert(
            "walk".to_string(),
            SceneConfig {
                volume: None,
                bpm: Some(500.0),
            },
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_scene_rejected() {
        let mut config = PulseConfig::default();
        config
            .scenes
            .insert("polka".to_string(), SceneConfig::default());
        assert!(config.validate().is_err());
    }
}

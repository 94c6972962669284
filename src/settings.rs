//! Presentation settings
//!
//! Cosmetic and audio preferences. None of these affect gameplay, so two runs
//! with the same seed and tuning play out identically whatever is set here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Visual detail level; only bounds the explosion debris kept alive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Live particle budget. Each broken brick spawns a burst of ten.
    pub fn particle_budget(self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 300,
            QualityPreset::High => 1000,
        }
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QualityPreset::Low => "low",
            QualityPreset::Medium => "medium",
            QualityPreset::High => "high",
        })
    }
}

impl FromStr for QualityPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(QualityPreset::Low),
            "medium" | "med" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            other => Err(format!("unknown quality preset '{other}'")),
        }
    }
}

/// Cue loudness
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// 0.0 - 1.0
    pub master: f32,
    /// 0.0 - 1.0
    pub sfx: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master: 0.8,
            sfx: 1.0,
            muted: false,
        }
    }
}

impl AudioSettings {
    /// Gain applied to every cue
    pub fn gain(&self) -> f32 {
        if self.muted {
            return 0.0;
        }
        (self.master * self.sfx).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityPreset,
    /// Explosion debris on brick break
    pub particles: bool,
    pub audio: AudioSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::default(),
            particles: true,
            audio: AudioSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_preset(quality: QualityPreset) -> Self {
        Self {
            quality,
            ..Self::default()
        }
    }

    /// Particle cap handed to the simulation
    pub fn max_particles(&self) -> usize {
        if self.particles {
            self.quality.particle_budget()
        } else {
            0
        }
    }

    pub fn effective_volume(&self) -> f32 {
        self.audio.gain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_cap_follows_preset() {
        assert_eq!(Settings::from_preset(QualityPreset::Low).max_particles(), 60);
        let mut settings = Settings::from_preset(QualityPreset::High);
        assert_eq!(settings.max_particles(), 1000);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_mute_silences() {
        let mut settings = Settings::default();
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
        settings.audio.sfx = 0.5;
        assert!((settings.effective_volume() - 0.4).abs() < 1e-6);
        settings.audio.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(" MED ".parse::<QualityPreset>(), Ok(QualityPreset::Medium));
        assert!("ultra".parse::<QualityPreset>().is_err());
        assert_eq!(QualityPreset::High.to_string(), "high");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "quality": "low", "audio": { "muted": true } }"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(settings.particles);
        assert!(settings.audio.muted);
        assert_eq!(settings.audio.master, 0.8);
    }
}

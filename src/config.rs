use serde_derive::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::trajectory::{EvictUnseen, EvictionPolicy, RetainAll, DEFAULT_HISTORY_LEN};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub classifier: ClassifierConfig,
    pub pipeline: PipelineConfig,
    pub report: GenerationConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, Error> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.classifier.validate()?;

        Ok(config)
    }
}

/// Thresholds of the rule passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Fire is declared above this confidence
    pub fire_confidence: f32,
    /// Centers kept per track
    pub history_len: usize,
    /// Minimum samples before a track can count as stagnant
    pub stagnant_min_samples: usize,
    /// Displacement (px) below which a track is stagnant
    pub stagnant_max_displacement: f32,
    pub gridlock_min_vehicles: usize,
    pub congestion_min_vehicles: usize,
    /// Width/height above which a vehicle reads as lying on its side
    pub overturned_max_aspect: f32,
    /// Width/height below which a vehicle reads as flipped upright
    pub overturned_min_aspect: f32,
    /// Pairwise IoU above which two vehicles count as a crash indicator
    pub crash_iou: f32,
    /// Persons needed next to a vehicle to raise an accident
    pub accident_min_persons: usize,
    pub eviction: EvictionConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            fire_confidence: 0.35,
            history_len: DEFAULT_HISTORY_LEN,
            stagnant_min_samples: 10,
            stagnant_max_displacement: 10.0,
            gridlock_min_vehicles: 8,
            congestion_min_vehicles: 4,
            overturned_max_aspect: 3.5,
            overturned_min_aspect: 0.65,
            crash_iou: 0.12,
            accident_min_persons: 2,
            eviction: EvictionConfig::RetainAll,
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.history_len == 0 {
            return Err(Error::InvalidConfig("history_len must be positive".into()));
        }

        if self.stagnant_min_samples > self.history_len {
            return Err(Error::InvalidConfig(format!(
                "stagnant_min_samples ({}) exceeds history_len ({})",
                self.stagnant_min_samples, self.history_len
            )));
        }

        if self.congestion_min_vehicles > self.gridlock_min_vehicles {
            return Err(Error::InvalidConfig(format!(
                "congestion_min_vehicles ({}) exceeds gridlock_min_vehicles ({})",
                self.congestion_min_vehicles, self.gridlock_min_vehicles
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum EvictionConfig {
    RetainAll,
    UnseenFor { frames: u64 },
}

impl EvictionConfig {
    pub fn build(&self) -> Box<dyn EvictionPolicy> {
        match *self {
            EvictionConfig::RetainAll => Box::new(RetainAll),
            EvictionConfig::UnseenFor { frames } => Box::new(EvictUnseen { frames }),
        }
    }
}

/// Confidence floors applied to backend output before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub detection_confidence: f32,
    pub fire_confidence: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            detection_confidence: 0.15,
            fire_confidence: 0.3,
        }
    }
}

/// Sampling parameters handed to report generators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub max_new_tokens: usize,
    pub temperature: f32,
    pub repetition_penalty: f32,
    pub do_sample: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_new_tokens: 256,
            temperature: 0.7,
            repetition_penalty: 1.2,
            do_sample: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            "classifier:\n  fire_confidence: 0.5\n  eviction:\n    policy: unseen_for\n    frames: 300\n",
        )
        .unwrap();

        assert_eq!(config.classifier.fire_confidence, 0.5);
        assert_eq!(config.classifier.history_len, 15);
        assert_eq!(
            config.classifier.eviction,
            EvictionConfig::UnseenFor { frames: 300 }
        );
        assert_eq!(config.pipeline, PipelineConfig::default());
        assert_eq!(config.report.max_new_tokens, 256);
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("{}").unwrap(), Config::default());
    }

    #[test]
    fn rejects_window_larger_than_history() {
        let err = Config::from_yaml("classifier:\n  history_len: 5\n").unwrap_err();

        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}

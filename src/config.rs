use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::classify::{Boundary, ClassifierConfig};
use crate::error::AnalysisError;
use crate::scoring::{ScoringMode, WeightConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringModeConfig {
    pub mode: String,
}

impl Default for ScoringModeConfig {
    fn default() -> Self {
        Self {
            mode: "weighted".to_string(),
        }
    }
}

impl ScoringModeConfig {
    pub fn to_mode(&self, weights: WeightConfig) -> ScoringMode {
        match self.mode.trim().to_lowercase().as_str() {
            "unweighted" | "pure" | "interactions" => ScoringMode::Unweighted,
            "weighted" => ScoringMode::Weighted(weights),
            other => {
                tracing::warn!(mode = other, "unknown scoring mode, using weighted");
                ScoringMode::Weighted(weights)
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub scoring: ScoringModeConfig,
    pub weights: WeightConfig,
    pub classifier: ClassifierConfig,
}

impl AnalysisConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                Self::from_toml_str(&contents)?
            } else {
                AnalysisConfig::default()
            }
        } else {
            AnalysisConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|err| format!("failed to parse config: {}", err))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload)
            .map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    pub fn scoring_mode(&self) -> ScoringMode {
        self.scoring.to_mode(self.weights)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.scoring_mode().validate()?;
        self.classifier.validate()
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(mode) = env::var("MATRIX_SCORING_MODE") {
            if !mode.trim().is_empty() {
                self.scoring.mode = mode;
            }
        }

        let weights = [
            ("MATRIX_WEIGHT_LIKE", &mut self.weights.like),
            ("MATRIX_WEIGHT_SAVE", &mut self.weights.save),
            ("MATRIX_WEIGHT_SHARE", &mut self.weights.share),
            ("MATRIX_WEIGHT_COMMENT", &mut self.weights.comment),
        ];
        for (key, slot) in weights {
            if let Ok(value) = env::var(key) {
                if let Ok(value) = value.trim().parse::<f64>() {
                    *slot = value;
                }
            }
        }

        if let Ok(flag) = env::var("MATRIX_DEAD_ZONE") {
            if let Some(value) = parse_flag(&flag) {
                self.classifier.dead_zone = value;
            }
        }
        if let Ok(ratio) = env::var("MATRIX_DEAD_ZONE_RATIO") {
            if let Ok(value) = ratio.trim().parse::<f64>() {
                self.classifier.dead_zone_ratio = value;
            }
        }
        if let Ok(boundary) = env::var("MATRIX_BOUNDARY") {
            if let Some(value) = Boundary::from_str(&boundary) {
                self.classifier.boundary = value;
            }
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("MATRIX_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/matrix.toml")))
}

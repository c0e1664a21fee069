use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::PostRecord;

/// How much each interaction is worth relative to a like.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    pub like: f64,
    pub save: f64,
    pub share: f64,
    pub comment: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            like: 1.0,
            save: 3.0,
            share: 4.0,
            comment: 2.0,
        }
    }
}

impl WeightConfig {
    pub fn score(&self, record: &PostRecord) -> f64 {
        let mut score = 0.0;

        score += record.likes * self.like;
        score += record.saves * self.save;
        score += record.shares * self.share;
        score += record.comments * self.comment;

        score
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        let weights = [
            ("like", self.like),
            ("save", self.save),
            ("share", self.share),
            ("comment", self.comment),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalysisError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoringMode {
    Weighted(WeightConfig),
    /// Plain interaction count.
    Unweighted,
}

impl ScoringMode {
    pub fn label(self) -> &'static str {
        match self {
            ScoringMode::Weighted(_) => "weighted",
            ScoringMode::Unweighted => "unweighted",
        }
    }

    pub fn weights(self) -> Option<WeightConfig> {
        match self {
            ScoringMode::Weighted(weights) => Some(weights),
            ScoringMode::Unweighted => None,
        }
    }

    pub fn score(self, record: &PostRecord) -> f64 {
        match self {
            ScoringMode::Weighted(weights) => weights.score(record),
            ScoringMode::Unweighted => record.interactions(),
        }
    }

    pub fn validate(self) -> Result<(), AnalysisError> {
        match self {
            ScoringMode::Weighted(weights) => weights.validate(),
            ScoringMode::Unweighted => Ok(()),
        }
    }
}

impl From<Option<WeightConfig>> for ScoringMode {
    fn from(weights: Option<WeightConfig>) -> Self {
        match weights {
            Some(weights) => ScoringMode::Weighted(weights),
            None => ScoringMode::Unweighted,
        }
    }
}

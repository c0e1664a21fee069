use serde::{Deserialize, Serialize};

use crate::classify::Medians;
use crate::error::AnalysisError;
use crate::{BatchAnalysis, Category, ClassifiedPost, ScoredPost};

/// How a value sitting exactly on a median is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    /// `>` / `<`: a value on the median is neither high nor low, and falls
    /// through to low impact.
    Strict,
    /// `>=` / `<`: a value on the median counts as high.
    Inclusive,
}

impl Boundary {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "strict" | "gt" | ">" => Some(Boundary::Strict),
            "inclusive" | "ge" | "gte" | ">=" => Some(Boundary::Inclusive),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Boundary::Strict => "strict",
            Boundary::Inclusive => "inclusive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub dead_zone: bool,
    /// Band half-width as a fraction of each median.
    pub dead_zone_ratio: f64,
    pub boundary: Boundary,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            dead_zone: true,
            dead_zone_ratio: 0.10,
            boundary: Boundary::Strict,
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.dead_zone_ratio.is_finite() || self.dead_zone_ratio < 0.0 {
            return Err(AnalysisError::InvalidDeadZone(self.dead_zone_ratio));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct QuadrantClassifier {
    config: ClassifierConfig,
}

impl QuadrantClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classifies the whole batch against its own medians.
    pub fn classify(&self, posts: &[ScoredPost]) -> Result<BatchAnalysis, AnalysisError> {
        self.config.validate()?;
        let medians = Medians::of(posts).ok_or(AnalysisError::EmptyBatch)?;

        let posts = posts
            .iter()
            .map(|post| ClassifiedPost {
                post: post.clone(),
                category: self.categorize(post, &medians),
            })
            .collect();

        Ok(BatchAnalysis { medians, posts })
    }

    pub fn categorize(&self, post: &ScoredPost, medians: &Medians) -> Category {
        let reach = post.record.reach;
        let rate = post.engagement_rate;

        if reach <= 0.0 {
            return Category::ReviewData;
        }

        if self.config.dead_zone && self.in_dead_zone(reach, rate, medians) {
            return Category::StandardPerformance;
        }

        self.quadrant(reach, rate, medians)
    }

    fn in_dead_zone(&self, reach: f64, rate: f64, medians: &Medians) -> bool {
        let margin_reach = medians.reach * self.config.dead_zone_ratio;
        let margin_rate = medians.engagement_rate * self.config.dead_zone_ratio;

        (reach - medians.reach).abs() <= margin_reach
            && (rate - medians.engagement_rate).abs() <= margin_rate
    }

    fn quadrant(&self, reach: f64, rate: f64, medians: &Medians) -> Category {
        let low_reach = reach < medians.reach;
        let low_rate = rate < medians.engagement_rate;
        let (high_reach, high_rate) = match self.config.boundary {
            Boundary::Strict => (reach > medians.reach, rate > medians.engagement_rate),
            Boundary::Inclusive => (!low_reach, !low_rate),
        };

        if high_reach && high_rate {
            Category::TotalSuccess
        } else if low_reach && high_rate {
            Category::HighLoyalty
        } else if high_reach && low_rate {
            Category::ShallowViral
        } else {
            Category::LowImpact
        }
    }
}

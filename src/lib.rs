pub mod classify;
pub mod config;
pub mod error;
pub mod ingest;
pub mod report;
pub mod scoring;

use serde::{Deserialize, Serialize};

use crate::classify::{Medians, QuadrantClassifier};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::scoring::MetricCalculator;

pub use crate::classify::{Boundary, ClassifierConfig};
pub use crate::scoring::{ScoringMode, WeightConfig};

/// One input row: a display name and the five raw metrics of a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub name: String,
    pub reach: f64,
    pub likes: f64,
    pub saves: f64,
    pub shares: f64,
    pub comments: f64,
}

impl PostRecord {
    pub fn new(
        name: impl Into<String>,
        reach: f64,
        likes: f64,
        saves: f64,
        shares: f64,
        comments: f64,
    ) -> Self {
        Self {
            name: name.into(),
            reach,
            likes,
            saves,
            shares,
            comments,
        }
    }

    /// Raw interaction count, ignoring weights.
    pub fn interactions(&self) -> f64 {
        self.likes + self.saves + self.shares + self.comments
    }

    /// Copy with every non-finite metric replaced by `0.0`.
    pub fn sanitized(&self) -> Self {
        Self {
            name: self.name.clone(),
            reach: finite_or_zero(self.reach),
            likes: finite_or_zero(self.likes),
            saves: finite_or_zero(self.saves),
            shares: finite_or_zero(self.shares),
            comments: finite_or_zero(self.comments),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPost {
    #[serde(flatten)]
    pub record: PostRecord,
    pub score: f64,
    /// Percentage of reach, `0.0` when reach is zero.
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedPost {
    #[serde(flatten)]
    pub post: ScoredPost,
    pub category: Category,
}

impl ClassifiedPost {
    pub fn name(&self) -> &str {
        &self.post.record.name
    }

    pub fn reach(&self) -> f64 {
        self.post.record.reach
    }

    pub fn score(&self) -> f64 {
        self.post.score
    }

    pub fn engagement_rate(&self) -> f64 {
        self.post.engagement_rate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TotalSuccess,
    HighLoyalty,
    ShallowViral,
    LowImpact,
    StandardPerformance,
    ReviewData,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::TotalSuccess,
        Category::HighLoyalty,
        Category::ShallowViral,
        Category::LowImpact,
        Category::StandardPerformance,
        Category::ReviewData,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::TotalSuccess => "Total success",
            Category::HighLoyalty => "High loyalty",
            Category::ShallowViral => "Shallow viral",
            Category::LowImpact => "Low impact",
            Category::StandardPerformance => "Standard performance",
            Category::ReviewData => "Review data",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Category::TotalSuccess => "viral and high quality",
            Category::HighLoyalty => "low reach, high quality: niche or loyal audience",
            Category::ShallowViral => "viral but low quality: clickbait pattern",
            Category::LowImpact => "low reach and low quality",
            Category::StandardPerformance => "within the dead zone around both medians",
            Category::ReviewData => "zero reach, check the source data",
        }
    }
}

/// Result of one run: the classified posts in input order and the medians
/// they were split on.
#[derive(Debug, Clone, Serialize)]
pub struct BatchAnalysis {
    pub medians: Medians,
    pub posts: Vec<ClassifiedPost>,
}

impl BatchAnalysis {
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &ClassifiedPost> {
        self.posts.iter().filter(move |post| post.category == category)
    }

    pub fn count(&self, category: Category) -> usize {
        self.in_category(category).count()
    }
}

/// Scores and classifies a batch in two passes.
pub fn analyze(
    records: &[PostRecord],
    config: &AnalysisConfig,
) -> Result<BatchAnalysis, AnalysisError> {
    config.validate()?;

    let calculator = MetricCalculator::new(config.scoring_mode());
    let scored = calculator.score_batch(records);

    let classifier = QuadrantClassifier::new(config.classifier.clone());
    let analysis = classifier.classify(&scored)?;

    tracing::debug!(
        posts = analysis.posts.len(),
        mode = calculator.mode().label(),
        median_reach = analysis.medians.reach,
        median_engagement_rate = analysis.medians.engagement_rate,
        "classified batch"
    );

    Ok(analysis)
}

/// Label given to rows without a name; `position` is zero-based.
pub fn default_post_name(position: usize) -> String {
    format!("Post {}", position + 1)
}

/// Parses a raw metric cell. Anything unparseable or non-finite becomes `0.0`.
pub fn coerce_metric(raw: &str) -> f64 {
    raw.trim().parse::<f64>().map(finite_or_zero).unwrap_or(0.0)
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub fn format_number(value: f64) -> String {
    let rounded = value.round().max(0.0) as i64;
    let mut chars: Vec<char> = rounded.to_string().chars().collect();
    let mut result = String::new();
    let mut count = 0usize;

    while let Some(ch) = chars.pop() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }

    result.chars().rev().collect()
}

/// Formats a value that is already a percentage.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}

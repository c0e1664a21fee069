use serde::{Deserialize, Serialize};

use crate::ScoredPost;

/// Batch-wide thresholds for the median split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Medians {
    pub reach: f64,
    pub engagement_rate: f64,
}

impl Medians {
    /// `None` for an empty batch.
    pub fn of(posts: &[ScoredPost]) -> Option<Self> {
        let reach: Vec<f64> = posts.iter().map(|post| post.record.reach).collect();
        let rates: Vec<f64> = posts.iter().map(|post| post.engagement_rate).collect();

        Some(Self {
            reach: median(&reach)?,
            engagement_rate: median(&rates)?,
        })
    }
}

/// Middle value, or the mean of the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

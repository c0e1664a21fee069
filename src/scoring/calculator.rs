use crate::scoring::ScoringMode;
use crate::{finite_or_zero, PostRecord, ScoredPost};

#[derive(Debug, Clone)]
pub struct MetricCalculator {
    mode: ScoringMode,
}

impl MetricCalculator {
    pub fn new(mode: ScoringMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ScoringMode {
        self.mode
    }

    /// Non-finite metrics count as zero, and so does a score that
    /// overflows.
    pub fn score(&self, record: &PostRecord) -> ScoredPost {
        let record = record.sanitized();
        let score = finite_or_zero(self.mode.score(&record));
        let engagement_rate = engagement_rate(score, record.reach);
        ScoredPost {
            record,
            score,
            engagement_rate,
        }
    }

    /// Scores every record, preserving input order.
    pub fn score_batch(&self, records: &[PostRecord]) -> Vec<ScoredPost> {
        records.iter().map(|record| self.score(record)).collect()
    }
}

/// `score / reach` as a percentage. Zero reach or a non-finite result
/// yields exactly `0.0`.
pub fn engagement_rate(score: f64, reach: f64) -> f64 {
    if reach > 0.0 {
        finite_or_zero((score / reach) * 100.0)
    } else {
        0.0
    }
}

use serde::Serialize;

use crate::classify::Medians;
use crate::{BatchAnalysis, Category, ClassifiedPost};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub reach: f64,
    pub engagement_rate: f64,
    pub category: Category,
}

impl From<&ClassifiedPost> for ReportRow {
    fn from(post: &ClassifiedPost) -> Self {
        Self {
            name: post.name().to_string(),
            reach: post.reach(),
            engagement_rate: post.engagement_rate(),
            category: post.category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

/// Summary of a classified batch for tables and KPIs.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub medians: Medians,
    pub total_posts: usize,
    pub counts: Vec<CategoryCount>,
    /// Highest engagement rate; the earliest post wins ties.
    pub mvp: Option<ReportRow>,
    /// Total successes: keep the editorial line.
    pub replicate: Vec<ReportRow>,
    /// High loyalty: niche content worth a new cover or a re-share.
    pub boost: Vec<ReportRow>,
    pub all: Vec<ReportRow>,
}

impl Report {
    pub fn build(analysis: &BatchAnalysis) -> Self {
        let counts = Category::ALL
            .iter()
            .map(|&category| CategoryCount {
                category,
                count: analysis.count(category),
            })
            .collect();

        let mut mvp: Option<&ClassifiedPost> = None;
        for post in &analysis.posts {
            match mvp {
                Some(best) if post.engagement_rate() <= best.engagement_rate() => {}
                _ => mvp = Some(post),
            }
        }

        Self {
            medians: analysis.medians,
            total_posts: analysis.posts.len(),
            counts,
            mvp: mvp.map(ReportRow::from),
            replicate: rows(analysis, Category::TotalSuccess),
            boost: rows(analysis, Category::HighLoyalty),
            all: analysis.posts.iter().map(ReportRow::from).collect(),
        }
    }

    pub fn count(&self, category: Category) -> usize {
        self.counts
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }
}

fn rows(analysis: &BatchAnalysis, category: Category) -> Vec<ReportRow> {
    analysis.in_category(category).map(ReportRow::from).collect()
}

use serde::{Deserialize, Serialize};
use content_matrix::config::AnalysisConfig;
use content_matrix::ingest::{deserialize_metric, validate_record};
use content_matrix::report::Report;
use content_matrix::{
    default_post_name, BatchAnalysis, Boundary, ClassifierConfig, PostRecord, WeightConfig,
};

#[derive(Debug, Deserialize)]
pub struct ApiPost {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_metric")]
    pub reach: f64,
    #[serde(default, deserialize_with = "deserialize_metric")]
    pub likes: f64,
    #[serde(default, deserialize_with = "deserialize_metric")]
    pub saves: f64,
    #[serde(default, deserialize_with = "deserialize_metric")]
    pub shares: f64,
    #[serde(default, deserialize_with = "deserialize_metric")]
    pub comments: f64,
}

#[derive(Debug, Deserialize)]
pub struct ApiAnalyzeRequest {
    #[serde(default)]
    pub posts: Vec<ApiPost>,
    pub weights: Option<WeightConfig>,
    pub unweighted: Option<bool>,
    pub dead_zone: Option<bool>,
    pub dead_zone_ratio: Option<f64>,
    pub boundary: Option<String>,
}

impl ApiAnalyzeRequest {
    /// Splits the request into the batch and the effective config, layering
    /// request options over `base`.
    pub fn into_parts(
        self,
        base: &AnalysisConfig,
    ) -> Result<(Vec<PostRecord>, AnalysisConfig), String> {
        let mut config = base.clone();

        if let Some(weights) = self.weights {
            config.weights = weights;
            config.scoring.mode = "weighted".to_string();
        }
        if let Some(unweighted) = self.unweighted {
            config.scoring.mode = if unweighted { "unweighted" } else { "weighted" }.to_string();
        }
        if let Some(dead_zone) = self.dead_zone {
            config.classifier.dead_zone = dead_zone;
        }
        if let Some(ratio) = self.dead_zone_ratio {
            config.classifier.dead_zone_ratio = ratio;
        }
        if let Some(boundary) = self.boundary.as_deref() {
            config.classifier.boundary = Boundary::from_str(boundary)
                .ok_or_else(|| format!("invalid boundary: {}", boundary))?;
        }

        let mut records = Vec::with_capacity(self.posts.len());
        for (index, post) in self.posts.into_iter().enumerate() {
            let name = post
                .name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| default_post_name(index));
            let record = PostRecord::new(
                name,
                post.reach,
                post.likes,
                post.saves,
                post.shares,
                post.comments,
            );
            validate_record(&record, index + 1).map_err(|err| err.to_string())?;
            records.push(record);
        }

        Ok((records, config))
    }
}

#[derive(Debug, Serialize)]
pub struct ApiAnalyzeResponse {
    pub scoring_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<WeightConfig>,
    pub classifier: ClassifierConfig,
    #[serde(flatten)]
    pub analysis: BatchAnalysis,
    pub report: Report,
}

impl ApiAnalyzeResponse {
    pub fn new(config: &AnalysisConfig, analysis: BatchAnalysis) -> Self {
        let mode = config.scoring_mode();
        let report = Report::build(&analysis);
        Self {
            scoring_mode: mode.label(),
            weights: mode.weights(),
            classifier: config.classifier.clone(),
            analysis,
            report,
        }
    }
}

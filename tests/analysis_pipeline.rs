use content_matrix::classify::{median, Medians, QuadrantClassifier};
use content_matrix::config::AnalysisConfig;
use content_matrix::error::AnalysisError;
use content_matrix::ingest::sample_posts;
use content_matrix::report::Report;
use content_matrix::scoring::{engagement_rate, MetricCalculator, ScoringMode, WeightConfig};
use content_matrix::{analyze, Boundary, Category, ClassifierConfig, PostRecord, ScoredPost};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

fn post(name: &str, reach: f64, likes: f64, saves: f64, shares: f64, comments: f64) -> PostRecord {
    PostRecord::new(name, reach, likes, saves, shares, comments)
}

fn scored(reach: f64, engagement_rate: f64) -> ScoredPost {
    ScoredPost {
        record: post("p", reach, 0.0, 0.0, 0.0, 0.0),
        score: engagement_rate * reach / 100.0,
        engagement_rate,
    }
}

fn classifier(dead_zone: bool, boundary: Boundary) -> QuadrantClassifier {
    QuadrantClassifier::new(ClassifierConfig {
        dead_zone,
        dead_zone_ratio: 0.10,
        boundary,
    })
}

fn categories(posts: &[ScoredPost], classifier: &QuadrantClassifier) -> Vec<Category> {
    classifier
        .classify(posts)
        .unwrap()
        .posts
        .iter()
        .map(|post| post.category)
        .collect()
}

fn config(dead_zone: bool, boundary: Boundary) -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.classifier.dead_zone = dead_zone;
    config.classifier.boundary = boundary;
    config
}

#[test]
fn weighted_score_matches_reference_post() {
    let calculator = MetricCalculator::new(ScoringMode::Weighted(WeightConfig::default()));
    let scored = calculator.score(&post("Trending Reel", 12000.0, 300.0, 20.0, 5.0, 8.0));

    assert!((scored.score - 396.0).abs() < 1e-9);
    assert!((scored.engagement_rate - 3.3).abs() < 1e-9);
}

#[test]
fn unweighted_rate_uses_interaction_count() {
    let calculator = MetricCalculator::new(ScoringMode::Unweighted);
    let scored = calculator.score(&post("Friday Meme", 8000.0, 150.0, 10.0, 2.0, 3.0));

    assert!((scored.score - 165.0).abs() < 1e-9);
    assert!((scored.engagement_rate - 2.0625).abs() < 1e-9);
}

#[test]
fn missing_weights_select_unweighted_mode() {
    assert_eq!(ScoringMode::from(None), ScoringMode::Unweighted);
    assert_eq!(
        ScoringMode::from(Some(WeightConfig::default())),
        ScoringMode::Weighted(WeightConfig::default())
    );
}

#[test]
fn scoring_preserves_order_and_length() {
    let calculator = MetricCalculator::new(ScoringMode::Weighted(WeightConfig::default()));
    let records = sample_posts();
    let scored = calculator.score_batch(&records);

    assert_eq!(scored.len(), records.len());
    for (record, result) in records.iter().zip(&scored) {
        assert_eq!(&result.record, record);
    }
}

#[test]
fn zero_reach_is_flagged_for_every_mode() {
    let modes = [
        ScoringMode::Weighted(WeightConfig::default()),
        ScoringMode::Weighted(WeightConfig {
            like: 10.0,
            save: 0.0,
            share: 0.5,
            comment: 7.0,
        }),
        ScoringMode::Unweighted,
    ];

    for mode in modes {
        for dead_zone in [true, false] {
            for boundary in [Boundary::Strict, Boundary::Inclusive] {
                let scored = MetricCalculator::new(mode).score_batch(&[
                    post("ghost", 0.0, 50.0, 5.0, 2.0, 1.0),
                    post("empty", 0.0, 0.0, 0.0, 0.0, 0.0),
                    post("live", 1000.0, 50.0, 5.0, 2.0, 1.0),
                ]);
                let analysis = classifier(dead_zone, boundary).classify(&scored).unwrap();

                for flagged in &analysis.posts[..2] {
                    assert_eq!(flagged.engagement_rate(), 0.0);
                    assert!(flagged.engagement_rate().is_finite());
                    assert_eq!(flagged.category, Category::ReviewData);
                }
                assert_ne!(analysis.posts[2].category, Category::ReviewData);
            }
        }
    }
}

#[test]
fn single_post_lands_in_dead_zone() {
    let posts = vec![scored(10000.0, 5.0)];
    let analysis = classifier(true, Boundary::Strict).classify(&posts).unwrap();

    assert_eq!(analysis.medians, Medians { reach: 10000.0, engagement_rate: 5.0 });
    assert_eq!(analysis.posts[0].category, Category::StandardPerformance);
}

#[test]
fn single_post_without_dead_zone_depends_on_boundary() {
    let posts = vec![scored(10000.0, 5.0)];

    assert_eq!(
        categories(&posts, &classifier(false, Boundary::Strict)),
        vec![Category::LowImpact]
    );
    assert_eq!(
        categories(&posts, &classifier(false, Boundary::Inclusive)),
        vec![Category::TotalSuccess]
    );
}

#[test]
fn two_posts_split_on_their_medians() {
    let posts = vec![scored(8000.0, 2.0), scored(25000.0, 10.0)];

    for dead_zone in [true, false] {
        let analysis = classifier(dead_zone, Boundary::Strict).classify(&posts).unwrap();
        assert_eq!(analysis.medians.reach, 16500.0);
        assert_eq!(analysis.medians.engagement_rate, 6.0);
        assert_eq!(analysis.posts[0].category, Category::LowImpact);
        assert_eq!(analysis.posts[1].category, Category::TotalSuccess);
    }
}

#[test]
fn all_four_quadrants_are_reachable() {
    let posts = vec![
        scored(1000.0, 9.0),
        scored(3000.0, 1.0),
        scored(5000.0, 8.0),
        scored(7000.0, 2.0),
    ];

    let expected = vec![
        Category::HighLoyalty,
        Category::LowImpact,
        Category::TotalSuccess,
        Category::ShallowViral,
    ];
    assert_eq!(categories(&posts, &classifier(true, Boundary::Strict)), expected);
    assert_eq!(categories(&posts, &classifier(false, Boundary::Inclusive)), expected);
}

#[test]
fn dead_zone_needs_both_axes_near_the_median() {
    // Medians: reach 10000, ER 5.0; margins 1000 and 0.5.
    let posts = vec![
        scored(9500.0, 4.0),
        scored(10000.0, 5.0),
        scored(5000.0, 9.0),
        scored(10900.0, 5.4),
        scored(20000.0, 3.0),
    ];

    assert_eq!(
        categories(&posts, &classifier(true, Boundary::Strict)),
        vec![
            Category::LowImpact,
            Category::StandardPerformance,
            Category::HighLoyalty,
            Category::StandardPerformance,
            Category::ShallowViral,
        ]
    );
}

#[test]
fn strict_boundary_on_one_median_falls_through_to_low_impact() {
    // Medians: reach 2000, ER 4.0.
    let posts = vec![
        scored(1000.0, 4.0),
        scored(2000.0, 6.0),
        scored(3000.0, 2.0),
    ];

    assert_eq!(
        categories(&posts, &classifier(false, Boundary::Strict)),
        vec![Category::LowImpact, Category::LowImpact, Category::ShallowViral]
    );
    assert_eq!(
        categories(&posts, &classifier(false, Boundary::Inclusive)),
        vec![Category::HighLoyalty, Category::TotalSuccess, Category::ShallowViral]
    );
}

#[test]
fn medians_ignore_record_order() {
    let calculator = MetricCalculator::new(ScoringMode::Weighted(WeightConfig::default()));
    let mut records = sample_posts();
    records.push(post("zero", 0.0, 3.0, 0.0, 0.0, 0.0));
    let baseline = Medians::of(&calculator.score_batch(&records)).unwrap();

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        records.shuffle(&mut rng);
        let shuffled = Medians::of(&calculator.score_batch(&records)).unwrap();
        assert_eq!(shuffled, baseline);
    }
}

#[test]
fn reclassifying_is_idempotent() {
    let config = AnalysisConfig::default();
    let records = sample_posts();
    let first = analyze(&records, &config).unwrap();

    let rescored: Vec<ScoredPost> = first.posts.iter().map(|post| post.post.clone()).collect();
    let classifier = QuadrantClassifier::new(config.classifier.clone());
    let second = classifier.classify(&rescored).unwrap();

    assert_eq!(first.medians, second.medians);
    assert_eq!(first.posts, second.posts);
    assert_eq!(analyze(&records, &config).unwrap().posts, first.posts);
}

#[test]
fn sample_batch_with_dead_zone() {
    let analysis = analyze(&sample_posts(), &config(true, Boundary::Strict)).unwrap();

    assert_eq!(analysis.medians.reach, 11800.0);
    assert!((analysis.medians.engagement_rate - 381.0 / 11800.0 * 100.0).abs() < 1e-9);
    let got: Vec<Category> = analysis.posts.iter().map(|post| post.category).collect();
    assert_eq!(
        got,
        vec![
            Category::StandardPerformance,
            Category::TotalSuccess,
            Category::LowImpact,
            Category::TotalSuccess,
            Category::LowImpact,
            Category::StandardPerformance,
            Category::StandardPerformance,
        ]
    );
}

#[test]
fn sample_batch_without_dead_zone() {
    let strict = analyze(&sample_posts(), &config(false, Boundary::Strict)).unwrap();
    let inclusive = analyze(&sample_posts(), &config(false, Boundary::Inclusive)).unwrap();

    let strict: Vec<Category> = strict.posts.iter().map(|post| post.category).collect();
    let inclusive: Vec<Category> = inclusive.posts.iter().map(|post| post.category).collect();

    // "Average Post 2" sits exactly on both medians.
    assert_eq!(
        strict,
        vec![
            Category::TotalSuccess,
            Category::TotalSuccess,
            Category::LowImpact,
            Category::TotalSuccess,
            Category::LowImpact,
            Category::LowImpact,
            Category::LowImpact,
        ]
    );
    assert_eq!(inclusive[6], Category::TotalSuccess);
    assert_eq!(&inclusive[..6], &strict[..6]);
}

#[test]
fn empty_batch_is_rejected() {
    let result = analyze(&[], &AnalysisConfig::default());
    assert!(matches!(result, Err(AnalysisError::EmptyBatch)));

    let result = classifier(true, Boundary::Strict).classify(&[]);
    assert!(matches!(result, Err(AnalysisError::EmptyBatch)));
}

#[test]
fn invalid_configuration_is_rejected_before_scoring() {
    let mut config = AnalysisConfig::default();
    config.weights.share = f64::NAN;
    assert!(matches!(
        analyze(&sample_posts(), &config),
        Err(AnalysisError::InvalidWeight { name: "share", .. })
    ));

    let mut config = AnalysisConfig::default();
    config.classifier.dead_zone_ratio = -0.1;
    assert!(matches!(
        analyze(&sample_posts(), &config),
        Err(AnalysisError::InvalidDeadZone(_))
    ));
}

#[test]
fn unweighted_config_ignores_weights() {
    let mut config = AnalysisConfig::default();
    config.scoring.mode = "unweighted".to_string();
    config.weights.like = -1.0;

    let analysis = analyze(&[post("a", 8000.0, 150.0, 10.0, 2.0, 3.0)], &config).unwrap();
    assert!((analysis.posts[0].engagement_rate() - 2.0625).abs() < 1e-9);
}

#[test]
fn report_summarizes_sample_batch() {
    let analysis = analyze(&sample_posts(), &AnalysisConfig::default()).unwrap();
    let report = Report::build(&analysis);

    assert_eq!(report.total_posts, 7);
    assert_eq!(report.count(Category::TotalSuccess), 2);
    assert_eq!(report.count(Category::LowImpact), 2);
    assert_eq!(report.count(Category::StandardPerformance), 3);
    assert_eq!(report.count(Category::ReviewData), 0);
    assert_eq!(report.counts.len(), Category::ALL.len());

    let mvp = report.mvp.as_ref().unwrap();
    assert_eq!(mvp.name, "Promo Video");
    assert!((mvp.engagement_rate - 5.68).abs() < 1e-9);

    let replicate: Vec<&str> = report.replicate.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(replicate, vec!["Educational Carousel", "Promo Video"]);
    assert!(report.boost.is_empty());
    assert_eq!(report.all.len(), 7);
}

#[test]
fn report_mvp_prefers_first_on_ties() {
    let posts = vec![scored(1000.0, 4.0), scored(2000.0, 4.0), scored(0.0, 0.0)];
    let analysis = classifier(true, Boundary::Strict).classify(&posts).unwrap();
    let report = Report::build(&analysis);

    assert_eq!(report.mvp.unwrap().reach, 1000.0);
}

#[test]
fn median_of_engagement_rates_averages_even_batches() {
    assert_eq!(median(&[2.0, 10.0]), Some(6.0));
}

#[test]
fn non_finite_and_overflowing_metrics_count_as_zero() {
    let records = vec![
        post("nan likes", 1000.0, f64::NAN, 0.0, 0.0, 0.0),
        post("plain", 2000.0, 10.0, 0.0, 0.0, 0.0),
        post("inf likes", 3000.0, f64::INFINITY, 0.0, 0.0, 0.0),
        post("overflow", 4000.0, 0.0, 0.0, 1e308, 0.0),
        post("nan reach", f64::NAN, 10.0, 0.0, 0.0, 0.0),
        post("inf reach", f64::INFINITY, 10.0, 0.0, 0.0, 0.0),
    ];

    for mode in [ScoringMode::Weighted(WeightConfig::default()), ScoringMode::Unweighted] {
        let scored = MetricCalculator::new(mode).score_batch(&records);
        for scored_post in &scored {
            assert!(scored_post.score.is_finite() && scored_post.score >= 0.0);
            assert!(scored_post.engagement_rate.is_finite() && scored_post.engagement_rate >= 0.0);
        }
    }

    let analysis = analyze(&records, &AnalysisConfig::default()).unwrap();
    let rates: Vec<f64> = analysis.posts.iter().map(|post| post.engagement_rate()).collect();
    assert_eq!(rates, vec![0.0, 0.5, 0.0, 0.0, 0.0, 0.0]);
    assert_eq!(analysis.posts[0].post.record.likes, 0.0);
    assert_eq!(analysis.posts[3].score(), 0.0);
    assert_eq!(analysis.posts[4].reach(), 0.0);
    assert_eq!(analysis.posts[4].category, Category::ReviewData);
    assert_eq!(analysis.posts[5].category, Category::ReviewData);

    // Reach sorted 0, 0, 1000, 2000, 3000, 4000.
    assert_eq!(analysis.medians.reach, 1500.0);
    assert_eq!(analysis.medians.engagement_rate, 0.0);
    assert_eq!(analysis.posts[1].category, Category::TotalSuccess);
}

#[test]
fn engagement_rate_overflow_is_zero() {
    assert_eq!(engagement_rate(1e300, 1e-300), 0.0);
    assert_eq!(engagement_rate(5.0, 0.0), 0.0);
    assert!((engagement_rate(396.0, 12000.0) - 3.3).abs() < 1e-9);
}

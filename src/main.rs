mod api;
mod server;

use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use content_matrix::config::AnalysisConfig;
use content_matrix::ingest::{load_posts_file, parse_pasted, sample_posts};
use content_matrix::report::{Report, ReportRow};
use content_matrix::{
    analyze, format_float, format_number, format_percent, BatchAnalysis, Boundary, PostRecord,
};

#[derive(Parser)]
#[command(name = "content-matrix", about = "Content performance matrix")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Score and classify a batch of posts
    Analyze(AnalyzeArgs),
    /// Serve the JSON API
    Serve(ServeArgs),
    /// Write the default config file
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug, Clone, Default)]
struct AnalyzeArgs {
    /// CSV file with a header row; reads delimited text from stdin when omitted
    #[arg(long)]
    file: Option<PathBuf>,
    /// Analyze the built-in sample batch
    #[arg(long, conflicts_with = "file")]
    sample: bool,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    like: Option<f64>,
    #[arg(long)]
    save: Option<f64>,
    #[arg(long)]
    share: Option<f64>,
    #[arg(long)]
    comment: Option<f64>,
    /// Use the raw interaction count instead of weights
    #[arg(long)]
    unweighted: bool,
    #[arg(long)]
    no_dead_zone: bool,
    #[arg(long)]
    dead_zone_ratio: Option<f64>,
    /// strict or inclusive
    #[arg(long)]
    boundary: Option<String>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8790)]
    port: u16,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct InitConfigArgs {
    #[arg(long, default_value = "config/matrix.toml")]
    path: PathBuf,
    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Analyze(AnalyzeArgs::default()));

    match command {
        Command::Analyze(args) => run_analyze(args),
        Command::Serve(args) => server::serve(args).await,
        Command::InitConfig(args) => run_init_config(args),
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<(), String> {
    let (mut config, config_path) = AnalysisConfig::load(args.config.clone())?;
    if let Some(path) = config_path.filter(|path| path.exists()) {
        info!(path = %path.display(), "loaded config");
    }
    apply_overrides(&mut config, &args)?;

    let posts = read_posts(&args)?;
    let analysis = analyze(&posts, &config).map_err(|err| err.to_string())?;
    info!(
        posts = analysis.posts.len(),
        mode = config.scoring_mode().label(),
        "analysis complete"
    );

    if args.json {
        let response = api::ApiAnalyzeResponse::new(&config, analysis);
        let payload = serde_json::to_string_pretty(&response)
            .map_err(|err| format!("failed to serialize analysis: {}", err))?;
        println!("{}", payload);
    } else {
        print_analysis(&config, &analysis);
    }

    Ok(())
}

fn apply_overrides(config: &mut AnalysisConfig, args: &AnalyzeArgs) -> Result<(), String> {
    if let Some(value) = args.like {
        config.weights.like = value;
    }
    if let Some(value) = args.save {
        config.weights.save = value;
    }
    if let Some(value) = args.share {
        config.weights.share = value;
    }
    if let Some(value) = args.comment {
        config.weights.comment = value;
    }
    if args.unweighted {
        config.scoring.mode = "unweighted".to_string();
    }
    if args.no_dead_zone {
        config.classifier.dead_zone = false;
    }
    if let Some(ratio) = args.dead_zone_ratio {
        config.classifier.dead_zone_ratio = ratio;
    }
    if let Some(boundary) = args.boundary.as_deref() {
        config.classifier.boundary = Boundary::from_str(boundary)
            .ok_or_else(|| format!("invalid boundary (strict|inclusive): {}", boundary))?;
    }
    Ok(())
}

fn read_posts(args: &AnalyzeArgs) -> Result<Vec<PostRecord>, String> {
    if args.sample {
        return Ok(sample_posts());
    }
    if let Some(path) = args.file.as_ref() {
        return load_posts_file(path)
            .map_err(|err| format!("failed to load {}: {}", path.display(), err));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("failed reading stdin: {}", err))?;
    if buffer.trim().is_empty() {
        return Err("missing posts: pass --file, --sample or pipe CSV on stdin".to_string());
    }
    parse_pasted(&buffer).map_err(|err| err.to_string())
}

fn print_analysis(config: &AnalysisConfig, analysis: &BatchAnalysis) {
    let report = Report::build(analysis);
    let mode = config.scoring_mode();

    match mode.weights() {
        Some(weights) => println!(
            "Scoring: weighted (like {} | save {} | share {} | comment {})",
            format_float(weights.like, 1),
            format_float(weights.save, 1),
            format_float(weights.share, 1),
            format_float(weights.comment, 1)
        ),
        None => println!("Scoring: unweighted (raw interactions)"),
    }
    if config.classifier.dead_zone {
        println!(
            "Classifier: dead zone {}% | {} boundary",
            format_float(config.classifier.dead_zone_ratio * 100.0, 0),
            config.classifier.boundary.label()
        );
    } else {
        println!(
            "Classifier: no dead zone | {} boundary",
            config.classifier.boundary.label()
        );
    }

    println!("Median reach: {}", format_number(report.medians.reach));
    println!("Median engagement: {}", format_percent(report.medians.engagement_rate));
    if let Some(mvp) = report.mvp.as_ref() {
        println!(
            "MVP: {} ({} ER)",
            mvp.name,
            format_percent(mvp.engagement_rate)
        );
    }

    println!("\nPosts:");
    for post in &analysis.posts {
        println!(
            "  {:<28} reach {:>10} | score {:>9} | ER {:>7} | {}",
            post.name(),
            format_number(post.reach()),
            format_float(post.score(), 1),
            format_percent(post.engagement_rate()),
            post.category.label()
        );
    }

    println!("\nCategories:");
    for entry in &report.counts {
        println!(
            "  {:<22} {} ({})",
            entry.category.label(),
            entry.count,
            entry.category.description()
        );
    }

    print_group("Replicate (keep the editorial line)", &report.replicate);
    print_group("Boost (new cover or re-share)", &report.boost);
}

fn print_group(title: &str, rows: &[ReportRow]) {
    println!("\n{}:", title);
    if rows.is_empty() {
        println!("- none");
    }
    for row in rows {
        println!(
            "- {} (reach {}, ER {})",
            row.name,
            format_number(row.reach),
            format_percent(row.engagement_rate)
        );
    }
}

fn run_init_config(args: InitConfigArgs) -> Result<(), String> {
    if args.path.exists() && !args.force {
        return Err(format!(
            "{} already exists (pass --force to overwrite)",
            args.path.display()
        ));
    }
    AnalysisConfig::default().write(&args.path)?;
    info!(path = %args.path.display(), "wrote default config");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}

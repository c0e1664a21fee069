//! Loads post batches from CSV files or text pasted from a spreadsheet.
//!
//! Header names are matched case-insensitively, in English or Spanish:
//!   name | reach | likes | saves | shares | comments
//!   nombre del post | alcance | likes | guardados | compartidos | comentarios
//!
//! The name column is optional. Metric cells that don't parse become 0;
//! negative values are rejected.

use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

use crate::error::IngestError;
use crate::{coerce_metric, default_post_name, finite_or_zero, PostRecord};

const NAME_HEADERS: &[&str] = &["name", "post", "post name", "nombre", "nombre del post"];
const REACH_HEADERS: &[&str] = &["reach", "alcance"];
const LIKES_HEADERS: &[&str] = &["likes", "like", "me gusta"];
const SAVES_HEADERS: &[&str] = &["saves", "save", "guardados"];
const SHARES_HEADERS: &[&str] = &["shares", "share", "compartidos"];
const COMMENTS_HEADERS: &[&str] = &["comments", "comment", "comentarios"];

struct ColumnMap {
    name: Option<usize>,
    reach: usize,
    likes: usize,
    saves: usize,
    shares: usize,
    comments: usize,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, IngestError> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |aliases: &[&str]| {
            normalized
                .iter()
                .position(|header| aliases.contains(&header.as_str()))
        };
        let require = |aliases: &[&str], column: &'static str| {
            find(aliases).ok_or(IngestError::MissingColumn(column))
        };

        Ok(Self {
            name: find(NAME_HEADERS),
            reach: require(REACH_HEADERS, "reach")?,
            likes: require(LIKES_HEADERS, "likes")?,
            saves: require(SAVES_HEADERS, "saves")?,
            shares: require(SHARES_HEADERS, "shares")?,
            comments: require(COMMENTS_HEADERS, "comments")?,
        })
    }
}

/// Load posts from a comma-separated reader with a header row.
pub fn load_posts<R: Read>(reader: R) -> Result<Vec<PostRecord>, IngestError> {
    read_posts(reader, b',')
}

pub fn load_posts_file(path: &Path) -> Result<Vec<PostRecord>, IngestError> {
    let file = std::fs::File::open(path)?;
    load_posts(file)
}

/// Parse delimited text, guessing the delimiter from the header line.
pub fn parse_pasted(text: &str) -> Result<Vec<PostRecord>, IngestError> {
    read_posts(text.as_bytes(), detect_delimiter(text))
}

/// Rejects negative metrics; `row` is only used in the error.
pub fn validate_record(record: &PostRecord, row: usize) -> Result<(), IngestError> {
    let metrics = [
        ("reach", record.reach),
        ("likes", record.likes),
        ("saves", record.saves),
        ("shares", record.shares),
        ("comments", record.comments),
    ];
    for (column, value) in metrics {
        if value < 0.0 {
            return Err(IngestError::NegativeValue { row, column, value });
        }
    }
    Ok(())
}

/// Serde adapter for metric fields that may arrive as numbers, numeric
/// strings, `null` or junk.
pub fn deserialize_metric<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(number)) => {
            number.as_f64().map(finite_or_zero).unwrap_or(0.0)
        }
        Some(serde_json::Value::String(text)) => coerce_metric(&text),
        _ => 0.0,
    })
}

/// The reference batch used for demos.
pub fn sample_posts() -> Vec<PostRecord> {
    vec![
        PostRecord::new("Trending Reel", 12000.0, 300.0, 20.0, 5.0, 8.0),
        PostRecord::new("Educational Carousel", 15000.0, 450.0, 45.0, 20.0, 15.0),
        PostRecord::new("Friday Meme", 8000.0, 150.0, 10.0, 2.0, 3.0),
        PostRecord::new("Promo Video", 25000.0, 800.0, 100.0, 50.0, 60.0),
        PostRecord::new("Team Photo", 10000.0, 200.0, 15.0, 3.0, 5.0),
        PostRecord::new("Average Post 1", 11500.0, 280.0, 18.0, 4.0, 7.0),
        PostRecord::new("Average Post 2", 11800.0, 290.0, 19.0, 5.0, 7.0),
    ]
}

fn read_posts<R: Read>(reader: R, delimiter: u8) -> Result<Vec<PostRecord>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|source| IngestError::Csv { line: 1, source })?
        .clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut posts = Vec::new();
    for result in csv_reader.records() {
        let row = result.map_err(|source| {
            let line = source.position().map(|pos| pos.line()).unwrap_or(0);
            IngestError::Csv { line, source }
        })?;

        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let line = row.position().map(|pos| pos.line() as usize).unwrap_or(posts.len() + 2);
        let metric = |index: usize| coerce_metric(row.get(index).unwrap_or(""));
        let name = columns
            .name
            .and_then(|index| row.get(index))
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_post_name(posts.len()));

        let record = PostRecord::new(
            name,
            metric(columns.reach),
            metric(columns.likes),
            metric(columns.saves),
            metric(columns.shares),
            metric(columns.comments),
        );
        validate_record(&record, line)?;
        posts.push(record);
    }

    tracing::debug!(posts = posts.len(), "loaded post batch");
    Ok(posts)
}

fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().find(|line| !line.trim().is_empty()).unwrap_or("");
    if header.contains('\t') {
        b'\t'
    } else if header.contains(';') {
        b';'
    } else {
        b','
    }
}

fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

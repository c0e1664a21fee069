use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("cannot classify an empty batch: medians are undefined")]
    EmptyBatch,

    #[error("invalid {name} weight: {value} (must be a finite number >= 0)")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("invalid dead zone ratio: {0} (must be a finite number >= 0)")]
    InvalidDeadZone(f64),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("negative {column} at row {row}: {value}")]
    NegativeValue {
        row: usize,
        column: &'static str,
        value: f64,
    },

    #[error("CSV parse error at line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

//! Error types for loading input data and fitting models.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while locating or reading the input CSV files.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("required file {} does not exist", .0.display())]
    MissingFile(PathBuf),

    #[error("no SubmitRecord-Class*.csv files found in {}", .0.display())]
    NoSubmissionFiles(PathBuf),

    #[error("every submission file in {} is empty", .0.display())]
    EmptySubmissions(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures raised while training a model on the feature table.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("need at least two rows to train, got {0}")]
    TooFewRows(usize),

    #[error("labels contain a single class ({0}); cannot fit a binary model")]
    SingleClass(u8),

    #[error("feature matrix is ragged: row {row} has {got} columns, expected {expected}")]
    RaggedFeatures {
        row: usize,
        got: usize,
        expected: usize,
    },

    #[error("cannot cluster an empty point set")]
    NoPoints,
}

//! Missing-value report over the raw input files.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::error::DataError;
use crate::loader::{STUDENT_INFO_FILE, TITLE_INFO_FILE, find_submission_files};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileQuality {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: Vec<ColumnMissing>,
}

impl FileQuality {
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.missing).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QualityReport {
    pub files: Vec<FileQuality>,
}

/// Counts blank cells per column in the roster, problem metadata and every
/// submission file found in `data_dir`. Absent files are skipped.
pub fn missing_value_report(data_dir: &Path) -> Result<QualityReport, DataError> {
    let mut paths = vec![data_dir.join(STUDENT_INFO_FILE), data_dir.join(TITLE_INFO_FILE)];
    paths.extend(find_submission_files(data_dir)?);

    let mut report = QualityReport::default();
    for path in paths {
        if !path.exists() {
            warn!(path = %path.display(), "File not found, skipping quality check");
            continue;
        }
        let quality = check_file(&path)?;
        info!(
            path = %quality.path.display(),
            rows = quality.rows,
            missing = quality.total_missing(),
            "Checked file"
        );
        for column in quality.columns.iter().filter(|c| c.missing > 0) {
            info!(column = %column.column, missing = column.missing, "Missing values");
        }
        report.files.push(quality);
    }

    Ok(report)
}

pub fn check_file(path: &Path) -> Result<FileQuality, DataError> {
    let csv_err = |source| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;
    let headers = rdr.headers().map_err(csv_err)?.clone();
    let mut missing = vec![0usize; headers.len()];
    let mut rows = 0;

    for result in rdr.records() {
        let record = result.map_err(csv_err)?;
        rows += 1;
        for (col, slot) in missing.iter_mut().enumerate() {
            // Short rows count as missing in their absent columns.
            if record.get(col).is_none_or(|v| v.trim().is_empty()) {
                *slot += 1;
            }
        }
    }

    Ok(FileQuality {
        path: path.to_path_buf(),
        rows,
        columns: headers
            .iter()
            .zip(missing)
            .map(|(column, missing)| ColumnMissing {
                column: column.to_string(),
                missing,
            })
            .collect(),
    })
}

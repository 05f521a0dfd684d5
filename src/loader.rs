//! Discovery and loading of the input CSV files.
//!
//! A data directory holds one `SubmitRecord-Class<N>.csv` per class plus the
//! roster (`Data_StudentInfo.csv`, optional) and problem metadata
//! (`Data_TitleInfo.csv`, required).

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::DataError;
use crate::records::{StudentInfo, SubmitRecord, TitleInfo};

pub const STUDENT_INFO_FILE: &str = "Data_StudentInfo.csv";
pub const TITLE_INFO_FILE: &str = "Data_TitleInfo.csv";
pub const SUBMIT_PREFIX: &str = "SubmitRecord-Class";

type Result<T> = std::result::Result<T, DataError>;

/// Everything one report run reads from disk.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    pub submissions: Vec<SubmitRecord>,
    pub students: Vec<StudentInfo>,
    pub titles: Vec<TitleInfo>,
    pub submission_files: Vec<PathBuf>,
    pub roster_present: bool,
}

/// Loads the roster, problem metadata and every submission file in `data_dir`.
#[tracing::instrument(fields(data_dir = %data_dir.display()))]
pub fn load_dataset(data_dir: &Path) -> Result<DataSet> {
    let title_path = data_dir.join(TITLE_INFO_FILE);
    if !title_path.exists() {
        return Err(DataError::MissingFile(title_path));
    }
    let titles: Vec<TitleInfo> = read_rows(&title_path)?;

    let student_path = data_dir.join(STUDENT_INFO_FILE);
    let (students, roster_present) = if student_path.exists() {
        (read_rows::<StudentInfo>(&student_path)?, true)
    } else {
        warn!(path = %student_path.display(), "Student roster not found, continuing without it");
        (Vec::new(), false)
    };

    let submission_files = find_submission_files(data_dir)?;
    if submission_files.is_empty() {
        return Err(DataError::NoSubmissionFiles(data_dir.to_path_buf()));
    }

    let submissions = load_submissions(&submission_files)?;
    if submissions.is_empty() {
        return Err(DataError::EmptySubmissions(data_dir.to_path_buf()));
    }

    info!(
        submissions = submissions.len(),
        files = submission_files.len(),
        students = students.len(),
        titles = titles.len(),
        "Dataset loaded"
    );

    Ok(DataSet {
        submissions,
        students,
        titles,
        submission_files,
        roster_present,
    })
}

/// Lists `SubmitRecord-Class*.csv` files in `data_dir`, sorted by file name.
pub fn find_submission_files(data_dir: &Path) -> Result<Vec<PathBuf>> {
    let io_err = |source| DataError::Io {
        path: data_dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(data_dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with(SUBMIT_PREFIX) && name.ends_with(".csv") {
                paths.push(path);
            }
        }
    }

    paths.sort();
    Ok(paths)
}

/// Concatenates submission files in the given order.
///
/// Empty files are skipped with a warning. Rows without a `class` value take
/// the label encoded in their file name.
pub fn load_submissions(paths: &[PathBuf]) -> Result<Vec<SubmitRecord>> {
    let mut all = Vec::new();

    for path in paths {
        let mut rows: Vec<SubmitRecord> = read_rows(path)?;
        if rows.is_empty() {
            warn!(path = %path.display(), "Submission file is empty, skipping");
            continue;
        }

        let fallback = class_from_file_name(path);
        for row in rows.iter_mut() {
            if row.class.trim().is_empty() {
                row.class = fallback.clone();
            }
        }

        debug!(path = %path.display(), rows = rows.len(), "Loaded submission file");
        all.append(&mut rows);
    }

    Ok(all)
}

/// `SubmitRecord-Class7.csv` → `Class7`; `Unknown` when the name has no digits.
pub fn class_from_file_name(path: &Path) -> String {
    let digits: String = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        "Unknown".to_string()
    } else {
        format!("Class{digits}")
    }
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let csv_err = |source| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        rows.push(result.map_err(csv_err)?);
    }

    Ok(rows)
}

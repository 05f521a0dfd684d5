//! Row types deserialized from the input CSV files.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// State substring marking a fully correct submission.
pub const FULLY_CORRECT: &str = "Absolutely_Correct";

/// A single attempt by a student at a problem (`SubmitRecord-Class*.csv`).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SubmitRecord {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub index: Option<u64>,
    /// Filled in from the file name by the loader when the column is absent.
    #[serde(default)]
    pub class: String,
    /// Unix timestamp in seconds.
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub time: Option<i64>,
    pub state: String,
    /// Blank in some exports; missing scores are left out of every mean.
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub score: Option<f64>,
    #[serde(rename = "title_ID")]
    pub title_id: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub memory: Option<f64>,
    /// Milliseconds; blank or `--` in some exports.
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub timeconsume: Option<f64>,
    #[serde(rename = "student_ID")]
    pub student_id: String,
}

impl SubmitRecord {
    pub fn is_correct(&self) -> bool {
        self.state.trim().contains(FULLY_CORRECT)
    }

    /// `ln(1 + timeconsume)`, or `None` when the time is missing or negative.
    pub fn log_time(&self) -> Option<f64> {
        self.timeconsume.filter(|t| *t >= 0.0).map(f64::ln_1p)
    }

    pub fn time_sec(&self) -> Option<f64> {
        self.timeconsume.map(|ms| ms / 1000.0)
    }

    /// UTC calendar date of the submission, `None` without a timestamp.
    pub fn date(&self) -> Option<NaiveDate> {
        DateTime::from_timestamp(self.time?, 0).map(|dt| dt.date_naive())
    }
}

/// Roster row (`Data_StudentInfo.csv`).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StudentInfo {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub index: Option<u64>,
    #[serde(rename = "student_ID")]
    pub student_id: String,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub age: Option<u32>,
    #[serde(default)]
    pub major: Option<String>,
}

/// Problem metadata row (`Data_TitleInfo.csv`).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TitleInfo {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub index: Option<u64>,
    #[serde(rename = "title_ID")]
    pub title_id: String,
    /// Maximum attainable score.
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub score: Option<f64>,
    /// Comma-separated knowledge points.
    #[serde(default)]
    pub knowledge: Option<String>,
    /// `<main>_<detail>`.
    #[serde(default)]
    pub sub_knowledge: Option<String>,
}

impl TitleInfo {
    /// Knowledge points with surrounding whitespace removed and blanks dropped.
    pub fn knowledge_points(&self) -> Vec<&str> {
        self.knowledge
            .as_deref()
            .map(|k| {
                k.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Splits `sub_knowledge` on its first `_` into `(main, detail)`.
    pub fn knowledge_hierarchy(&self) -> Option<(&str, &str)> {
        self.sub_knowledge.as_deref()?.split_once('_')
    }
}

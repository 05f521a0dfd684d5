use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::analyzers::types::StudentFeatures;
use crate::records::SubmitRecord;
use crate::stats::{mean_present, median};

/// Model inputs, in the column order of [`StudentFeatures::model_inputs`].
pub const MODEL_FEATURES: [&str; 5] = [
    "submission_count",
    "accuracy",
    "avg_log_time",
    "active_days",
    "avg_submissions_per_day",
];

impl StudentFeatures {
    pub fn model_inputs(&self) -> Vec<f64> {
        vec![
            self.submission_count as f64,
            self.accuracy,
            self.avg_log_time,
            self.active_days as f64,
            self.avg_submissions_per_day,
        ]
    }
}

#[derive(Default)]
struct Accumulator {
    count: usize,
    correct: usize,
    log_time_sum: f64,
    log_time_n: usize,
    scores: Vec<Option<f64>>,
    dates: BTreeSet<NaiveDate>,
}

/// Aggregates submissions into one feature row per student, ordered by id.
///
/// Blank scores are left out of `avg_score`; a student with no scores at all
/// averages 0. The mastery label compares each student's mean score with the median of
/// all students' mean scores, so it is relative to the cohort being loaded.
pub fn student_features(records: &[SubmitRecord]) -> Vec<StudentFeatures> {
    let mut per_student: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for record in records {
        let acc = per_student.entry(record.student_id.as_str()).or_default();
        acc.count += 1;
        acc.correct += usize::from(record.is_correct());
        acc.scores.push(record.score);
        if let Some(t) = record.log_time() {
            acc.log_time_sum += t;
            acc.log_time_n += 1;
        }
        if let Some(date) = record.date() {
            acc.dates.insert(date);
        }
    }

    let mut features: Vec<StudentFeatures> = per_student
        .into_iter()
        .map(|(student_id, acc)| {
            let active_days = acc.dates.len();
            StudentFeatures {
                student_id: student_id.to_string(),
                submission_count: acc.count,
                accuracy: acc.correct as f64 / acc.count as f64,
                avg_log_time: if acc.log_time_n == 0 {
                    0.0
                } else {
                    acc.log_time_sum / acc.log_time_n as f64
                },
                active_days,
                avg_submissions_per_day: acc.count as f64 / active_days.max(1) as f64,
                avg_score: mean_present(acc.scores).unwrap_or(0.0),
                knowledge_mastery: 0,
            }
        })
        .collect();

    let scores: Vec<f64> = features.iter().map(|f| f.avg_score).collect();
    if let Some(threshold) = median(&scores) {
        for row in features.iter_mut() {
            row.knowledge_mastery = u8::from(row.avg_score > threshold);
        }
    }

    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DAY, DAY0, submission, submission_at};

    fn sample() -> Vec<SubmitRecord> {
        vec![
            submission_at("Class1", "a", "Q1", "Absolutely_Correct", 3.0, DAY0),
            submission_at("Class1", "a", "Q2", "Error1", 0.0, DAY0 + 60),
            submission_at("Class1", "a", "Q2", "Absolutely_Correct", 3.0, DAY0 + DAY),
            submission_at("Class1", "b", "Q1", "Partially_Correct", 1.0, DAY0),
            submission_at("Class2", "c", "Q1", "Absolutely_Correct", 4.0, DAY0),
        ]
    }

    #[test]
    fn test_counts_accuracy_and_days() {
        let features = student_features(&sample());
        assert_eq!(features.len(), 3);

        let a = &features[0];
        assert_eq!(a.student_id, "a");
        assert_eq!(a.submission_count, 3);
        assert!((a.accuracy - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(a.active_days, 2);
        assert_eq!(a.avg_submissions_per_day, 1.5);
        assert_eq!(a.avg_score, 2.0);
        assert!((a.avg_log_time - 1001f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_mastery_is_strictly_above_median() {
        // means: a = 2.0, b = 1.0, c = 4.0 -> median 2.0
        let features = student_features(&sample());
        let labels: Vec<u8> = features.iter().map(|f| f.knowledge_mastery).collect();
        assert_eq!(labels, vec![0, 0, 1]);
    }

    #[test]
    fn test_deterministic_and_bounded() {
        let records = sample();
        let first = student_features(&records);
        assert_eq!(first, student_features(&records));
        for row in &first {
            assert!((0.0..=1.0).contains(&row.accuracy));
            assert!((0.0..=4.0).contains(&row.avg_score));
        }
    }

    #[test]
    fn test_missing_time_is_skipped_in_mean() {
        let mut records = vec![submission("a", "Error1", 0.0), submission("a", "Error1", 0.0)];
        records[1].timeconsume = None;
        let features = student_features(&records);
        assert!((features[0].avg_log_time - 1001f64.ln()).abs() < 1e-12);

        records[0].timeconsume = None;
        assert_eq!(student_features(&records)[0].avg_log_time, 0.0);
    }

    #[test]
    fn test_blank_score_is_skipped_in_average() {
        let mut records = vec![
            submission("a", "Absolutely_Correct", 3.0),
            submission("a", "Error1", 0.0),
            submission("a", "Error1", 0.0),
        ];
        records[1].score = None;
        records[2].time = None;

        let row = &student_features(&records)[0];
        assert_eq!(row.submission_count, 3);
        assert_eq!(row.avg_score, 1.5);
        assert_eq!(row.active_days, 1);

        records[0].score = None;
        records[2].score = None;
        assert_eq!(student_features(&records)[0].avg_score, 0.0);
    }

    #[test]
    fn test_model_inputs_follow_feature_order() {
        let row = &student_features(&sample())[0];
        let inputs = row.model_inputs();
        assert_eq!(inputs.len(), MODEL_FEATURES.len());
        assert_eq!(inputs[0], 3.0);
        assert_eq!(inputs[3], 2.0);
    }
}

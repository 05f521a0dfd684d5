use std::collections::{BTreeMap, HashSet};

use crate::analyzers::types::{ClassProfile, ClassRadar};
use crate::records::SubmitRecord;
use crate::stats::{class_sort_key, mean_present, normalize_by_max};

/// Radar axis labels, in the order of [`ClassProfile::radar_values`].
pub const RADAR_AXES: [&str; 5] = [
    "Average score",
    "Accuracy",
    "Average time (s)",
    "Submissions per student",
    "Total submissions",
];

#[derive(Default)]
struct ClassAccumulator<'a> {
    total: usize,
    scores: Vec<Option<f64>>,
    correct: usize,
    times: Vec<Option<f64>>,
    students: HashSet<&'a str>,
}

/// Five behaviour metrics per class, plus each metric scaled by its maximum
/// across classes so every axis spans `[0, 1]`.
pub fn class_radar(records: &[SubmitRecord]) -> ClassRadar {
    let mut per_class: BTreeMap<&str, ClassAccumulator> = BTreeMap::new();

    for record in records {
        let acc = per_class.entry(record.class.as_str()).or_default();
        acc.total += 1;
        acc.scores.push(record.score);
        acc.correct += usize::from(record.is_correct());
        acc.times.push(record.time_sec());
        acc.students.insert(record.student_id.as_str());
    }

    let mut profiles: Vec<ClassProfile> = per_class
        .into_iter()
        .map(|(class, acc)| {
            let unique_students = acc.students.len();
            ClassProfile {
                class: class.to_string(),
                total_submissions: acc.total,
                avg_score: mean_present(acc.scores).unwrap_or(0.0),
                accuracy: acc.correct as f64 / acc.total as f64,
                avg_time_sec: mean_present(acc.times).unwrap_or(0.0),
                unique_students,
                avg_submissions: acc.total as f64 / unique_students.max(1) as f64,
            }
        })
        .collect();
    profiles.sort_by(|a, b| class_sort_key(&a.class).cmp(&class_sort_key(&b.class)));

    let columns: Vec<Vec<f64>> = (0..RADAR_AXES.len())
        .map(|axis| {
            let raw: Vec<f64> = profiles.iter().map(|p| p.radar_values()[axis]).collect();
            normalize_by_max(&raw)
        })
        .collect();

    let normalized = (0..profiles.len())
        .map(|row| std::array::from_fn(|axis| columns[axis][row]))
        .collect();

    ClassRadar {
        profiles,
        normalized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DAY0, submission_at};

    #[test]
    fn test_profiles_and_normalization() {
        let mut records = vec![
            submission_at("Class1", "a", "Q1", "Absolutely_Correct", 4.0, DAY0),
            submission_at("Class1", "a", "Q2", "Error1", 0.0, DAY0),
            submission_at("Class1", "b", "Q1", "Absolutely_Correct", 2.0, DAY0),
            submission_at("Class2", "c", "Q1", "Error1", 1.0, DAY0),
        ];
        records[1].timeconsume = None;
        records[2].timeconsume = Some(3000.0);

        let radar = class_radar(&records);
        assert_eq!(radar.profiles.len(), 2);

        let c1 = &radar.profiles[0];
        assert_eq!(c1.class, "Class1");
        assert_eq!(c1.total_submissions, 3);
        assert_eq!(c1.avg_score, 2.0);
        assert!((c1.accuracy - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(c1.avg_time_sec, 2.0);
        assert_eq!(c1.unique_students, 2);
        assert_eq!(c1.avg_submissions, 1.5);

        // Class1 leads on every axis.
        assert_eq!(radar.normalized[0], [1.0, 1.0, 1.0, 1.0, 1.0]);
        assert_eq!(radar.normalized[1], [0.5, 0.0, 0.5, 1.0 / 1.5, 1.0 / 3.0]);
    }

    #[test]
    fn test_blank_score_counts_as_submission_only() {
        let mut records = vec![
            submission_at("Class1", "a", "Q1", "Absolutely_Correct", 3.0, DAY0),
            submission_at("Class1", "a", "Q2", "Error1", 0.0, DAY0),
        ];
        records[1].score = None;

        let profile = &class_radar(&records).profiles[0];
        assert_eq!(profile.total_submissions, 2);
        assert_eq!(profile.avg_score, 3.0);
        assert_eq!(profile.accuracy, 0.5);
    }

    #[test]
    fn test_normalized_values_are_bounded() {
        let records = vec![
            submission_at("Class3", "a", "Q1", "Error1", 0.0, DAY0),
            submission_at("Class11", "b", "Q1", "Error1", 0.0, DAY0),
        ];
        let radar = class_radar(&records);
        assert_eq!(radar.profiles[0].class, "Class3");
        for row in &radar.normalized {
            assert!(row.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}

use tracing::info;

use crate::analyzers::features::MODEL_FEATURES;
use crate::analyzers::types::StudentFeatures;
use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::model::{Booster, ImportanceType, StandardScaler, accuracy, train_test_split};

/// A fitted mastery classifier plus what the explainer chart shows.
#[derive(Debug, Clone)]
pub struct MasteryModel {
    pub booster: Booster,
    /// Held-out accuracy at the 0.5 threshold.
    pub test_accuracy: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Average gain per feature, highest first.
    pub importance: Vec<(String, f64)>,
}

/// Standardizes the feature rows, holds out a seeded test split, fits the
/// booster on the rest and scores it on the held-out rows.
#[tracing::instrument(skip_all, fields(students = features.len()))]
pub fn train_mastery_model(
    features: &[StudentFeatures],
    config: &ModelConfig,
) -> Result<MasteryModel, ModelError> {
    let inputs: Vec<Vec<f64>> = features.iter().map(StudentFeatures::model_inputs).collect();
    let labels: Vec<u8> = features.iter().map(|f| f.knowledge_mastery).collect();

    let (_, scaled) = StandardScaler::fit_transform(&inputs);
    let split = train_test_split(scaled.len(), config.test_fraction, config.split_seed);

    let pick_rows = |idx: &[usize]| idx.iter().map(|&i| scaled[i].clone()).collect::<Vec<_>>();
    let pick_labels = |idx: &[usize]| idx.iter().map(|&i| labels[i]).collect::<Vec<_>>();

    let (x_train, y_train) = (pick_rows(&split.train), pick_labels(&split.train));
    let (x_test, y_test) = (pick_rows(&split.test), pick_labels(&split.test));

    let booster = Booster::train(&x_train, &y_train, &MODEL_FEATURES, &config.gbdt)?;

    let predicted: Vec<u8> = x_test.iter().map(|row| booster.predict(row)).collect();
    let test_accuracy = accuracy(&y_test, &predicted);
    info!(
        test_accuracy = %format_args!("{:.2}%", test_accuracy * 100.0),
        train_rows = x_train.len(),
        test_rows = x_test.len(),
        "Mastery model evaluated"
    );

    let importance = booster.feature_importance(ImportanceType::Gain);

    Ok(MasteryModel {
        booster,
        test_accuracy,
        train_rows: x_train.len(),
        test_rows: x_test.len(),
        importance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::features::student_features;
    use crate::testing::{DAY, DAY0, submission_at};

    fn cohort(n: usize) -> Vec<StudentFeatures> {
        let mut records = Vec::new();
        for s in 0..n {
            let student = format!("s{s:02}");
            let strong = s % 2 == 0;
            for attempt in 0..(3 + s % 4) {
                let (state, score) = if strong {
                    ("Absolutely_Correct", 3.0)
                } else if attempt % 2 == 0 {
                    ("Partially_Correct", 1.0)
                } else {
                    ("Error1", 0.0)
                };
                records.push(submission_at(
                    "Class1",
                    &student,
                    "Q1",
                    state,
                    score,
                    DAY0 + (attempt as i64) * DAY,
                ));
            }
        }
        student_features(&records)
    }

    #[test]
    fn test_trains_and_reports_bounded_accuracy() {
        let model = train_mastery_model(&cohort(30), &ModelConfig::default()).unwrap();
        assert_eq!(model.test_rows, 6);
        assert_eq!(model.train_rows, 24);
        assert!((0.0..=1.0).contains(&model.test_accuracy));
        assert_eq!(model.booster.trees().len(), 100);
        assert_eq!(model.importance[0].0, "accuracy");
    }

    #[test]
    fn test_is_reproducible() {
        let features = cohort(20);
        let a = train_mastery_model(&features, &ModelConfig::default()).unwrap();
        let b = train_mastery_model(&features, &ModelConfig::default()).unwrap();
        assert_eq!(a.test_accuracy, b.test_accuracy);
        assert_eq!(a.importance, b.importance);
    }

    #[test]
    fn test_tied_scores_leave_one_class() {
        let records: Vec<_> = (0..5)
            .map(|s| submission_at("Class1", &format!("s{s}"), "Q1", "Error1", 1.0, DAY0))
            .collect();
        let err = train_mastery_model(&student_features(&records), &ModelConfig::default())
            .unwrap_err();
        assert_eq!(err, ModelError::SingleClass(0));
    }
}

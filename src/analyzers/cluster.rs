use std::collections::{BTreeMap, HashMap};

use tracing::info;

use crate::analyzers::types::{BehaviorClusters, StudentCluster};
use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::loader::DataSet;
use crate::model::{KMeans, StandardScaler};
use crate::stats::mean_present;

/// Clusters students on submission count, mean score and accuracy.
///
/// The three features are standardized before k-means. Roster majors are
/// attached when a roster was loaded.
#[tracing::instrument(skip_all, fields(k = config.clusters))]
pub fn behavior_clusters(
    data: &DataSet,
    config: &ModelConfig,
) -> Result<BehaviorClusters, ModelError> {
    let mut per_student: BTreeMap<&str, (usize, Vec<Option<f64>>, usize)> = BTreeMap::new();
    for record in &data.submissions {
        let entry = per_student
            .entry(record.student_id.as_str())
            .or_insert((0, Vec::new(), 0));
        entry.0 += 1;
        entry.1.push(record.score);
        entry.2 += usize::from(record.is_correct());
    }

    let majors: HashMap<&str, &str> = data
        .students
        .iter()
        .filter_map(|s| Some((s.student_id.as_str(), s.major.as_deref()?)))
        .collect();

    let mut students: Vec<StudentCluster> = per_student
        .into_iter()
        .map(|(id, (count, scores, correct))| StudentCluster {
            student_id: id.to_string(),
            submission_count: count,
            avg_score: mean_present(scores).unwrap_or(0.0),
            accuracy: correct as f64 / count as f64,
            cluster: 0,
            major: majors.get(id).map(|m| m.to_string()),
        })
        .collect();

    let points: Vec<Vec<f64>> = students
        .iter()
        .map(|s| vec![s.submission_count as f64, s.avg_score, s.accuracy])
        .collect();
    let (_, scaled) = StandardScaler::fit_transform(&points);

    let kmeans = KMeans {
        n_init: config.cluster_restarts,
        ..KMeans::new(config.clusters, config.cluster_seed)
    };
    let clustering = kmeans.fit(&scaled)?;

    for (student, label) in students.iter_mut().zip(&clustering.labels) {
        student.cluster = *label;
    }
    info!(
        students = students.len(),
        inertia = clustering.inertia,
        "Behaviour clusters fitted"
    );

    Ok(BehaviorClusters {
        k: clustering.centroids.len(),
        inertia: clustering.inertia,
        students,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DAY0, student, submission_at};

    fn records_for(student: &str, n: usize, state: &str, score: f64) -> Vec<crate::records::SubmitRecord> {
        (0..n)
            .map(|_| submission_at("Class1", student, "Q1", state, score, DAY0))
            .collect()
    }

    #[test]
    fn test_groups_similar_students() {
        let mut submissions = Vec::new();
        submissions.extend(records_for("a1", 2, "Error1", 0.0));
        submissions.extend(records_for("a2", 2, "Error1", 0.0));
        submissions.extend(records_for("b1", 20, "Absolutely_Correct", 3.0));
        submissions.extend(records_for("b2", 20, "Absolutely_Correct", 3.0));
        submissions.extend(records_for("c1", 8, "Partially_Correct", 1.0));
        submissions.extend(records_for("c2", 8, "Partially_Correct", 1.0));

        let data = DataSet {
            submissions,
            students: vec![student("a1", "J00001")],
            ..DataSet::default()
        };
        let result = behavior_clusters(&data, &ModelConfig::default()).unwrap();

        assert_eq!(result.k, 3);
        let by_id: HashMap<_, _> = result
            .students
            .iter()
            .map(|s| (s.student_id.as_str(), s.cluster))
            .collect();
        assert_eq!(by_id["a1"], by_id["a2"]);
        assert_eq!(by_id["b1"], by_id["b2"]);
        assert_eq!(by_id["c1"], by_id["c2"]);
        assert_ne!(by_id["a1"], by_id["b1"]);
        assert_ne!(by_id["a1"], by_id["c1"]);

        assert_eq!(result.students[0].major.as_deref(), Some("J00001"));
        assert_eq!(result.students[1].major, None);
    }

    #[test]
    fn test_empty_submissions_error() {
        let err = behavior_clusters(&DataSet::default(), &ModelConfig::default()).unwrap_err();
        assert_eq!(err, ModelError::NoPoints);
    }
}

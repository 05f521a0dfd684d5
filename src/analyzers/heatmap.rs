use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::analyzers::types::{HeatmapCell, KnowledgeHeatmap};
use crate::loader::DataSet;
use crate::stats::class_sort_key;

/// Majors look like `J` followed by five digits; anything else is noise.
static VALID_MAJOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^J\d{5}$").expect("static regex"));

pub fn is_valid_major(major: &str) -> bool {
    VALID_MAJOR.is_match(major)
}

/// Mean submission score per class, major and knowledge point.
///
/// Submissions are joined to the roster for the major and to the problem
/// metadata for the knowledge hierarchy. Rows with an unknown or invalid
/// major, no knowledge hierarchy, or a blank or non-positive score are
/// dropped.
pub fn knowledge_heatmap(data: &DataSet) -> KnowledgeHeatmap {
    let majors_by_student: HashMap<&str, &str> = data
        .students
        .iter()
        .filter_map(|s| {
            let major = s.major.as_deref()?.trim();
            is_valid_major(major).then_some((s.student_id.as_str(), major))
        })
        .collect();

    let hierarchy_by_title: HashMap<&str, (&str, &str)> = data
        .titles
        .iter()
        .filter_map(|t| Some((t.title_id.as_str(), t.knowledge_hierarchy()?)))
        .collect();

    type Key<'a> = (&'a str, &'a str, &'a str, &'a str);
    let mut sums: BTreeMap<Key, (f64, usize)> = BTreeMap::new();
    let mut max_score = 0.0f64;
    let mut dropped = 0usize;

    for record in &data.submissions {
        let major = majors_by_student.get(record.student_id.as_str());
        let hierarchy = hierarchy_by_title.get(record.title_id.as_str());
        let score = record.score.filter(|s| *s > 0.0);
        let (Some(major), Some((main, detail)), Some(score)) = (major, hierarchy, score) else {
            dropped += 1;
            continue;
        };

        max_score = max_score.max(score);
        let entry = sums
            .entry((record.class.as_str(), *major, *main, *detail))
            .or_insert((0.0, 0));
        entry.0 += score;
        entry.1 += 1;
    }
    debug!(kept = data.submissions.len() - dropped, dropped, "Heatmap rows filtered");

    let mut classes: BTreeSet<&str> = BTreeSet::new();
    let mut majors: BTreeSet<&str> = BTreeSet::new();
    let cells: Vec<HeatmapCell> = sums
        .into_iter()
        .map(|((class, major, main, detail), (sum, n))| {
            classes.insert(class);
            majors.insert(major);
            HeatmapCell {
                class: class.to_string(),
                major: major.to_string(),
                knowledge_main: main.to_string(),
                knowledge_detail: detail.to_string(),
                score: sum / n as f64,
            }
        })
        .collect();

    let mut classes: Vec<String> = classes.into_iter().map(str::to_string).collect();
    classes.sort_by(|a, b| class_sort_key(a).cmp(&class_sort_key(b)));

    KnowledgeHeatmap {
        cells,
        classes,
        majors: majors.into_iter().map(str::to_string).collect(),
        max_score,
    }
}

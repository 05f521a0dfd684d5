use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::analyzers::types::{SubmissionTimeline, TimelineFrame};
use crate::records::SubmitRecord;
use crate::stats::class_sort_key;

/// Daily submission counts per class. Every frame lists every class, with 0
/// for classes that did not submit that day.
pub fn submission_timeline(records: &[SubmitRecord]) -> SubmissionTimeline {
    let mut counts: BTreeMap<NaiveDate, BTreeMap<&str, usize>> = BTreeMap::new();
    let mut classes: BTreeSet<&str> = BTreeSet::new();

    for record in records {
        let Some(date) = record.date() else {
            continue;
        };
        classes.insert(record.class.as_str());
        *counts
            .entry(date)
            .or_default()
            .entry(record.class.as_str())
            .or_default() += 1;
    }

    let mut classes: Vec<&str> = classes.into_iter().collect();
    classes.sort_by(|a, b| class_sort_key(a).cmp(&class_sort_key(b)));

    let frames = counts
        .into_iter()
        .map(|(date, per_class)| TimelineFrame {
            date,
            counts: classes
                .iter()
                .map(|c| per_class.get(c).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    SubmissionTimeline {
        classes: classes.into_iter().map(str::to_string).collect(),
        frames,
    }
}

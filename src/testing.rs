//! Builders shared by the unit tests.

use crate::records::{StudentInfo, SubmitRecord, TitleInfo};

/// 2024-01-01T00:00:00Z
pub const DAY0: i64 = 1_704_067_200;
pub const DAY: i64 = 86_400;

pub fn submission(student: &str, state: &str, score: f64) -> SubmitRecord {
    SubmitRecord {
        index: None,
        class: "Class1".to_string(),
        time: Some(DAY0),
        state: state.to_string(),
        score: Some(score),
        title_id: "Question_1".to_string(),
        method: None,
        memory: None,
        timeconsume: Some(1000.0),
        student_id: student.to_string(),
    }
}

pub fn submission_at(
    class: &str,
    student: &str,
    title: &str,
    state: &str,
    score: f64,
    time: i64,
) -> SubmitRecord {
    SubmitRecord {
        class: class.to_string(),
        title_id: title.to_string(),
        time: Some(time),
        ..submission(student, state, score)
    }
}

pub fn student(id: &str, major: &str) -> StudentInfo {
    StudentInfo {
        index: None,
        student_id: id.to_string(),
        sex: None,
        age: None,
        major: Some(major.to_string()),
    }
}

pub fn title(id: &str, knowledge: &str, sub_knowledge: &str) -> TitleInfo {
    TitleInfo {
        index: None,
        title_id: id.to_string(),
        score: Some(3.0),
        knowledge: Some(knowledge.to_string()),
        sub_knowledge: Some(sub_knowledge.to_string()),
    }
}

//! Builders shared by unit tests.

use chrono::NaiveDate;

use crate::model::{
    CompositeScores, ExamSubmission, ExamType, MainSubjectScore, ScorePayload, SingleSubjectScore,
    SubjectCount,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn base(id: &str, exam_type: ExamType, name: Option<&str>, on: NaiveDate) -> ExamSubmission {
    ExamSubmission {
        id: id.into(),
        student_id: "student-1".into(),
        exam_type,
        exam_name: name.map(str::to_string),
        exam_date: on,
        total_questions: 0.into(),
        correct_answers: 0.into(),
        wrong_answers: 0.into(),
        empty_answers: 0.into(),
        score: None,
        net_score: None,
        subject_scores: ScorePayload::Missing,
    }
}

pub fn single(
    id: &str,
    exam_type: ExamType,
    name: &str,
    on: NaiveDate,
    subject: &str,
    correct: u32,
    wrong: u32,
) -> ExamSubmission {
    let mut sub = base(id, exam_type, Some(name), on);
    sub.correct_answers = correct.into();
    sub.wrong_answers = wrong.into();
    sub.subject_scores = ScorePayload::Single(SingleSubjectScore {
        subject: subject.into(),
        section: None,
        correct: correct.into(),
        wrong: wrong.into(),
        blank: 0.into(),
    });
    sub
}

pub fn composite(
    id: &str,
    exam_type: ExamType,
    name: Option<&str>,
    on: NaiveDate,
    subjects: Vec<MainSubjectScore>,
) -> ExamSubmission {
    let mut sub = base(id, exam_type, name, on);
    sub.subject_scores = ScorePayload::Composite(CompositeScores { subjects });
    sub
}

pub fn missing(id: &str, exam_type: ExamType, name: &str, on: NaiveDate) -> ExamSubmission {
    base(id, exam_type, Some(name), on)
}

pub fn main_score(subject: &str, correct: u32, wrong: u32) -> MainSubjectScore {
    MainSubjectScore {
        subject: subject.into(),
        correct: correct.into(),
        wrong: wrong.into(),
        blank: 0.into(),
        subs: Vec::new(),
    }
}

pub fn main_with_subs(subject: &str, subs: &[(&str, u32, u32)]) -> MainSubjectScore {
    MainSubjectScore {
        subject: subject.into(),
        correct: 0.into(),
        wrong: 0.into(),
        blank: 0.into(),
        subs: subs
            .iter()
            .map(|(name, correct, wrong)| SubjectCount {
                subject: (*name).into(),
                correct: (*correct).into(),
                wrong: (*wrong).into(),
                blank: 0.into(),
            })
            .collect(),
    }
}

/// A TYT record scoring Turkish 30/10, Math 20/5, Science 15/3, Social 10/2
/// for a total net of 70.
pub fn tyt_seventy(id: &str, name: &str, on: NaiveDate) -> ExamSubmission {
    composite(
        id,
        ExamType::Tyt,
        Some(name),
        on,
        vec![
            main_score("Türkçe", 30, 10),
            main_score("Matematik", 20, 5),
            main_with_subs("Fen Bilimleri", &[("Fizik", 6, 1), ("Kimya", 5, 1), ("Biyoloji", 4, 1)]),
            main_with_subs(
                "Sosyal Bilimler",
                &[("Tarih", 4, 1), ("Coğrafya", 3, 1), ("Felsefe", 2, 0), ("Din Kültürü", 1, 0)],
            ),
        ],
    )
}

/// A TYT record with the given total net, carried entirely by Turkish.
pub fn tyt_with_net(id: &str, name: &str, on: NaiveDate, correct: u32, wrong: u32) -> ExamSubmission {
    composite(
        id,
        ExamType::Tyt,
        Some(name),
        on,
        vec![main_score("Türkçe", correct, wrong)],
    )
}

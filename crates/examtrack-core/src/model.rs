//! Core data model types for examtrack.
//!
//! Raw [`ExamSubmission`] records come from the storage collaborator.
//! [`ExamSitting`] values are derived views rebuilt on every query.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::DataError;
use crate::grouping::NAME_DELIMITER;
use crate::hierarchy::{self, ExamLayout};
use crate::scoring::{self, AnswerCount};

/// Supported exam types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExamType {
    Tyt,
    Ayt,
    Lgs,
}

impl ExamType {
    pub const ALL: [ExamType; 3] = [ExamType::Tyt, ExamType::Ayt, ExamType::Lgs];

    /// Whether a payload of the given kind is a legal shape for this exam.
    pub fn accepts(self, kind: PayloadKind) -> bool {
        match (self, kind) {
            (ExamType::Tyt, PayloadKind::Composite) => true,
            (ExamType::Ayt, PayloadKind::Single) => true,
            (ExamType::Lgs, PayloadKind::Composite | PayloadKind::Single) => true,
            _ => false,
        }
    }

    pub fn layout(self) -> &'static ExamLayout {
        hierarchy::layout(self)
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExamType::Tyt => write!(f, "TYT"),
            ExamType::Ayt => write!(f, "AYT"),
            ExamType::Lgs => write!(f, "LGS"),
        }
    }
}

impl FromStr for ExamType {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TYT" => Ok(ExamType::Tyt),
            "AYT" => Ok(ExamType::Ayt),
            "LGS" => Ok(ExamType::Lgs),
            _ => Err(DataError::UnknownExamType(s.to_string())),
        }
    }
}

/// Answer counts for one subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectCount {
    pub subject: String,
    #[serde(default)]
    pub correct: AnswerCount,
    #[serde(default)]
    pub wrong: AnswerCount,
    #[serde(default)]
    pub blank: AnswerCount,
}

impl SubjectCount {
    pub fn net(&self) -> f64 {
        scoring::net(self.correct.get(), self.wrong.get())
    }
}

/// A main subject inside a composite payload.
///
/// When `subs` is non-empty the main net is the sum of the sub nets and the
/// main-level counts are ignored for scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MainSubjectScore {
    pub subject: String,
    #[serde(default)]
    pub correct: AnswerCount,
    #[serde(default)]
    pub wrong: AnswerCount,
    #[serde(default)]
    pub blank: AnswerCount,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subs: Vec<SubjectCount>,
}

impl MainSubjectScore {
    pub fn net(&self) -> f64 {
        if self.subs.is_empty() {
            scoring::net(self.correct.get(), self.wrong.get())
        } else {
            self.subs.iter().map(SubjectCount::net).sum()
        }
    }
}

/// All main subjects of one sitting carried in a single record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeScores {
    #[serde(default)]
    pub subjects: Vec<MainSubjectScore>,
}

impl CompositeScores {
    pub fn net(&self) -> f64 {
        self.subjects.iter().map(MainSubjectScore::net).sum()
    }
}

/// One subject's result; several of these compose a sitting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SingleSubjectScore {
    pub subject: String,
    /// Main subject the result belongs to, for subjects that appear under
    /// more than one main subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default)]
    pub correct: AnswerCount,
    #[serde(default)]
    pub wrong: AnswerCount,
    #[serde(default)]
    pub blank: AnswerCount,
}

impl SingleSubjectScore {
    pub fn net(&self) -> f64 {
        scoring::net(self.correct.get(), self.wrong.get())
    }
}

/// The subject payload of a submission, tagged by shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScorePayload {
    Composite(CompositeScores),
    Single(SingleSubjectScore),
    Missing,
    Malformed { reason: String },
}

impl Default for ScorePayload {
    fn default() -> Self {
        ScorePayload::Missing
    }
}

/// Discriminant of [`ScorePayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    Composite,
    Single,
    Missing,
    Malformed,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadKind::Composite => write!(f, "composite"),
            PayloadKind::Single => write!(f, "single-subject"),
            PayloadKind::Missing => write!(f, "missing"),
            PayloadKind::Malformed => write!(f, "malformed"),
        }
    }
}

impl ScorePayload {
    /// Interpret a raw JSON payload without ever failing.
    ///
    /// Null or absent payloads become `Missing`; anything that does not fit
    /// a schema becomes `Malformed` with the parse error kept as the reason.
    /// Untagged objects are classified by shape: a `subjects` array means
    /// composite, a `subject` string means single-subject.
    pub fn from_value(value: Option<Value>) -> Self {
        let mut value = match value {
            None | Some(Value::Null) => return ScorePayload::Missing,
            Some(v) => v,
        };

        if let Value::Object(map) = &mut value {
            if !map.contains_key("kind") {
                let inferred = if map.get("subjects").is_some_and(Value::is_array) {
                    Some("composite")
                } else if map.get("subject").is_some_and(Value::is_string) {
                    Some("single")
                } else {
                    None
                };
                if let Some(kind) = inferred {
                    map.insert("kind".into(), Value::String(kind.into()));
                }
            }
        }

        match ScorePayload::deserialize(value) {
            Ok(payload) => payload,
            Err(e) => ScorePayload::Malformed {
                reason: e.to_string(),
            },
        }
    }

    pub fn kind(&self) -> PayloadKind {
        match self {
            ScorePayload::Composite(_) => PayloadKind::Composite,
            ScorePayload::Single(_) => PayloadKind::Single,
            ScorePayload::Missing => PayloadKind::Missing,
            ScorePayload::Malformed { .. } => PayloadKind::Malformed,
        }
    }
}

fn lenient_payload<'de, D>(deserializer: D) -> Result<ScorePayload, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(ScorePayload::from_value(value))
}

fn lenient_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_exam_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
}

/// Parse a date given either as `YYYY-MM-DD` or as an RFC 3339 timestamp.
pub fn parse_exam_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// A validated view of a usable payload.
#[derive(Debug, Clone, Copy)]
pub enum Scores<'a> {
    Composite(&'a CompositeScores),
    Single(&'a SingleSubjectScore),
}

impl Scores<'_> {
    pub fn net(&self) -> f64 {
        match self {
            Scores::Composite(c) => c.net(),
            Scores::Single(s) => s.net(),
        }
    }
}

/// A raw exam submission as stored. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSubmission {
    pub id: String,
    pub student_id: String,
    pub exam_type: ExamType,
    /// Display name. For single-subject records this is usually
    /// `"<sitting name> - <subject name>"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_name: Option<String>,
    #[serde(deserialize_with = "lenient_date")]
    pub exam_date: NaiveDate,
    #[serde(default)]
    pub total_questions: AnswerCount,
    #[serde(default)]
    pub correct_answers: AnswerCount,
    #[serde(default)]
    pub wrong_answers: AnswerCount,
    #[serde(default)]
    pub empty_answers: AnswerCount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Net as stored upstream. Never trusted for aggregation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_payload")]
    pub subject_scores: ScorePayload,
}

impl ExamSubmission {
    /// The payload, if it is readable and legal for the exam type.
    pub fn scores(&self) -> Result<Scores<'_>, DataError> {
        let kind = self.subject_scores.kind();
        let scores = match &self.subject_scores {
            ScorePayload::Composite(c) => Scores::Composite(c),
            ScorePayload::Single(s) => Scores::Single(s),
            ScorePayload::Missing => return Err(DataError::MissingPayload),
            ScorePayload::Malformed { reason } => {
                return Err(DataError::MalformedPayload(reason.clone()))
            }
        };
        if !self.exam_type.accepts(kind) {
            return Err(DataError::VariantMismatch {
                exam_type: self.exam_type,
                kind,
            });
        }
        Ok(scores)
    }

    /// Net recomputed from the payload; 0 when the payload is unusable.
    pub fn net(&self) -> f64 {
        self.scores().map(|s| s.net()).unwrap_or(0.0)
    }

    /// Whether this record carries one subject of a multi-record sitting.
    ///
    /// LGS records follow their payload shape. When the payload is unusable
    /// the display name decides: a `"<sitting> - <subject>"` name joins that
    /// sitting.
    pub fn is_single_subject(&self) -> bool {
        match self.exam_type {
            ExamType::Tyt => false,
            ExamType::Ayt => true,
            ExamType::Lgs => match self.subject_scores {
                ScorePayload::Single(_) => true,
                ScorePayload::Composite(_) => false,
                ScorePayload::Missing | ScorePayload::Malformed { .. } => {
                    self.has_sitting_prefix()
                }
            },
        }
    }

    fn has_sitting_prefix(&self) -> bool {
        self.exam_name
            .as_deref()
            .and_then(|name| name.split_once(NAME_DELIMITER))
            .is_some_and(|(base, _)| !base.trim().is_empty())
    }

    /// Leaf-level answer rows, named canonically where the hierarchy knows
    /// the subject. Unusable payloads yield no rows.
    pub fn answer_rows(&self) -> Vec<AnswerRow> {
        let layout = self.exam_type.layout();
        let canonical = |declared: &str, section: Option<&str>| -> String {
            layout
                .locate(declared, section)
                .and_then(|slot| layout.subject(slot))
                .map(|s| s.name.to_string())
                .unwrap_or_else(|| declared.trim().to_string())
        };

        match self.scores() {
            Ok(Scores::Composite(c)) => c
                .subjects
                .iter()
                .flat_map(|main| {
                    if main.subs.is_empty() {
                        vec![AnswerRow::new(
                            canonical(&main.subject, None),
                            main.correct,
                            main.wrong,
                            main.blank,
                        )]
                    } else {
                        main.subs
                            .iter()
                            .map(|sub| {
                                AnswerRow::new(
                                    canonical(&sub.subject, Some(main.subject.as_str())),
                                    sub.correct,
                                    sub.wrong,
                                    sub.blank,
                                )
                            })
                            .collect()
                    }
                })
                .collect(),
            Ok(Scores::Single(s)) => vec![AnswerRow::new(
                canonical(&s.subject, s.section.as_deref()),
                s.correct,
                s.wrong,
                s.blank,
            )],
            Err(_) => Vec::new(),
        }
    }
}

/// Answer counts for one subject on one record, used by the breakdown tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRow {
    pub subject: String,
    pub correct: u32,
    pub wrong: u32,
    pub blank: u32,
}

impl AnswerRow {
    pub fn new(
        subject: impl Into<String>,
        correct: AnswerCount,
        wrong: AnswerCount,
        blank: AnswerCount,
    ) -> Self {
        Self {
            subject: subject.into(),
            correct: correct.get(),
            wrong: wrong.get(),
            blank: blank.get(),
        }
    }
}

/// Net of one subject slot within a sitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectNet {
    pub key: String,
    pub name: String,
    pub net: f64,
    /// `false` when no submission filled this slot; `net` is then 0.
    pub present: bool,
}

impl SubjectNet {
    pub fn empty(key: &str, name: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            net: 0.0,
            present: false,
        }
    }

    pub fn add(&mut self, net: f64) {
        self.net += net;
        self.present = true;
    }
}

/// Net of a main subject slot with its sub-subject slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainSlotNet {
    #[serde(flatten)]
    pub slot: SubjectNet,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subs: Vec<SubjectNet>,
}

/// One logical exam attempt, derived from one or more submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSitting {
    pub name: String,
    pub exam_type: ExamType,
    /// Latest exam date among the members.
    pub date: NaiveDate,
    pub total_net: f64,
    pub member_submissions: Vec<ExamSubmission>,
    /// Every main subject of the exam type in display order, filled or not.
    pub breakdown: Vec<MainSlotNet>,
    /// Nets whose declared subject is not part of the hierarchy.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unassigned: Vec<SubjectNet>,
}

impl ExamSitting {
    /// Net of a main subject or sub-subject, looked up by key or name.
    pub fn subject_net(&self, subject: &str) -> Option<f64> {
        let layout = self.exam_type.layout();
        let slot = layout.locate(subject, None)?;
        let main = self.breakdown.get(slot.main)?;
        match slot.sub {
            None => Some(main.slot.net),
            Some(i) => main.subs.get(i).map(|s| s.net),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exam_type_display_and_parse() {
        assert_eq!(ExamType::Tyt.to_string(), "TYT");
        assert_eq!("ayt".parse::<ExamType>().unwrap(), ExamType::Ayt);
        assert_eq!(" LGS ".parse::<ExamType>().unwrap(), ExamType::Lgs);
        assert_eq!(
            "KPSS".parse::<ExamType>(),
            Err(DataError::UnknownExamType("KPSS".into()))
        );
    }

    #[test]
    fn exam_type_accepts_variants() {
        assert!(ExamType::Tyt.accepts(PayloadKind::Composite));
        assert!(!ExamType::Tyt.accepts(PayloadKind::Single));
        assert!(ExamType::Ayt.accepts(PayloadKind::Single));
        assert!(!ExamType::Ayt.accepts(PayloadKind::Composite));
        assert!(ExamType::Lgs.accepts(PayloadKind::Single));
        assert!(ExamType::Lgs.accepts(PayloadKind::Composite));
        assert!(!ExamType::Lgs.accepts(PayloadKind::Missing));
    }

    #[test]
    fn payload_tagged_and_inferred() {
        let tagged = ScorePayload::from_value(Some(json!({
            "kind": "single", "subject": "Fizik", "correct": 10, "wrong": 4
        })));
        assert_eq!(tagged.kind(), PayloadKind::Single);

        let inferred = ScorePayload::from_value(Some(json!({
            "subjects": [{ "subject": "Türkçe", "correct": "30", "wrong": 10 }]
        })));
        match inferred {
            ScorePayload::Composite(c) => assert_eq!(c.net(), 27.5),
            other => panic!("expected composite, got {other:?}"),
        }
    }

    #[test]
    fn payload_missing_and_malformed() {
        assert_eq!(ScorePayload::from_value(None), ScorePayload::Missing);
        assert_eq!(
            ScorePayload::from_value(Some(Value::Null)),
            ScorePayload::Missing
        );
        assert_eq!(
            ScorePayload::from_value(Some(json!("garbage"))).kind(),
            PayloadKind::Malformed
        );
        assert_eq!(
            ScorePayload::from_value(Some(json!({ "kind": "composite", "subjects": 5 }))).kind(),
            PayloadKind::Malformed
        );
    }

    #[test]
    fn submission_deserializes_with_bad_payload() {
        let sub: ExamSubmission = serde_json::from_value(json!({
            "id": "s1",
            "studentId": "u1",
            "examType": "TYT",
            "examDate": "2024-03-10T09:30:00Z",
            "totalQuestions": "120",
            "subjectScores": [1, 2, 3]
        }))
        .unwrap();
        assert_eq!(sub.exam_date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(sub.total_questions.get(), 120);
        assert_eq!(sub.subject_scores.kind(), PayloadKind::Malformed);
        assert_eq!(sub.net(), 0.0);
        assert!(matches!(sub.scores(), Err(DataError::MalformedPayload(_))));
    }

    #[test]
    fn variant_mismatch_scores_zero() {
        let sub: ExamSubmission = serde_json::from_value(json!({
            "id": "s1",
            "studentId": "u1",
            "examType": "AYT",
            "examDate": "2024-03-10",
            "subjectScores": { "subjects": [{ "subject": "Matematik", "correct": 20 }] }
        }))
        .unwrap();
        assert_eq!(sub.net(), 0.0);
        assert_eq!(
            sub.scores().unwrap_err(),
            DataError::VariantMismatch {
                exam_type: ExamType::Ayt,
                kind: PayloadKind::Composite
            }
        );
    }

    #[test]
    fn composite_main_net_sums_subs() {
        let main = MainSubjectScore {
            subject: "Fen Bilimleri".into(),
            correct: 99.into(),
            wrong: 0.into(),
            blank: 0.into(),
            subs: vec![
                SubjectCount {
                    subject: "Fizik".into(),
                    correct: 5.into(),
                    wrong: 2.into(),
                    blank: 0.into(),
                },
                SubjectCount {
                    subject: "Kimya".into(),
                    correct: 4.into(),
                    wrong: 0.into(),
                    blank: 3.into(),
                },
            ],
        };
        assert_eq!(main.net(), 8.5);
    }

    #[test]
    fn answer_rows_use_canonical_names() {
        let sub: ExamSubmission = serde_json::from_value(json!({
            "id": "s1",
            "studentId": "u1",
            "examType": "TYT",
            "examDate": "2024-03-10",
            "subjectScores": { "subjects": [
                { "subject": "turkish", "correct": 30, "wrong": 10 },
                { "subject": "science", "subs": [
                    { "subject": "physics", "correct": 5, "wrong": 1, "blank": 1 }
                ]}
            ]}
        }))
        .unwrap();
        let rows = sub.answer_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].subject, "Türkçe");
        assert_eq!(rows[1].subject, "Fizik");
        assert_eq!(rows[1].blank, 1);
    }
}

//! JSON submission and practice-log loading, plus data-quality validation.
//!
//! Files hold either a bare JSON array of records or an object with a
//! `submissions` (or `entries`) array. Records that cannot be read at all
//! (no id, unknown exam type, bad date) are skipped with a warning; records
//! with a bad subject payload are kept and degraded later.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::grouping::group;
use crate::hierarchy::TYT_TOTAL_QUESTIONS;
use crate::model::{ExamSubmission, ExamType, Scores};
use crate::practice::PracticeEntry;

/// Tolerance when comparing a stored net against the recomputed one.
const NET_TOLERANCE: f64 = 0.01;

/// A record that was dropped while loading.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: String,
}

/// Records read from a file plus the ones that had to be dropped.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedRecord>,
}

/// Load exam submissions from a JSON file.
pub fn load_submissions(path: &Path) -> Result<Loaded<ExamSubmission>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read submissions file: {}", path.display()))?;
    parse_records(&content, "submissions", path)
}

/// Parse exam submissions from a JSON string (useful for testing).
pub fn parse_submissions_str(content: &str, source_path: &Path) -> Result<Loaded<ExamSubmission>> {
    parse_records(content, "submissions", source_path)
}

/// Load practice log entries from a JSON file.
pub fn load_practice_log(path: &Path) -> Result<Loaded<PracticeEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read practice log: {}", path.display()))?;
    parse_records(&content, "entries", path)
}

/// Write submissions back as a pretty-printed JSON array.
pub fn save_submissions(path: &Path, submissions: &[ExamSubmission]) -> Result<()> {
    let json = serde_json::to_string_pretty(submissions).context("failed to serialize submissions")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write submissions to {}", path.display()))?;
    Ok(())
}

fn parse_records<T: DeserializeOwned>(content: &str, field: &str, source_path: &Path) -> Result<Loaded<T>> {
    let root: Value = serde_json::from_str(content)
        .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;

    let items = match root {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(field) {
            Some(Value::Array(items)) => items,
            _ => anyhow::bail!(
                "expected a JSON array or an object with a '{field}' array: {}",
                source_path.display()
            ),
        },
        _ => anyhow::bail!("expected a JSON array: {}", source_path.display()),
    };

    let mut records = Vec::with_capacity(items.len());
    let mut skipped = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("skipping record {index} in {}: {e}", source_path.display());
                skipped.push(SkippedRecord {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(Loaded { records, skipped })
}

/// A data-quality warning about a submission set.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    /// The submission ID (if applicable).
    pub submission_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn for_submission(submission: &ExamSubmission, message: impl Into<String>) -> Self {
        Self {
            submission_id: Some(submission.id.clone()),
            message: message.into(),
        }
    }
}

/// Validate submissions for data-quality issues.
///
/// Nothing is clamped or rejected here; impossible counts are reported so
/// the caller can decide what to do with them.
pub fn validate_submissions(submissions: &[ExamSubmission]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Check for duplicate submission IDs
    let mut seen_ids = HashSet::new();
    for sub in submissions {
        if !seen_ids.insert(sub.id.as_str()) {
            warnings.push(ValidationWarning::for_submission(
                sub,
                format!("duplicate submission ID: {}", sub.id),
            ));
        }
    }

    // Payload problems and unknown subjects, as seen by the grouper
    for anomaly in group(submissions).anomalies {
        warnings.push(ValidationWarning {
            submission_id: Some(anomaly.submission_id),
            message: anomaly.message,
        });
    }

    for sub in submissions {
        check_answer_totals(sub, &mut warnings);
        check_section_sizes(sub, &mut warnings);
        check_stored_net(sub, &mut warnings);
    }

    warnings
}

fn check_answer_totals(sub: &ExamSubmission, warnings: &mut Vec<ValidationWarning>) {
    let total = sub.total_questions.get();
    let answered = sub.correct_answers.get() as u64 + sub.wrong_answers.get() as u64;
    if total > 0 && answered > total as u64 {
        warnings.push(ValidationWarning::for_submission(
            sub,
            format!(
                "correct + wrong ({answered}) exceeds totalQuestions ({total}); derived empty count would be negative"
            ),
        ));
    }

    let is_composite_tyt = sub.exam_type == ExamType::Tyt && !sub.is_single_subject();
    if is_composite_tyt && total > 0 && total != TYT_TOTAL_QUESTIONS {
        warnings.push(ValidationWarning::for_submission(
            sub,
            format!("TYT totalQuestions is {total}, expected {TYT_TOTAL_QUESTIONS}"),
        ));
    }
}

fn check_section_sizes(sub: &ExamSubmission, warnings: &mut Vec<ValidationWarning>) {
    let layout = sub.exam_type.layout();
    let mut flag = |name: &str, answered: u32, limit: u32| {
        if answered > limit {
            warnings.push(ValidationWarning::for_submission(
                sub,
                format!("{name} has {answered} answers but the section has {limit} questions"),
            ));
        }
    };
    let answered = |c: u32, w: u32, b: u32| c.saturating_add(w).saturating_add(b);

    match sub.scores() {
        Ok(Scores::Composite(c)) => {
            for main in &c.subjects {
                let Some((_, def)) = layout.main(&main.subject) else {
                    continue;
                };
                if main.subs.is_empty() {
                    flag(
                        def.subject.name,
                        answered(main.correct.get(), main.wrong.get(), main.blank.get()),
                        def.subject.questions,
                    );
                }
                for s in &main.subs {
                    if let Some(sub_def) = def.subs.iter().find(|d| d.matches(&s.subject)) {
                        flag(
                            sub_def.name,
                            answered(s.correct.get(), s.wrong.get(), s.blank.get()),
                            sub_def.questions,
                        );
                    }
                }
            }
        }
        Ok(Scores::Single(s)) => {
            if let Some(def) = layout
                .locate(&s.subject, s.section.as_deref())
                .and_then(|slot| layout.subject(slot))
            {
                flag(
                    def.name,
                    answered(s.correct.get(), s.wrong.get(), s.blank.get()),
                    def.questions,
                );
            }
        }
        Err(_) => {}
    }
}

fn check_stored_net(sub: &ExamSubmission, warnings: &mut Vec<ValidationWarning>) {
    let Some(stored) = sub.net_score else {
        return;
    };
    if sub.scores().is_err() {
        return;
    }
    let computed = sub.net();
    if (stored - computed).abs() > NET_TOLERANCE {
        warnings.push(ValidationWarning::for_submission(
            sub,
            format!("stored netScore {stored} differs from recomputed net {computed}"),
        ));
    }
}

//! Tally over ad-hoc question practice logs.
//!
//! Practice entries are independent of exam sittings and have no blank
//! answers: every question is either correct or wrong.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::AnswerRow;
use crate::scoring::{success_rate, AnswerCount};
use crate::statistics::{subject_breakdown, SubjectBreakdown};

/// One logged practice session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeEntry {
    pub date: NaiveDate,
    pub subject: String,
    #[serde(default)]
    pub correct_answers: AnswerCount,
    #[serde(default)]
    pub wrong_answers: AnswerCount,
}

impl PracticeEntry {
    pub fn total_questions(&self) -> u32 {
        self.correct_answers
            .get()
            .saturating_add(self.wrong_answers.get())
    }

    fn row(&self) -> AnswerRow {
        AnswerRow::new(
            self.subject.trim(),
            self.correct_answers,
            self.wrong_answers,
            AnswerCount::default(),
        )
    }
}

/// Totals, per-subject breakdown, and recent activity of a practice log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeTally {
    pub total_questions: u32,
    pub total_correct: u32,
    pub total_wrong: u32,
    pub success_rate: String,
    pub per_subject: Vec<SubjectBreakdown>,
    /// Most recent entries first.
    pub recent: Vec<PracticeEntry>,
}

/// Tally a practice log.
///
/// `recent` holds up to `recent_limit` entries by descending date; entries
/// on the same date keep their log order.
pub fn tally_practice(
    entries: &[PracticeEntry],
    recent_limit: usize,
    rate_decimals: u32,
) -> PracticeTally {
    let total_correct = entries
        .iter()
        .fold(0u32, |acc, e| acc.saturating_add(e.correct_answers.get()));
    let total_wrong = entries
        .iter()
        .fold(0u32, |acc, e| acc.saturating_add(e.wrong_answers.get()));
    let total_questions = total_correct.saturating_add(total_wrong);

    let mut recent: Vec<PracticeEntry> = entries.to_vec();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(recent_limit);

    PracticeTally {
        total_questions,
        total_correct,
        total_wrong,
        success_rate: success_rate(total_correct, total_questions, rate_decimals),
        per_subject: subject_breakdown(entries.iter().map(PracticeEntry::row), rate_decimals),
        recent,
    }
}

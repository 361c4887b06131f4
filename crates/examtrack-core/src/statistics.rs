//! Longitudinal and per-subject statistics over sittings.
//!
//! Numeric work happens on unrounded nets in [`NetTrend`]; [`ExamStats`] is
//! the presentation form with fixed decimals and `"0"` for absent values.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{AnswerRow, ExamSitting, ExamSubmission};
use crate::scoring::{present_or_zero, success_rate};

/// Unrounded trend figures over sittings in ascending date order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NetTrend {
    pub count: usize,
    pub average: Option<f64>,
    pub best: Option<f64>,
    pub first: Option<f64>,
    pub latest: Option<f64>,
    /// Net of the sitting immediately before the latest one.
    pub previous: Option<f64>,
}

impl NetTrend {
    /// Compute the trend. Sittings are re-sorted by date (stably) so callers
    /// may pass them in any order.
    ///
    /// The latest sitting is the first encountered among those with the
    /// greatest date, the same one the distribution snapshot describes. The
    /// other sittings on that date precede it.
    pub fn compute(sittings: &[ExamSitting]) -> Self {
        let mut ordered: Vec<&ExamSitting> = sittings.iter().collect();
        ordered.sort_by_key(|s| s.date);
        if let Some(last_date) = ordered.last().map(|s| s.date) {
            if let Some(idx) = ordered.iter().position(|s| s.date == last_date) {
                let latest = ordered.remove(idx);
                ordered.push(latest);
            }
        }

        let nets: Vec<f64> = ordered.iter().map(|s| s.total_net).collect();
        let count = nets.len();
        if count == 0 {
            return NetTrend::default();
        }

        NetTrend {
            count,
            average: Some(nets.iter().sum::<f64>() / count as f64),
            best: nets.iter().copied().reduce(f64::max),
            first: nets.first().copied(),
            latest: nets.last().copied(),
            previous: count.checked_sub(2).and_then(|i| nets.get(i).copied()),
        }
    }

    /// First-to-latest change; `None` with fewer than two sittings.
    pub fn improvement(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        Some(self.latest? - self.first?)
    }

    /// Change over the immediately preceding sitting; `None` with fewer than
    /// two sittings.
    pub fn previous_change(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        Some(self.latest? - self.previous?)
    }
}

/// Headline statistics in presentation form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamStats {
    /// Distinct sittings, never individual subject rows.
    pub total_exams: usize,
    pub average_net: String,
    pub best_net: String,
    pub latest_net: String,
    /// Latest minus first sitting.
    pub improvement: String,
    /// Latest minus the sitting before it.
    pub previous_change: String,
}

impl ExamStats {
    pub fn from_trend(trend: &NetTrend, decimals: u32) -> Self {
        Self {
            total_exams: trend.count,
            average_net: present_or_zero(trend.average, decimals),
            best_net: present_or_zero(trend.best, decimals),
            latest_net: present_or_zero(trend.latest, decimals),
            improvement: present_or_zero(trend.improvement(), decimals),
            previous_change: present_or_zero(trend.previous_change(), decimals),
        }
    }
}

impl Default for ExamStats {
    fn default() -> Self {
        ExamStats::from_trend(&NetTrend::default(), 2)
    }
}

/// Compute headline statistics for a list of sittings.
pub fn exam_stats(sittings: &[ExamSitting], decimals: u32) -> ExamStats {
    ExamStats::from_trend(&NetTrend::compute(sittings), decimals)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    correct: u32,
    wrong: u32,
    blank: u32,
}

impl Tally {
    fn add(&mut self, row: &AnswerRow) {
        self.correct = self.correct.saturating_add(row.correct);
        self.wrong = self.wrong.saturating_add(row.wrong);
        self.blank = self.blank.saturating_add(row.blank);
    }

    fn total(&self) -> u32 {
        self.correct
            .saturating_add(self.wrong)
            .saturating_add(self.blank)
    }
}

/// Answer totals for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectBreakdown {
    pub subject: String,
    pub correct: u32,
    pub wrong: u32,
    pub blank: u32,
    pub total: u32,
    pub success_rate: String,
}

/// Answer totals for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBreakdown {
    pub day: NaiveDate,
    pub correct: u32,
    pub wrong: u32,
    pub blank: u32,
    pub total: u32,
    pub success_rate: String,
}

/// Per-subject totals, sorted by `total` descending. Subjects with equal
/// totals keep first-seen order.
pub fn subject_breakdown<I>(rows: I, rate_decimals: u32) -> Vec<SubjectBreakdown>
where
    I: IntoIterator<Item = AnswerRow>,
{
    let mut order: Vec<String> = Vec::new();
    let mut tallies: HashMap<String, Tally> = HashMap::new();
    for row in rows {
        if !tallies.contains_key(&row.subject) {
            order.push(row.subject.clone());
        }
        tallies.entry(row.subject.clone()).or_default().add(&row);
    }

    let mut out: Vec<SubjectBreakdown> = order
        .into_iter()
        .map(|subject| {
            let t = tallies.get(&subject).copied().unwrap_or_default();
            SubjectBreakdown {
                subject,
                correct: t.correct,
                wrong: t.wrong,
                blank: t.blank,
                total: t.total(),
                success_rate: success_rate(t.correct, t.total(), rate_decimals),
            }
        })
        .collect();
    out.sort_by(|a, b| b.total.cmp(&a.total));
    out
}

/// Per-day totals, ascending by day.
pub fn daily_breakdown<I>(rows: I, rate_decimals: u32) -> Vec<DailyBreakdown>
where
    I: IntoIterator<Item = (NaiveDate, AnswerRow)>,
{
    let mut days: BTreeMap<NaiveDate, Tally> = BTreeMap::new();
    for (day, row) in rows {
        days.entry(day).or_default().add(&row);
    }
    days.into_iter()
        .map(|(day, t)| DailyBreakdown {
            day,
            correct: t.correct,
            wrong: t.wrong,
            blank: t.blank,
            total: t.total(),
            success_rate: success_rate(t.correct, t.total(), rate_decimals),
        })
        .collect()
}

/// Per-subject totals over the leaf rows of raw submissions.
pub fn submission_subject_stats(
    submissions: &[ExamSubmission],
    rate_decimals: u32,
) -> Vec<SubjectBreakdown> {
    subject_breakdown(
        submissions.iter().flat_map(ExamSubmission::answer_rows),
        rate_decimals,
    )
}

/// Per-day totals over the leaf rows of raw submissions.
pub fn submission_daily_stats(
    submissions: &[ExamSubmission],
    rate_decimals: u32,
) -> Vec<DailyBreakdown> {
    daily_breakdown(
        submissions
            .iter()
            .flat_map(|s| s.answer_rows().into_iter().map(move |row| (s.exam_date, row))),
        rate_decimals,
    )
}

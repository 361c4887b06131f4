//! Analytics pipeline entry point.
//!
//! `(submissions, filter) -> AnalyticsReport` with no I/O, no caching, and
//! no shared state: callers can rerun it on every filter change.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grouping::group;
use crate::model::{ExamSubmission, ExamType};
use crate::report::AnalyticsReport;
use crate::series::{comparison_series, distribution_snapshot, progress_series, ComparisonScope};
use crate::statistics::{exam_stats, submission_daily_stats, submission_subject_stats};
use crate::traits::SubmissionQuery;

/// Presentation settings for the analytics engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chart labels longer than this are truncated with an ellipsis.
    pub label_max_chars: usize,
    /// Entries kept in the practice activity feed.
    pub recent_limit: usize,
    /// Decimals used when presenting nets.
    pub net_decimals: u32,
    /// Decimals used when presenting success rates.
    pub rate_decimals: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            label_max_chars: 15,
            recent_limit: 5,
            net_decimals: 2,
            rate_decimals: 1,
        }
    }
}

/// Which submissions to analyze and how to break them down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_type: Option<ExamType>,
    /// Inclusive lower bound on exam date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on exam date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    /// Subject for the comparison series; `"all"` compares main subjects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Restrict the comparison series to one sitting name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sitting: Option<String>,
}

impl AnalyticsFilter {
    /// The part of the filter a storage backend can apply.
    pub fn store_query(&self) -> SubmissionQuery {
        SubmissionQuery {
            student_id: self.student_id.clone(),
            exam_type: self.exam_type,
        }
    }

    pub fn admits(&self, submission: &ExamSubmission) -> bool {
        self.store_query().matches(submission)
            && self.from.map_or(true, |d| submission.exam_date >= d)
            && self.to.map_or(true, |d| submission.exam_date <= d)
    }
}

/// Stateless analytics engine.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: EngineConfig,
}

impl AnalyticsEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline over a snapshot of submissions.
    pub fn analyze(&self, submissions: &[ExamSubmission], filter: &AnalyticsFilter) -> AnalyticsReport {
        let selected: Vec<ExamSubmission> = submissions
            .iter()
            .filter(|s| filter.admits(s))
            .cloned()
            .collect();

        let grouping = group(&selected);
        let sittings = grouping.sittings;
        let cfg = &self.config;

        // comparison and distribution need a single exam type
        let focus = filter
            .exam_type
            .or_else(|| sittings.last().map(|s| s.exam_type));

        let comparison = focus.map(|exam_type| {
            comparison_series(
                &sittings,
                exam_type,
                &ComparisonScope::from_filter(filter.subject.as_deref()),
                filter.sitting.as_deref(),
                cfg.label_max_chars,
            )
        });
        let distribution = focus.and_then(|exam_type| distribution_snapshot(&sittings, exam_type));

        debug!(
            input = submissions.len(),
            selected = selected.len(),
            sittings = sittings.len(),
            "analytics pipeline complete"
        );

        AnalyticsReport {
            stats: exam_stats(&sittings, cfg.net_decimals),
            subject_stats: submission_subject_stats(&selected, cfg.rate_decimals),
            daily_stats: submission_daily_stats(&selected, cfg.rate_decimals),
            chart_series: progress_series(&sittings, cfg.label_max_chars),
            comparison_series: comparison,
            distribution,
            anomalies: grouping.anomalies,
            sittings,
        }
    }
}

/// Run the pipeline with the default configuration.
pub fn analyze(submissions: &[ExamSubmission], filter: &AnalyticsFilter) -> AnalyticsReport {
    AnalyticsEngine::default().analyze(submissions, filter)
}

//! Analytics output structures with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::AnalyticsFilter;
use crate::grouping::DataAnomaly;
use crate::model::ExamSitting;
use crate::scoring::present;
use crate::series::{ChartSeries, DistributionSnapshot};
use crate::statistics::{DailyBreakdown, ExamStats, SubjectBreakdown};

/// Everything the reporting views consume for one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub sittings: Vec<ExamSitting>,
    pub stats: ExamStats,
    pub subject_stats: Vec<SubjectBreakdown>,
    pub daily_stats: Vec<DailyBreakdown>,
    /// Progress series: total net per sitting.
    pub chart_series: ChartSeries,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_series: Option<ChartSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<DistributionSnapshot>,
    /// Submissions that were degraded to a zero contribution.
    #[serde(default)]
    pub anomalies: Vec<DataAnomaly>,
}

impl AnalyticsReport {
    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let s = &self.stats;

        md.push_str("## Exam summary\n\n");
        md.push_str("| Sittings | Average | Best | Latest | Improvement | Last change |\n");
        md.push_str("|----------|---------|------|--------|-------------|-------------|\n");
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n\n",
            s.total_exams, s.average_net, s.best_net, s.latest_net, s.improvement, s.previous_change
        ));

        if !self.sittings.is_empty() {
            md.push_str("### Sittings\n\n");
            md.push_str("| Date | Exam | Name | Net | Records |\n");
            md.push_str("|------|------|------|-----|---------|\n");
            for sitting in &self.sittings {
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    sitting.date,
                    sitting.exam_type,
                    sitting.name,
                    present(sitting.total_net, 2),
                    sitting.member_submissions.len()
                ));
            }
            md.push('\n');
        }

        if !self.subject_stats.is_empty() {
            md.push_str("### Subjects\n\n");
            md.push_str("| Subject | Correct | Wrong | Blank | Total | Success % |\n");
            md.push_str("|---------|---------|-------|-------|-------|-----------|\n");
            for b in &self.subject_stats {
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} | {} |\n",
                    b.subject, b.correct, b.wrong, b.blank, b.total, b.success_rate
                ));
            }
            md.push('\n');
        }

        if let Some(dist) = &self.distribution {
            md.push_str(&format!("### Distribution: {} ({})\n\n", dist.sitting, dist.date));
            for slice in &dist.slices {
                md.push_str(&format!(
                    "- {}: {} ({:.1}%)\n",
                    slice.subject,
                    present(slice.net, 2),
                    slice.share
                ));
            }
            md.push('\n');
        }

        if !self.anomalies.is_empty() {
            md.push_str("### Data anomalies\n\n");
            for a in &self.anomalies {
                md.push_str(&format!("- `{}` ({}): {}\n", a.submission_id, a.sitting, a.message));
            }
        }

        md
    }

    /// Returns true if any submission was degraded.
    pub fn has_anomalies(&self) -> bool {
        !self.anomalies.is_empty()
    }
}

/// A persisted analytics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedReport {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub filter: AnalyticsFilter,
    pub report: AnalyticsReport,
}

impl SavedReport {
    pub fn new(filter: AnalyticsFilter, report: AnalyticsReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            filter,
            report,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SavedReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::analyze;
    use crate::model::ExamType;
    use crate::test_support::*;

    fn sample_report() -> AnalyticsReport {
        analyze(
            &[
                tyt_seventy("t", "TYT 1", date(2024, 1, 1)),
                single("m", ExamType::Ayt, "A1 - Matematik", date(2024, 2, 1), "Matematik", 20, 8),
                missing("x", ExamType::Ayt, "A1 - Kimya", date(2024, 2, 1)),
            ],
            &AnalyticsFilter::default(),
        )
    }

    #[test]
    fn json_roundtrip() {
        let saved = SavedReport::new(AnalyticsFilter::default(), sample_report());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        saved.save_json(&path).unwrap();
        let loaded = SavedReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, saved.id);
        assert_eq!(loaded.report, saved.report);
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let json = serde_json::to_value(sample_report()).unwrap();
        assert!(json["stats"]["averageNet"].is_string());
        assert!(json["sittings"][0]["totalNet"].is_number());
        assert!(json["sittings"][0]["memberSubmissions"].is_array());
        assert!(json["chartSeries"]["datasets"][0]["data"].is_array());
    }

    #[test]
    fn markdown_output() {
        let report = sample_report();
        assert!(report.has_anomalies());
        let md = report.to_markdown();
        assert!(md.contains("Exam summary"));
        assert!(md.contains("| 2024-01-01 | TYT | TYT 1 | 70.00 | 1 |"));
        assert!(md.contains("Data anomalies"));
        assert!(md.contains("`x`"));
    }

    #[test]
    fn missing_report_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SavedReport::load_json(&dir.path().join("nope.json")).is_err());
    }
}

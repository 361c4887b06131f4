//! The `examtrack analyze` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table};

use examtrack_core::engine::{AnalyticsEngine, AnalyticsFilter};
use examtrack_core::model::ExamType;
use examtrack_core::parser;
use examtrack_core::report::{AnalyticsReport, SavedReport};
use examtrack_core::scoring::present;

use crate::config::load_config_from;

pub struct AnalyzeOptions {
    pub data: Option<PathBuf>,
    pub exam_type: Option<String>,
    pub student: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub subject: Option<String>,
    pub sitting: Option<String>,
    pub format: String,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub fn execute(opts: AnalyzeOptions) -> Result<()> {
    let config = load_config_from(opts.config.as_deref())?;

    let exam_type = match opts.exam_type {
        Some(raw) => Some(raw.parse::<ExamType>()?),
        None => config.default_exam_type,
    };

    let data_path = opts.data.unwrap_or(config.data_file);
    let loaded = parser::load_submissions(&data_path)?;
    if !loaded.skipped.is_empty() {
        eprintln!("Skipped {} unreadable record(s)", loaded.skipped.len());
    }

    let filter = AnalyticsFilter {
        student_id: opts.student,
        exam_type,
        from: opts.from,
        to: opts.to,
        subject: opts.subject,
        sitting: opts.sitting,
    };

    let engine = AnalyticsEngine::new(config.engine);
    let report = engine.analyze(&loaded.records, &filter);
    let net_decimals = engine.config().net_decimals;

    tracing::info!(
        submissions = loaded.records.len(),
        sittings = report.sittings.len(),
        "analysis complete"
    );

    match opts.format.as_str() {
        "json" => {
            let saved = SavedReport::new(filter, report);
            match &opts.output {
                Some(path) => {
                    saved.save_json(path)?;
                    println!("Report written to {}", path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&saved)?),
            }
        }
        "markdown" | "md" => {
            let md = report.to_markdown();
            match &opts.output {
                Some(path) => {
                    std::fs::write(path, md)
                        .with_context(|| format!("failed to write report to {}", path.display()))?;
                    println!("Report written to {}", path.display());
                }
                None => println!("{md}"),
            }
        }
        "text" => print_summary(&report, net_decimals),
        other => anyhow::bail!("unknown format: {other} (expected text, json, or markdown)"),
    }

    Ok(())
}

fn print_summary(report: &AnalyticsReport, net_decimals: u32) {
    let s = &report.stats;

    let mut stats = Table::new();
    stats.set_header(vec![
        "Sittings",
        "Average",
        "Best",
        "Latest",
        "Improvement",
        "Last change",
    ]);
    stats.add_row(vec![
        Cell::new(s.total_exams),
        Cell::new(&s.average_net),
        Cell::new(&s.best_net),
        Cell::new(&s.latest_net),
        Cell::new(&s.improvement),
        Cell::new(&s.previous_change),
    ]);
    println!("{stats}");

    if report.sittings.is_empty() {
        println!("\nNo exam sittings found.");
        return;
    }

    let mut sittings = Table::new();
    sittings.set_header(vec!["Date", "Exam", "Sitting", "Net", "Records"]);
    for sitting in &report.sittings {
        sittings.add_row(vec![
            Cell::new(sitting.date),
            Cell::new(sitting.exam_type),
            Cell::new(&sitting.name),
            Cell::new(present(sitting.total_net, net_decimals)),
            Cell::new(sitting.member_submissions.len()),
        ]);
    }
    println!("\n{sittings}");

    if !report.subject_stats.is_empty() {
        let mut subjects = Table::new();
        subjects.set_header(vec!["Subject", "Correct", "Wrong", "Blank", "Success %"]);
        for b in &report.subject_stats {
            subjects.add_row(vec![
                Cell::new(&b.subject),
                Cell::new(b.correct),
                Cell::new(b.wrong),
                Cell::new(b.blank),
                Cell::new(&b.success_rate),
            ]);
        }
        println!("\n{subjects}");
    }

    if let Some(dist) = &report.distribution {
        println!("\nLatest {} sitting: {} ({})", dist.exam_type, dist.sitting, dist.date);
        for slice in &dist.slices {
            println!(
                "  {:<40} {:>8} {:>5.1}%",
                slice.subject,
                present(slice.net, net_decimals),
                slice.share
            );
        }
    }

    if report.has_anomalies() {
        println!("\n{} data anomaly(ies):", report.anomalies.len());
        for a in &report.anomalies {
            println!("  [{}] {}: {}", a.submission_id, a.sitting, a.message);
        }
    }
}

//! The `examtrack practice` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use examtrack_core::parser;
use examtrack_core::practice::tally_practice;

use crate::config::load_config_from;

pub fn execute(log: Option<PathBuf>, format: String, config: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let log_path = log.unwrap_or(config.practice_log);

    let loaded = parser::load_practice_log(&log_path)?;
    if !loaded.skipped.is_empty() {
        eprintln!("Skipped {} unreadable entr(ies)", loaded.skipped.len());
    }

    let tally = tally_practice(
        &loaded.records,
        config.engine.recent_limit,
        config.engine.rate_decimals,
    );

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&tally)?),
        "text" => {
            println!(
                "Practice: {} questions, {} correct, {} wrong ({}% success)",
                tally.total_questions, tally.total_correct, tally.total_wrong, tally.success_rate
            );

            if !tally.per_subject.is_empty() {
                let mut table = Table::new();
                table.set_header(vec!["Subject", "Correct", "Wrong", "Total", "Success %"]);
                for b in &tally.per_subject {
                    table.add_row(vec![
                        Cell::new(&b.subject),
                        Cell::new(b.correct),
                        Cell::new(b.wrong),
                        Cell::new(b.total),
                        Cell::new(&b.success_rate),
                    ]);
                }
                println!("\n{table}");
            }

            if !tally.recent.is_empty() {
                println!("\nRecent activity:");
                for entry in &tally.recent {
                    println!(
                        "  {} {}: {} correct, {} wrong",
                        entry.date, entry.subject, entry.correct_answers, entry.wrong_answers
                    );
                }
            }
        }
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}

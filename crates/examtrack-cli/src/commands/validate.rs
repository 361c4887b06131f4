//! The `examtrack validate` command.

use std::path::PathBuf;

use anyhow::Result;

use examtrack_core::parser;

use crate::config::load_config_from;

pub fn execute(data: Option<PathBuf>, strict: bool, config: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let data_path = data.unwrap_or(config.data_file);

    let loaded = parser::load_submissions(&data_path)?;
    println!(
        "Submissions: {} ({} loaded)",
        data_path.display(),
        loaded.records.len()
    );

    for skipped in &loaded.skipped {
        println!("  [record {}] SKIPPED: {}", skipped.index, skipped.reason);
    }

    let warnings = parser::validate_submissions(&loaded.records);
    for w in &warnings {
        let prefix = w
            .submission_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    let total = warnings.len() + loaded.skipped.len();
    if total == 0 {
        println!("All submissions valid.");
    } else {
        println!("\n{total} warning(s) found.");
        if strict {
            anyhow::bail!("validation failed with {total} warning(s)");
        }
    }

    Ok(())
}

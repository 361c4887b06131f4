//! The `examtrack delete` command.

use std::path::PathBuf;

use anyhow::Result;

use examtrack_core::parser;
use examtrack_core::store::MemoryStore;
use examtrack_core::traits::SubmissionStore;

use crate::config::load_config_from;

pub fn execute(data: Option<PathBuf>, id: String, config: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let data_path = data.unwrap_or(config.data_file);

    let loaded = parser::load_submissions(&data_path)?;
    // rewriting the file would drop records we could not read
    if !loaded.skipped.is_empty() {
        anyhow::bail!(
            "{} contains {} unreadable record(s); run `examtrack validate` and fix them first",
            data_path.display(),
            loaded.skipped.len()
        );
    }

    let mut store = MemoryStore::from(loaded.records);
    if !store.delete(&id)? {
        anyhow::bail!("no submission with id '{id}' in {}", data_path.display());
    }

    parser::save_submissions(&data_path, store.submissions())?;
    tracing::info!(%id, remaining = store.len(), "submission deleted");
    println!("Deleted {id} ({} submission(s) remain)", store.len());

    Ok(())
}

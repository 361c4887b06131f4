//! CLI configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use examtrack_core::engine::EngineConfig;
use examtrack_core::model::ExamType;

/// Environment variable that overrides the configured data file.
pub const DATA_ENV_VAR: &str = "EXAMTRACK_DATA";

/// Top-level examtrack configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamtrackConfig {
    /// JSON file holding exam submissions.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// JSON file holding the practice log.
    #[serde(default = "default_practice_log")]
    pub practice_log: PathBuf,
    /// Exam type used when `--exam-type` is not given.
    #[serde(default)]
    pub default_exam_type: Option<ExamType>,
    /// Presentation settings passed to the analytics engine.
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("examtrack-data.json")
}
fn default_practice_log() -> PathBuf {
    PathBuf::from("examtrack-practice.json")
}

impl Default for ExamtrackConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            practice_log: default_practice_log(),
            default_exam_type: None,
            engine: EngineConfig::default(),
        }
    }
}

impl ExamtrackConfig {
    fn resolve_paths(mut self) -> Self {
        self.data_file = resolve_path(&self.data_file);
        self.practice_log = resolve_path(&self.practice_log);
        self
    }

    fn with_data_override(mut self, data_file: Option<String>) -> Self {
        if let Some(path) = data_file.filter(|p| !p.trim().is_empty()) {
            self.data_file = PathBuf::from(path);
        }
        self
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut pos = 0;
    while let Some(rel) = result[pos..].find("${") {
        let start = pos + rel;
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
            // substituted text is not expanded again
            pos = start + value.len();
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. the explicit path, which must exist
/// 2. `examtrack.toml` in the current directory
/// 3. `~/.config/examtrack/config.toml`
///
/// `EXAMTRACK_DATA` overrides the data file from any of them.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamtrackConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("examtrack.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => ExamtrackConfig::default(),
    };

    Ok(config.with_data_override(std::env::var(DATA_ENV_VAR).ok()))
}

/// Parse a TOML config string and resolve `${VAR}` references in paths.
pub fn parse_config(content: &str) -> Result<ExamtrackConfig> {
    let config: ExamtrackConfig = toml::from_str(content)?;
    Ok(config.resolve_paths())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examtrack"))
}

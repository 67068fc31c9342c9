//! Configuration for the engine.
//!
//! Classification tables are looked up in this order:
//! `CAREERPATH_CLASSIFICATION` (path to a TOML file) > `~/.careerpath/classification.toml`
//! > built-in defaults.
//!
//! See [`crate::classify`] for the table format.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::classify::ClassificationTables;
use crate::recommend::DEFAULT_LIMIT;

/// Env var naming a classification tables file.
pub const CLASSIFICATION_ENV: &str = "CAREERPATH_CLASSIFICATION";

/// Env var overriding how many skills each recommendation list returns.
pub const RECOMMENDATION_LIMIT_ENV: &str = "CAREERPATH_RECOMMENDATION_LIMIT";

/// Returns the classification tables path, if one can be determined.
pub fn classification_path() -> Option<PathBuf> {
    if let Ok(custom) = std::env::var(CLASSIFICATION_ENV) {
        return Some(PathBuf::from(custom));
    }
    dirs::home_dir().map(|h| h.join(".careerpath").join("classification.toml"))
}

/// Loads classification tables from a specific file.
pub fn load_classification_from(path: &Path) -> Result<ClassificationTables> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read classification tables {}", path.display()))?;
    let tables = ClassificationTables::from_toml_str(&content)
        .with_context(|| format!("failed to parse classification tables {}", path.display()))?;
    debug!(
        path = %path.display(),
        categories = tables.categories.len(),
        importance = tables.importance.len(),
        prerequisites = tables.prerequisites.len(),
        "loaded classification tables"
    );
    Ok(tables)
}

/// Loads the configured classification tables.
///
/// Returns the built-in defaults when no file exists.
/// Returns `Err` if the file exists but cannot be read or parsed.
pub fn load_classification_tables() -> Result<ClassificationTables> {
    match classification_path() {
        Some(path) if path.exists() => load_classification_from(&path),
        _ => Ok(ClassificationTables::default()),
    }
}

/// Like [`load_classification_tables`], but falls back to the defaults on error.
pub fn classification_tables_or_default() -> ClassificationTables {
    load_classification_tables().unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), "using built-in classification tables");
        ClassificationTables::default()
    })
}

/// Engine tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Maximum number of entries in each recommendation list.
    pub recommendation_limit: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            recommendation_limit: DEFAULT_LIMIT,
        }
    }
}

impl EngineOptions {
    /// Defaults, overridden by `CAREERPATH_RECOMMENDATION_LIMIT` when it parses.
    pub fn from_env() -> Self {
        let recommendation_limit = std::env::var(RECOMMENDATION_LIMIT_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_LIMIT);
        Self {
            recommendation_limit,
        }
    }
}

//! Naming and persistence of the files written between stages

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const RESEARCH_PLAN_SUFFIX: &str = "_research_plan";
pub const VALIDATION_PLAN_SUFFIX: &str = "_validation_plan";

/// Locations of every artifact produced for one deck
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub base: String,
}

impl ArtifactPaths {
    pub fn new(dir: impl Into<PathBuf>, base: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base: base.into(),
        }
    }

    /// Artifacts for a deck go to `output_dir`, named after the deck's stem
    pub fn from_deck(deck_path: &Path, output_dir: &Path) -> Self {
        let base = deck_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "deck".to_string());
        Self::new(output_dir, base)
    }

    /// Artifacts derived from a saved plan live next to it; `suffix` is
    /// removed from the plan's stem to recover the deck's base name.
    pub fn from_plan_file(plan_path: &Path, suffix: &str) -> Self {
        let stem = plan_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = plan_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir, stem.replace(suffix, ""))
    }

    fn file(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}{}", self.base, suffix))
    }

    pub fn extracted_text(&self) -> PathBuf {
        self.file("_extracted_text.txt")
    }

    pub fn deck_analysis(&self) -> PathBuf {
        self.file("_deck_analysis.json")
    }

    pub fn research_plan(&self) -> PathBuf {
        self.file("_research_plan.json")
    }

    pub fn research_results(&self) -> PathBuf {
        self.file("_research_results.json")
    }

    pub fn validation_plan(&self) -> PathBuf {
        self.file("_validation_plan.json")
    }

    pub fn validation_report(&self) -> PathBuf {
        self.file("_validation_report.json")
    }

    pub fn final_report(&self) -> PathBuf {
        self.file("_FINAL_REPORT.md")
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

/// Writes `value` as pretty-printed JSON, creating the directory if needed
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), "Wrote JSON artifact");
    Ok(())
}

pub fn write_text(path: &Path, text: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), "Wrote text artifact");
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

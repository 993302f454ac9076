// src/batch.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_true_positive() -> bool {
    true
}

/// Raw ground-truth descriptions asserted for one commit
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommitBatch {
    #[serde(default)]
    pub id: Option<u64>,
    pub clone_url: String,
    pub commit: String,
    #[serde(default = "default_true_positive")]
    pub true_positive: bool,
    pub refactorings: Vec<String>,
}

/// `https://github.com/acme/widgets/commit/<sha>` for a `.git` clone URL
pub fn web_commit_url(clone_url: &str, commit: &str) -> String {
    let base = clone_url.strip_suffix(".git").unwrap_or(clone_url);
    format!("{base}/commit/{commit}")
}

pub fn parse_batches(json: &str) -> Result<Vec<CommitBatch>> {
    serde_json::from_str(json).context("Batch file is not a JSON array of commit batches")
}

pub fn load_batches(path: &Path) -> Result<Vec<CommitBatch>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch file {}", path.display()))?;
    parse_batches(&json).with_context(|| format!("Invalid batch file {}", path.display()))
}

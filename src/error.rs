// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while curating a commit's refactoring assertions
#[derive(Debug, Error)]
pub enum CurateError {
    /// No known refactoring display name prefixes the description
    #[error("Unknown refactoring type: {0}")]
    UnknownRefactoringKind(String),

    /// The description names a kind but does not follow that kind's grammar
    #[error("Pattern not matched for {kind}: {text}")]
    PatternMismatch { kind: &'static str, text: String },

    #[error("Failed to open repository at {}: {source}", .path.display())]
    RepositoryOpen {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Commit {commit} not found: {reason}")]
    CommitNotFound { commit: String, reason: String },

    #[error("Failed to read tree of commit {commit}: {source}")]
    TreeReadError {
        commit: String,
        #[source]
        source: git2::Error,
    },
}

impl CurateError {
    /// Whether this error should stop the whole run rather than just the batch.
    ///
    /// Unknown or malformed descriptions point at a gap in the kind table, so
    /// they abort everything. Repository failures only affect one commit.
    pub fn is_run_fatal(&self) -> bool {
        matches!(
            self,
            CurateError::UnknownRefactoringKind(_) | CurateError::PatternMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CurateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality() {
        assert!(CurateError::UnknownRefactoringKind("Frobnicate x".into()).is_run_fatal());
        let not_found = CurateError::CommitNotFound {
            commit: "abc".into(),
            reason: "missing object".into(),
        };
        assert!(!not_found.is_run_fatal());
        assert_eq!(not_found.to_string(), "Commit abc not found: missing object");
    }
}

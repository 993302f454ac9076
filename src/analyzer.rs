// src/analyzer.rs

use crate::aggregate::aggregate_records;
use crate::batch::CommitBatch;
use crate::classifier::parse_assertion;
use crate::config::Config;
use crate::error::Result;
use crate::model::{CommitResult, NormalizedAssertion};
use crate::normalize::normalize;
use crate::reclassify::reclassify_move_classes;
use crate::sink::Sink;
use crate::snapshot::GitRepository;
use indicatif::ProgressBar;
use std::path::PathBuf;
use tracing::{info, warn};

/// Where the local clone for a batch lives
#[derive(Debug, Clone)]
pub enum RepoLocator {
    /// Every batch comes from the same clone
    Single(PathBuf),
    /// `<dir>/<name>` where `name` is the clone URL's last segment
    PerCloneUrl(PathBuf),
}

impl RepoLocator {
    pub fn path_for(&self, clone_url: &str) -> PathBuf {
        match self {
            RepoLocator::Single(path) => path.clone(),
            RepoLocator::PerCloneUrl(dir) => GitRepository::clone_dir(dir, clone_url),
        }
    }
}

/// A batch that could not be processed
#[derive(Debug, Clone)]
pub struct FailedBatch {
    pub commit: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub processed: usize,
    pub descriptions: usize,
    pub failed: Vec<FailedBatch>,
}

/// Classify, reclassify, normalize and aggregate one commit's assertions.
///
/// `open_repo` is only called when folder evidence is needed; the repository
/// is dropped again before this returns.
pub fn process_batch<F>(batch: &CommitBatch, config: &Config, open_repo: F) -> Result<CommitResult>
where
    F: FnOnce() -> Result<GitRepository>,
{
    let mut assertions = Vec::with_capacity(batch.refactorings.len());
    for raw in &batch.refactorings {
        match parse_assertion(raw) {
            Ok(assertion) => assertions.push(assertion),
            Err(e) if config.skip_unknown && e.is_run_fatal() => {
                warn!(commit = %batch.commit, "{e}, description skipped");
            }
            Err(e) => return Err(e),
        }
    }

    let reclassified = reclassify_move_classes(assertions, || {
        open_repo()?.folder_evidence(&batch.commit, &config.source_suffix)
    })?;

    let normalized: Vec<NormalizedAssertion> = reclassified
        .assertions
        .iter()
        .map(|a| NormalizedAssertion {
            kind: a.kind,
            text: normalize(&a.raw_text),
        })
        .collect();

    Ok(CommitResult {
        id: batch.id,
        clone_url: batch.clone_url.clone(),
        commit: batch.commit.clone(),
        committed_at: reclassified.committed_at,
        true_positive: batch.true_positive,
        records: aggregate_records(&normalized, config.aggregation),
        decisions: reclassified.decisions,
    })
}

/// Process every batch in order, writing results to `sink`.
///
/// Repository failures skip the batch; unknown descriptions abort the run
/// unless `config.skip_unknown` is set.
pub fn run(
    batches: &[CommitBatch],
    config: &Config,
    repos: &RepoLocator,
    sink: &mut dyn Sink,
    show_progress: bool,
) -> anyhow::Result<RunSummary> {
    let bar = if show_progress {
        ProgressBar::new(batches.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    bar.set_message("Processing commits");

    let mut summary = RunSummary::default();
    for batch in batches {
        let repo_path = repos.path_for(&batch.clone_url);
        match process_batch(batch, config, || GitRepository::open(&repo_path)) {
            Ok(result) => {
                info!(
                    commit = %batch.commit,
                    descriptions = result.description_count(),
                    decisions = result.decisions.len(),
                    "processed batch"
                );
                summary.processed += 1;
                summary.descriptions += result.description_count();
                sink.write_result(&result)?;
            }
            Err(e) if e.is_run_fatal() => {
                bar.abandon();
                return Err(anyhow::Error::new(e)
                    .context(format!("Aborting run at commit {}", batch.commit)));
            }
            Err(e) => {
                warn!(commit = %batch.commit, "batch skipped: {e}");
                summary.failed.push(FailedBatch {
                    commit: batch.commit.clone(),
                    reason: e.to_string(),
                });
            }
        }
        bar.inc(1);
    }
    bar.finish_with_message("Processing complete");
    sink.finish()?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CurateError;

    fn batch(refactorings: &[&str]) -> CommitBatch {
        CommitBatch {
            id: Some(1),
            clone_url: "https://github.com/acme/widgets.git".into(),
            commit: "0000000000000000000000000000000000000000".into(),
            true_positive: true,
            refactorings: refactorings.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn no_repo() -> Result<GitRepository> {
        panic!("repository must not be opened")
    }

    #[test]
    fn test_generics_stripped_without_repository() {
        let result = process_batch(
            &batch(&["Extract Method foo() extracted from bar() in class X<T>"]),
            &Config::default(),
            no_repo,
        )
        .unwrap();
        let descriptions: Vec<_> = result.rows().map(|r| r.description).collect();
        assert_eq!(descriptions, vec!["Extract Method foo() extracted from bar() in class X"]);
    }

    #[test]
    fn test_unknown_kind_aborts_or_skips() {
        let input = batch(&["Teleport Class a.B", "Rename Class a.B renamed to a.C"]);
        let err = process_batch(&input, &Config::default(), no_repo).unwrap_err();
        assert!(matches!(err, CurateError::UnknownRefactoringKind(_)));

        let config = Config {
            skip_unknown: true,
            ..Config::default()
        };
        let result = process_batch(&input, &config, no_repo).unwrap();
        assert_eq!(result.description_count(), 1);
    }

    #[test]
    fn test_repo_locator() {
        let per_url = RepoLocator::PerCloneUrl(PathBuf::from("/clones"));
        assert_eq!(
            per_url.path_for("https://github.com/acme/widgets.git"),
            PathBuf::from("/clones/widgets")
        );
        let single = RepoLocator::Single(PathBuf::from("/work/widgets"));
        assert_eq!(single.path_for("anything"), PathBuf::from("/work/widgets"));
    }
}

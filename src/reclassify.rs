// src/reclassify.rs

use crate::error::Result;
use crate::model::{RefactoringAssertion, RefactoringKind, ReclassificationDecision};
use crate::names::{is_package_name, parent};
use crate::snapshot::{CommitFolderIndex, FolderEvidence};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Outcome of reclassifying one commit's assertions
#[derive(Debug, Clone, Default)]
pub struct Reclassification {
    pub assertions: Vec<RefactoringAssertion>,
    pub decisions: Vec<ReclassificationDecision>,
    /// Set only when folder evidence was gathered
    pub committed_at: Option<DateTime<Utc>>,
}

/// `(from_package, to_package)` for a Move Class between two distinct packages
fn candidate_packages(assertion: &RefactoringAssertion) -> Option<(&str, &str)> {
    let class_move = assertion.class_move.as_ref()?;
    let from = parent(&class_move.source);
    let to = parent(&class_move.target);
    (is_package_name(from) && is_package_name(to) && from != to).then_some((from, to))
}

pub fn rename_package_assertion(from: &str, to: &str) -> RefactoringAssertion {
    RefactoringAssertion {
        kind: RefactoringKind::RenamePackage,
        raw_text: format!("Rename Package {from} to {to}"),
        class_move: None,
    }
}

/// Collapse Move Class assertions that are really a package rename.
///
/// `evidence` is only invoked when at least one candidate exists, so batches
/// without package-to-package moves never touch the repository.
pub fn reclassify_move_classes<F>(
    assertions: Vec<RefactoringAssertion>,
    evidence: F,
) -> Result<Reclassification>
where
    F: FnOnce() -> Result<FolderEvidence>,
{
    for class_move in assertions.iter().filter_map(|a| a.class_move.as_ref()) {
        if class_move.source == class_move.target {
            warn!(class = %class_move.source, "Move Class onto itself, kept as is");
        }
    }

    if !assertions.iter().any(|a| candidate_packages(a).is_some()) {
        return Ok(Reclassification {
            assertions,
            ..Default::default()
        });
    }

    let evidence = evidence()?;
    let (assertions, decisions) = apply_evidence(assertions, &evidence.before, &evidence.after);
    Ok(Reclassification {
        assertions,
        decisions,
        committed_at: evidence.committed_at,
    })
}

/// Decide every candidate against the folder indexes.
///
/// A candidate becomes a package rename when its destination package did not
/// exist before the commit and its source package no longer exists after it.
/// Each `(from, to)` pair yields one Rename Package, placed where its first
/// candidate was; everything else keeps its position.
pub fn apply_evidence(
    assertions: Vec<RefactoringAssertion>,
    before: &CommitFolderIndex,
    after: &CommitFolderIndex,
) -> (Vec<RefactoringAssertion>, Vec<ReclassificationDecision>) {
    let mut out = Vec::with_capacity(assertions.len());
    let mut decisions: Vec<ReclassificationDecision> = Vec::new();
    let mut renamed: HashSet<(String, String)> = HashSet::new();

    for assertion in assertions {
        let Some((from, to)) = candidate_packages(&assertion)
            .map(|(from, to)| (from.to_string(), to.to_string()))
        else {
            out.push(assertion);
            continue;
        };

        let decision = ReclassificationDecision {
            exists_before: before.contains_package(&to),
            exists_after: after.contains_package(&from),
            from_package: from,
            to_package: to,
        };
        debug!(
            from = %decision.from_package,
            to = %decision.to_package,
            exists_before = decision.exists_before,
            exists_after = decision.exists_after,
            "move class evidence"
        );

        if decision.collapse_to_package_rename() {
            let pair = (decision.from_package.clone(), decision.to_package.clone());
            if !renamed.contains(&pair) {
                out.push(rename_package_assertion(&pair.0, &pair.1));
                renamed.insert(pair);
            }
        } else {
            out.push(assertion);
        }

        if !decisions.contains(&decision) {
            decisions.push(decision);
        }
    }

    (out, decisions)
}

// src/classifier.rs

use crate::error::{CurateError, Result};
use crate::model::{ClassMove, RefactoringAssertion, RefactoringKind};
use crate::normalize::normalize;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Kinds ordered so that longer display names are tried first.
static BY_PREFIX_LENGTH: Lazy<Vec<RefactoringKind>> = Lazy::new(|| {
    let mut kinds = RefactoringKind::ALL.to_vec();
    kinds.sort_by_key(|k| std::cmp::Reverse(k.display_name().len()));
    kinds
});

/// Whole-text grammars, indexed by `RefactoringKind as usize`
static GRAMMARS: Lazy<Vec<Regex>> = Lazy::new(|| {
    RefactoringKind::ALL
        .iter()
        .map(|kind| {
            Regex::new(&format!("^(?:{})$", kind.pattern()))
                .expect("refactoring description patterns are valid")
        })
        .collect()
});

fn grammar(kind: RefactoringKind) -> &'static Regex {
    &GRAMMARS[kind as usize]
}

/// Find the kind whose display name prefixes `raw_text`.
pub fn classify_kind(raw_text: &str) -> Result<RefactoringKind> {
    BY_PREFIX_LENGTH
        .iter()
        .copied()
        .find(|kind| raw_text.starts_with(kind.display_name()))
        .ok_or_else(|| CurateError::UnknownRefactoringKind(raw_text.to_string()))
}

fn captures<'t>(kind: RefactoringKind, text: &'t str) -> Result<Captures<'t>> {
    grammar(kind)
        .captures(text)
        .ok_or_else(|| CurateError::PatternMismatch {
            kind: kind.display_name(),
            text: text.to_string(),
        })
}

/// Pull `(source, target)` out of a Move Class description.
///
/// Names are read from the normalized text so generic arguments containing
/// dots cannot shift the parent/leaf split.
pub fn parse_class_move(raw_text: &str) -> Result<ClassMove> {
    let text = normalize(raw_text);
    let caps = captures(RefactoringKind::MoveClass, &text)?;
    Ok(ClassMove {
        source: caps[1].trim().to_string(),
        target: caps[2].trim().to_string(),
    })
}

/// Classify a raw description into an assertion.
pub fn parse_assertion(raw_text: &str) -> Result<RefactoringAssertion> {
    let kind = classify_kind(raw_text)?;
    let class_move = match kind {
        RefactoringKind::MoveClass => Some(parse_class_move(raw_text)?),
        _ => None,
    };
    Ok(RefactoringAssertion {
        kind,
        raw_text: raw_text.to_string(),
        class_move,
    })
}

/// Replace the kind's aggregate groups with `*`.
///
/// Component lines of one logical refactoring (e.g. the same method extracted
/// from several origins) become identical after masking.
pub fn mask_aggregate_groups(kind: RefactoringKind, text: &str) -> Result<String> {
    let groups = kind.aggregate_groups();
    let caps = captures(kind, text)?;
    if groups.is_empty() {
        return Ok(text.to_string());
    }

    let mut out = String::with_capacity(text.len());
    let mut current = 0;
    for g in 1..caps.len() {
        let Some(m) = caps.get(g) else { continue };
        out.push_str(&text[current..m.start()]);
        if groups.contains(&g) {
            out.push('*');
        } else {
            out.push_str(m.as_str());
        }
        current = m.end();
    }
    out.push_str(&text[current..]);
    Ok(out)
}

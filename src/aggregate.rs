// src/aggregate.rs

use crate::classifier::{mask_aggregate_groups, parse_class_move};
use crate::config::AggregationMode;
use crate::model::{AggregatedRecord, NormalizedAssertion, RefactoringKind};
use std::collections::HashSet;

#[derive(Debug, PartialEq, Eq, Hash)]
enum GroupKey {
    ClassMove(String, String),
    Text(String),
}

fn group_key(kind: RefactoringKind, text: &str) -> GroupKey {
    match kind {
        RefactoringKind::MoveClass => match parse_class_move(text) {
            Ok(m) => GroupKey::ClassMove(m.source, m.target),
            Err(_) => GroupKey::Text(text.to_string()),
        },
        _ => GroupKey::Text(text.to_string()),
    }
}

/// Merge the normalized descriptions of one kind, keeping first-seen order.
///
/// Entries sharing a key collapse into the first of them. Nothing is split
/// and unrelated entries are never merged.
pub fn aggregate<'a, I>(kind: RefactoringKind, normalized_texts: I, mode: AggregationMode) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for text in normalized_texts {
        let text = match mode {
            AggregationMode::Dedup => text.to_string(),
            AggregationMode::Wildcard => mask_aggregate_groups(kind, text).unwrap_or_else(|e| {
                tracing::warn!("{e}, kept verbatim");
                text.to_string()
            }),
        };
        if seen.insert(group_key(kind, &text)) {
            out.push(text);
        }
    }

    out
}

/// Group a commit's assertions by kind (in first-seen order) and aggregate
/// each group.
pub fn aggregate_records(assertions: &[NormalizedAssertion], mode: AggregationMode) -> Vec<AggregatedRecord> {
    let mut kinds: Vec<RefactoringKind> = Vec::new();
    for assertion in assertions {
        if !kinds.contains(&assertion.kind) {
            kinds.push(assertion.kind);
        }
    }

    kinds
        .into_iter()
        .map(|kind| {
            let texts = assertions
                .iter()
                .filter(|a| a.kind == kind)
                .map(|a| a.text.as_str());
            AggregatedRecord {
                kind,
                descriptions: aggregate(kind, texts, mode),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let texts = [
            "Move Class a.b.Foo moved to a.c.Foo",
            "Move Class a.b.Bar moved to a.c.Bar",
            "Move Class a.b.Foo moved to a.c.Foo",
        ];
        assert_eq!(
            aggregate(RefactoringKind::MoveClass, texts, AggregationMode::Dedup),
            vec![
                "Move Class a.b.Foo moved to a.c.Foo".to_string(),
                "Move Class a.b.Bar moved to a.c.Bar".to_string(),
            ]
        );
    }

    #[test]
    fn test_move_class_key_ignores_spacing() {
        let texts = [
            "Move Class a.b.Foo moved to a.c.Foo",
            "Move Class a.b.Foo  moved to a.c.Foo ",
        ];
        assert_eq!(aggregate(RefactoringKind::MoveClass, texts, AggregationMode::Dedup).len(), 1);
    }

    #[test]
    fn test_wildcard_merges_components() {
        let texts = [
            "Extract Method log() extracted from start() in class a.Server",
            "Extract Method log() extracted from stop() in class a.Server",
            "Extract Method log() extracted from stop() in class a.Client",
        ];
        assert_eq!(
            aggregate(RefactoringKind::ExtractMethod, texts, AggregationMode::Wildcard),
            vec![
                "Extract Method log() extracted from * in class a.Server".to_string(),
                "Extract Method log() extracted from * in class a.Client".to_string(),
            ]
        );
        assert_eq!(aggregate(RefactoringKind::ExtractMethod, texts, AggregationMode::Dedup).len(), 3);
    }

    #[test]
    fn test_wildcard_keeps_unmatched_text() {
        let texts = ["Extract Method without grammar"];
        assert_eq!(
            aggregate(RefactoringKind::ExtractMethod, texts, AggregationMode::Wildcard),
            vec!["Extract Method without grammar".to_string()]
        );
    }

    #[test]
    fn test_records_grouped_by_kind() {
        let assertions = vec![
            NormalizedAssertion {
                kind: RefactoringKind::RenamePackage,
                text: "Rename Package a.b to a.c".into(),
            },
            NormalizedAssertion {
                kind: RefactoringKind::ExtractMethod,
                text: "Extract Method f() extracted from g() in class X".into(),
            },
            NormalizedAssertion {
                kind: RefactoringKind::RenamePackage,
                text: "Rename Package a.b to a.c".into(),
            },
        ];
        let records = aggregate_records(&assertions, AggregationMode::Dedup);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, RefactoringKind::RenamePackage);
        assert_eq!(records[0].descriptions, vec!["Rename Package a.b to a.c".to_string()]);
        assert_eq!(records[1].kind, RefactoringKind::ExtractMethod);
    }
}

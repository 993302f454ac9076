// src/sink.rs

use crate::batch::web_commit_url;
use crate::model::{CommitResult, OutputRow};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{self, Write};

/// Output format of the command line tool
#[derive(clap::ValueEnum, Clone, Debug, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Commit header followed by indented descriptions
    #[default]
    Text,
    /// SQL insert statements, one per commit
    Sql,
    /// One JSON object per description
    Json,
}

/// Receives the final rows of each processed commit
pub trait Sink {
    fn write_result(&mut self, result: &CommitResult) -> io::Result<()>;

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn sink_for<'w, W: Write + 'w>(format: Format, out: W, explain: bool) -> Box<dyn Sink + 'w> {
    match format {
        Format::Text => Box::new(TextSink { out, explain }),
        Format::Sql => Box::new(SqlSink { out }),
        Format::Json => Box::new(JsonSink { out }),
    }
}

pub struct TextSink<W> {
    pub out: W,
    /// Also list the folder evidence behind every Move Class decision
    pub explain: bool,
}

impl<W: Write> Sink for TextSink<W> {
    fn write_result(&mut self, result: &CommitResult) -> io::Result<()> {
        writeln!(
            self.out,
            "Commit {} {}",
            result.id.unwrap_or(0),
            web_commit_url(&result.clone_url, &result.commit)
        )?;
        for row in result.rows() {
            writeln!(self.out, "  {}", row.description)?;
        }
        if self.explain {
            for decision in &result.decisions {
                writeln!(self.out, "  # {}", decision.evidence_notation())?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

pub struct SqlSink<W> {
    pub out: W,
}

fn sql_quote(value: &str) -> String {
    value.replace('\'', "''")
}

impl<W: Write> Sink for SqlSink<W> {
    fn write_result(&mut self, result: &CommitResult) -> io::Result<()> {
        let count = result.description_count();
        if count == 0 {
            return Ok(());
        }

        writeln!(
            self.out,
            "insert into nrefactoring(cloneUrl, commit, refactoringType, description, truePositive) values "
        )?;
        for (i, row) in result.rows().enumerate() {
            writeln!(
                self.out,
                "  ('{}', '{}', '{}', '{}', '{}'){}",
                sql_quote(row.clone_url),
                sql_quote(row.commit),
                row.refactoring_type,
                sql_quote(row.description),
                u8::from(row.true_positive),
                if i + 1 == count { ";" } else { "," }
            )?;
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

pub struct JsonSink<W> {
    pub out: W,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    #[serde(flatten)]
    row: OutputRow<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    committed_at: Option<DateTime<Utc>>,
}

impl<W: Write> Sink for JsonSink<W> {
    fn write_result(&mut self, result: &CommitResult) -> io::Result<()> {
        for row in result.rows() {
            let line = JsonRow {
                row,
                committed_at: result.committed_at,
            };
            serde_json::to_writer(&mut self.out, &line)?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AggregatedRecord, ReclassificationDecision, RefactoringKind};
    use pretty_assertions::assert_eq;

    fn result() -> CommitResult {
        CommitResult {
            id: Some(42),
            clone_url: "https://github.com/acme/widgets.git".into(),
            commit: "abc123".into(),
            committed_at: None,
            true_positive: true,
            records: vec![
                AggregatedRecord {
                    kind: RefactoringKind::RenamePackage,
                    descriptions: vec!["Rename Package a.b to a.c".into()],
                },
                AggregatedRecord {
                    kind: RefactoringKind::RenameClass,
                    descriptions: vec!["Rename Class a.c.It's renamed to a.c.Its".into()],
                },
            ],
            decisions: vec![ReclassificationDecision {
                from_package: "a.b".into(),
                to_package: "a.c".into(),
                exists_before: false,
                exists_after: false,
            }],
        }
    }

    fn render(format: Format, explain: bool, result: &CommitResult) -> String {
        let mut buf = Vec::new();
        {
            let mut sink = sink_for(format, &mut buf, explain);
            sink.write_result(result).unwrap();
            sink.finish().unwrap();
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_text_sink() {
        assert_eq!(
            render(Format::Text, true, &result()),
            "Commit 42 https://github.com/acme/widgets/commit/abc123\n\
             \x20 Rename Package a.b to a.c\n\
             \x20 Rename Class a.c.It's renamed to a.c.Its\n\
             \x20 # Move Class from pkg- a.b to pkg+ a.c\n"
        );
    }

    #[test]
    fn test_sql_sink() {
        assert_eq!(
            render(Format::Sql, false, &result()),
            "insert into nrefactoring(cloneUrl, commit, refactoringType, description, truePositive) values \n\
             \x20 ('https://github.com/acme/widgets.git', 'abc123', 'Rename Package', 'Rename Package a.b to a.c', '1'),\n\
             \x20 ('https://github.com/acme/widgets.git', 'abc123', 'Rename Class', 'Rename Class a.c.It''s renamed to a.c.Its', '1');\n"
        );

        let mut empty = result();
        empty.records.clear();
        assert_eq!(render(Format::Sql, false, &empty), "");
    }

    #[test]
    fn test_json_sink() {
        let out = render(Format::Json, false, &result());
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["refactoring_type"], "Rename Package");
        assert_eq!(lines[0]["true_positive"], true);
        assert!(lines[0].get("committed_at").is_none());
    }
}

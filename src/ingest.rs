//! Parallel ingestion of fragment files into a [`CorpusBuilder`]
//!
//! Input files hold JSON fragments, either as one array or as a stream of
//! objects (one per line or pretty-printed back to back). Worker threads
//! pull paths from a shared queue, parse them, and insert straight into the
//! builder; the calling thread collects their results.
//!
//! An unreadable or malformed file is skipped. Fragments that contradict the
//! corpus (a kind clash, an invalid id) are recorded as violations instead,
//! and callers must not build from a report that has any.

use crate::corpus::CorpusBuilder;
use crate::symbol::Symbol;
use crate::ui::{ProgressMessage, ProgressPhase};
use crate::{Error, Result};
use crossbeam::channel::{self, Sender};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::thread;

/// Message sent from ingest workers to the coordinator
#[derive(Debug)]
pub enum IngestMessage {
    Processed { path: String, fragments: usize },
    Error(String, String),
    Violation(String, String),
}

/// Outcome of one ingest run
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub files: usize,
    pub fragments: usize,
    pub failed: Vec<FailedInput>,
    pub violations: Vec<FailedInput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedInput {
    pub path: String,
    pub error: String,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.violations.is_empty()
    }

    /// Whether the builder holds a corpus that can be frozen
    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Expand glob patterns into a sorted, duplicate-free list of files
pub fn discover_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let entries = glob::glob(pattern)
            .map_err(|e| Error::Parse(format!("bad input pattern {:?}: {}", pattern, e)))?;
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping unreadable input: {}", e),
            }
        }
    }
    paths.sort();
    paths.dedup();
    tracing::debug!("Discovered {} input files", paths.len());
    Ok(paths)
}

/// Parse the fragments held by one input file
pub fn parse_fragments(text: &str) -> Result<Vec<Symbol>> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    let mut fragments = Vec::new();
    for fragment in serde_json::Deserializer::from_str(text).into_iter::<Symbol>() {
        fragments.push(fragment?);
    }
    Ok(fragments)
}

fn ingest_file(path: &Path, builder: &CorpusBuilder) -> IngestMessage {
    let display = path.display().to_string();
    let result = std::fs::read_to_string(path)
        .map_err(Error::from)
        .and_then(|text| parse_fragments(&text))
        .and_then(|fragments| builder.insert_all(fragments));

    match result {
        Ok(fragments) => IngestMessage::Processed {
            path: display,
            fragments,
        },
        Err(e) if e.is_invariant_violation() => IngestMessage::Violation(display, e.to_string()),
        Err(e) => IngestMessage::Error(display, e.to_string()),
    }
}

/// Ingest every file on `threads` workers. An unreadable file is reported
/// and skipped. A file whose fragments clash with the corpus is reported as
/// a violation; fragments inserted before the clash stay in the builder.
pub fn ingest_files(
    paths: &[PathBuf],
    builder: &CorpusBuilder,
    threads: usize,
    progress: Option<&Sender<ProgressMessage>>,
) -> IngestReport {
    let threads = threads.clamp(1, paths.len().max(1));
    tracing::info!("Ingesting {} files on {} threads", paths.len(), threads);

    let notify = |msg: ProgressMessage| {
        if let Some(tx) = progress {
            let _ = tx.send(msg);
        }
    };
    notify(ProgressMessage::Started {
        phase: ProgressPhase::Parsing,
        total: paths.len(),
    });

    let (work_tx, work_rx) = channel::unbounded::<&Path>();
    for path in paths {
        if work_tx.send(path.as_path()).is_err() {
            break;
        }
    }
    drop(work_tx);

    let (msg_tx, msg_rx) = channel::unbounded::<IngestMessage>();
    let mut report = IngestReport::default();

    thread::scope(|s| {
        for _ in 0..threads {
            let work_rx = work_rx.clone();
            let msg_tx = msg_tx.clone();
            s.spawn(move || {
                for path in work_rx {
                    if msg_tx.send(ingest_file(path, builder)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(msg_tx);

        for msg in msg_rx {
            match msg {
                IngestMessage::Processed { path, fragments } => {
                    tracing::debug!("Ingested {} fragments from {}", fragments, path);
                    report.files += 1;
                    report.fragments += fragments;
                    notify(ProgressMessage::Progress {
                        phase: ProgressPhase::Parsing,
                        current: report.files,
                        file: Some(path),
                    });
                }
                IngestMessage::Error(path, error) => {
                    tracing::warn!("Failed to ingest {}: {}", path, error);
                    notify(ProgressMessage::Error(format!("{}: {}", path, error)));
                    report.failed.push(FailedInput { path, error });
                }
                IngestMessage::Violation(path, error) => {
                    tracing::error!("Inconsistent fragments in {}: {}", path, error);
                    notify(ProgressMessage::Error(format!("{}: {}", path, error)));
                    report.violations.push(FailedInput { path, error });
                }
            }
        }
    });

    notify(ProgressMessage::Finished {
        phase: ProgressPhase::Parsing,
    });
    tracing::info!(
        "Ingested {} fragments from {} files ({} failed, {} inconsistent)",
        report.fragments,
        report.files,
        report.failed.len(),
        report.violations.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolKind;
    use crate::symbol_id::SymbolId;
    use tempfile::TempDir;

    const HEADER: &str = r#"[
        {"id": "c:@S@Widget", "kind": "record", "name": "Widget", "parent": "ffffffffffffffffffffffffffffffffffffffff"},
        {"id": "c:@S@Widget@F@draw#", "kind": "function", "name": "draw", "parent": "c:@S@Widget", "access": "public"}
    ]"#;

    const SOURCE: &str = r#"{"id": "c:@S@Widget@F@draw#", "kind": "function", "source": {"def": {"path": "widget.cpp", "line": 12}}}
{"id": "c:@S@Widget", "kind": "record", "key": "class"}
"#;

    #[test]
    fn test_parse_array_and_stream() {
        assert_eq!(parse_fragments(HEADER).unwrap().len(), 2);
        assert_eq!(parse_fragments(SOURCE).unwrap().len(), 2);
        assert!(parse_fragments("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_fragments("{not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_discover_inputs_sorted() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.json"), "").unwrap();
        std::fs::write(dir.path().join("a.json"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let pattern = format!("{}/*.json", dir.path().display());
        let found = discover_inputs(&[pattern.clone(), pattern]).unwrap();
        let names: Vec<_> = found
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_bad_pattern_is_error() {
        assert!(discover_inputs(&["[".to_string()]).is_err());
    }

    #[test]
    fn test_ingest_merges_across_files() {
        let dir = TempDir::new().unwrap();
        let header = dir.path().join("widget.hpp.json");
        let source = dir.path().join("widget.cpp.json");
        let broken = dir.path().join("broken.json");
        std::fs::write(&header, HEADER).unwrap();
        std::fs::write(&source, SOURCE).unwrap();
        std::fs::write(&broken, "[{]").unwrap();

        let builder = CorpusBuilder::new();
        let (tx, rx) = channel::unbounded();
        let report = ingest_files(&[header, source, broken], &builder, 3, Some(&tx));
        drop(tx);

        assert_eq!(report.files, 2);
        assert_eq!(report.fragments, 4);
        assert_eq!(report.failed.len(), 1);
        assert!(!report.is_clean());
        assert!(report.is_consistent());
        assert!(rx.iter().any(|m| matches!(m, ProgressMessage::Finished { .. })));

        let corpus = builder.build().unwrap();
        let draw = corpus.get(SymbolId::from_key("c:@S@Widget@F@draw#"));
        assert_eq!(draw.name, "draw");
        assert_eq!(draw.source.def.as_ref().map(|l| l.line), Some(12));
        assert_eq!(corpus.get(SymbolId::from_key("c:@S@Widget")).kind(), SymbolKind::Record);
    }

    #[test]
    fn test_kind_clash_is_a_violation() {
        let dir = TempDir::new().unwrap();
        let clash = dir.path().join("clash.json");
        std::fs::write(
            &clash,
            r#"[
                {"id": "c:@F@k", "kind": "function", "name": "k", "parent": "ffffffffffffffffffffffffffffffffffffffff"},
                {"id": "c:@F@k", "kind": "record", "name": "k"},
                {"id": "c:@F@later", "kind": "function", "name": "later", "parent": "ffffffffffffffffffffffffffffffffffffffff"}
            ]"#,
        )
        .unwrap();

        let builder = CorpusBuilder::new();
        let report = ingest_files(&[clash], &builder, 1, None);

        assert_eq!(report.files, 0);
        assert!(report.failed.is_empty());
        assert_eq!(report.violations.len(), 1);
        assert!(report.violations[0].error.contains("expected a function"));
        assert!(!report.is_consistent());
        assert!(!report.is_clean());
    }
}

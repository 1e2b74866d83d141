//! Indexing progress reporting.
//!
//! The indexer emits one [`IndexProgressEvent::Scan`] after enumeration and
//! one [`IndexProgressEvent::Index`] per re-indexed file. Progress goes to
//! **stderr** so stdout stays parseable for scripts.

use std::io::Write;

use serde::Serialize;

/// A single progress event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "lowercase")]
pub enum IndexProgressEvent {
    /// Enumeration finished; `files_total` eligible files.
    Scan { files_total: u64 },
    /// `file` was re-indexed into `chunks` chunks.
    Index { file: String, chunks: u64 },
}

/// Receives indexer progress.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: IndexProgressEvent);
}

/// Human-friendly lines: "scan  1,234 files", "index  pkg/scan/scan.go  3 chunks".
pub struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn report(&self, event: IndexProgressEvent) {
        let line = match &event {
            IndexProgressEvent::Scan { files_total } => {
                format!("scan  {} files\n", format_number(*files_total))
            }
            IndexProgressEvent::Index { file, chunks } => {
                format!("index  {}  {} chunks\n", file, format_number(*chunks))
            }
        };
        let mut err = std::io::stderr().lock();
        let _ = err.write_all(line.as_bytes());
        let _ = err.flush();
    }
}

/// One JSON object per line on stderr, e.g.
/// `{"type":"progress","stage":"index","file":"a.go","chunks":2}`.
pub struct JsonProgress;

#[derive(Serialize)]
struct JsonLine<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    event: &'a IndexProgressEvent,
}

impl ProgressReporter for JsonProgress {
    fn report(&self, event: IndexProgressEvent) {
        let line = JsonLine {
            kind: "progress",
            event: &event,
        };
        if let Ok(json) = serde_json::to_string(&line) {
            let mut err = std::io::stderr().lock();
            let _ = writeln!(err, "{}", json);
            let _ = err.flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _event: IndexProgressEvent) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// `--quiet` wins, then `--json`; otherwise human progress when stderr
    /// is a TTY.
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            ProgressMode::Off
        } else if json {
            ProgressMode::Json
        } else if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn ProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}

//! Process exit codes and the error value that carries them.
//!
//! Commands return `anyhow::Result`; `main` downcasts to [`ExitError`]
//! to pick a non-default code. Any other error exits with
//! [`EXIT_RUNTIME`]. Success and usage errors (`0` and `2`) come from
//! `ExitCode::SUCCESS` and clap.

use std::fmt;

pub const EXIT_RUNTIME: u8 = 1;
pub const EXIT_INDEX_MISSING: u8 = 3;
pub const EXIT_NO_RESULTS: u8 = 5;

#[derive(Debug, Clone)]
pub struct ExitError {
    pub code: u8,
    pub message: Option<String>,
    /// Output was already written; print nothing more.
    pub silent: bool,
}

impl ExitError {
    pub fn new(code: u8, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            silent: false,
        }
    }

    pub fn silent(code: u8) -> Self {
        Self {
            code,
            message: None,
            silent: true,
        }
    }

    pub fn index_missing(db_path: &std::path::Path) -> Self {
        Self::new(
            EXIT_INDEX_MISSING,
            format!("no index at {} (run `scry index` first)", db_path.display()),
        )
    }

    pub fn no_results() -> Self {
        Self::silent(EXIT_NO_RESULTS)
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(m) => f.write_str(m),
            None => write!(f, "exit status {}", self.code),
        }
    }
}

impl std::error::Error for ExitError {}

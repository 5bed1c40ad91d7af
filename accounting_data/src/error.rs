use std::{io, path::PathBuf};

use thiserror::Error;

/// Everything that can end a run. None of these are recovered from locally.
#[derive(Debug, Error)]
pub enum AccountingError {
    #[error("Problems parsing interval `{input}`: {reason}")]
    InvalidInterval { input: String, reason: String },

    #[error("invalid user `{0}`: must not be empty")]
    InvalidUser(String),

    #[error("Problems reading bacct report from {}", path.display())]
    ReportSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error starting: `{command}`")]
    CommandSpawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Error running: `{command}`, exitcode: `{}`", code.map_or_else(|| "none".to_owned(), |c| c.to_string()))]
    CommandExecution { command: String, code: Option<i32> },

    #[error("Problems parsing bacct output: {0}")]
    Parse(#[from] ParseFailure),
}

/// Which summary figure could not be read from the report text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("Total number of jobs not found")]
    JobCountNotFound,
    #[error("CPU time not found")]
    CpuTimeNotFound,
    #[error("CPU time out of range")]
    CpuTimeOutOfRange,
}

pub type Result<T, E = AccountingError> = std::result::Result<T, E>;

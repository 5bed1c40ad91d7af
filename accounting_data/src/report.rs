use std::{fs, path::PathBuf};

use derive_builder::Builder;
use derive_more::derive::{Deref, From, Into};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{AccountingError, Result},
    interval::Interval,
    lsf::{BacctCommand, LsfUser},
};

/// One query against the accounting tool. `source` switches to reading a captured report instead.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct ReportRequest {
    pub user: LsfUser,
    pub interval: Interval,
    #[builder(default, setter(strip_option))]
    pub source: Option<PathBuf>,
}

impl ReportRequest {
    pub fn command(&self, bacct_program: &str) -> BacctCommand {
        BacctCommand::new(bacct_program, &self.interval, &self.user)
    }

    /// Consumes the request, either reading `source` or running `bacct_program`.
    #[instrument(skip(self), fields(user = %self.user, interval = %self.interval))]
    pub fn fetch(self, bacct_program: &str) -> Result<RawReport> {
        match &self.source {
            Some(path) => read_report_file(path.clone()),
            None => run_bacct(&self.command(bacct_program)),
        }
    }
}

/// Complete, unparsed output of `bacct -l`.
#[derive(Debug, Clone, PartialEq, Eq, Deref, From, Into)]
pub struct RawReport(String);

impl RawReport {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RawReport {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Decoded the same lossy way as live `bacct` output, so a replayed report parses like the original run.
fn read_report_file(path: PathBuf) -> Result<RawReport> {
    info!(path = %path.display(), "reading bacct report from file instead of running bacct");
    match fs::read(&path) {
        Ok(bytes) => {
            debug!(bytes = bytes.len(), "report read");
            Ok(RawReport(String::from_utf8_lossy(&bytes).into_owned()))
        }
        Err(source) => Err(AccountingError::ReportSource { path, source }),
    }
}

fn run_bacct(command: &BacctCommand) -> Result<RawReport> {
    let command_str = command.to_string();
    info!(command = %command_str, "running");

    let output = command
        .to_command()
        .output()
        .map_err(|source| AccountingError::CommandSpawn {
            command: command_str.clone(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            warn!(stderr = %stderr.trim(), "bacct failed");
        }
        return Err(AccountingError::CommandExecution {
            command: command_str,
            code: output.status.code(),
        });
    }

    let text = String::from_utf8_lossy(&output.stdout).into_owned();
    debug!(bytes = text.len(), "bacct finished");
    Ok(RawReport(text))
}

//! Job count, CPU time and memory of a user's LSF jobs, read from `bacct -l` output.
//!
//! ```text
//! Interval::parse --> ReportRequest::fetch --> UsageSummary::build --> Display / to_json
//! ```
pub mod error;
pub mod extract;
pub mod interval;
pub mod lsf;
pub mod report;
pub mod summary;

pub use error::{AccountingError, ParseFailure, Result};
pub use interval::Interval;
pub use lsf::{BacctCommand, LsfUser};
pub use report::{RawReport, ReportRequest, ReportRequestBuilder};
pub use summary::{CpuSeconds, MemoryTotal, UsageSummary};

pub const DEFAULT_BACCT_COMMAND: &str = "bacct";

/// Settings of one run, resolved once and handed in. Nothing here changes while the run is going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub bacct_command: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            bacct_command: DEFAULT_BACCT_COMMAND.to_owned(),
        }
    }
}

/// Fetch and summarize in one go.
pub fn track(request: ReportRequest, options: &RunOptions) -> Result<UsageSummary> {
    let interval = request.interval;
    if interval.is_inverted() {
        tracing::warn!(%interval, "interval starts after it ends, passing it to bacct as is");
    }
    let report = request.fetch(&options.bacct_command)?;
    UsageSummary::build(interval, &report)
}

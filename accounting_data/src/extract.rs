//! Pattern rules over `bacct -l` output.
//!
//! Each rule looks at the whole report on its own; nothing assumes where in the report (or in which
//! order) the summary lines show up.
//!
//! ```text
//! SUMMARY:      ( time unit: second )
//!  Total number of done jobs:     686      Total number of exited jobs:    82
//!  Total CPU time consumed:   4601894.5      Average CPU time consumed:  5958.4
//! ```
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::{
    error::{ParseFailure, Result},
    summary::{CpuSeconds, MemoryTotal},
};

static JOB_COUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Total number of done jobs:\s+(\d+).*?Total number of exited jobs:\s+(\d+)")
        .expect("job count pattern is valid")
});
static CPU_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Total CPU time consumed:\s+(\d+)(?:\.\d*)?").expect("cpu time pattern is valid")
});
static MEMORY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s(\d+)M$").expect("memory pattern is valid"));

/// Both counters of the `Total number of ... jobs` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobCounts {
    pub done: u64,
    pub exited: u64,
}

pub fn extract_job_counts(report: &str) -> Result<JobCounts, ParseFailure> {
    let counts = JOB_COUNT_RE
        .captures_iter(report)
        .find_map(|caps| {
            Some(JobCounts {
                done: caps[1].parse().ok()?,
                exited: caps[2].parse().ok()?,
            })
        })
        .ok_or(ParseFailure::JobCountNotFound)?;
    debug!(done = counts.done, exited = counts.exited, "job counts");
    Ok(counts)
}

/// Only the done jobs count. Exited jobs are left out of the total.
pub fn extract_job_count(report: &str) -> Result<u64, ParseFailure> {
    extract_job_counts(report).map(|counts| counts.done)
}

/// Integer part of `Total CPU time consumed:`, the fraction is cut off, not rounded.
///
/// A value too large for `u64` fails with [`ParseFailure::CpuTimeOutOfRange`].
pub fn extract_cpu_seconds(report: &str) -> Result<CpuSeconds, ParseFailure> {
    let caps = CPU_TIME_RE
        .captures(report)
        .ok_or(ParseFailure::CpuTimeNotFound)?;
    let secs = caps[1].parse::<u64>().map_err(|e| {
        warn!(value = &caps[1], "cpu time does not fit into u64: {e}");
        ParseFailure::CpuTimeOutOfRange
    })?;
    debug!(secs, "cpu time");
    Ok(CpuSeconds(secs))
}

/// Sum of every line ending in `<whitespace><digits>M`. No such line means 0, not an error.
pub fn extract_memory_total(report: &str) -> MemoryTotal {
    let mut total = MemoryTotal::default();
    for (i, line) in report.lines().enumerate() {
        let Some(caps) = MEMORY_RE.captures(line.trim_end()) else {
            continue;
        };
        match caps[1].parse::<u64>() {
            Ok(megs) => total += MemoryTotal(megs),
            Err(e) => warn!(line = i + 1, "skipping memory value `{}M`: {e}", &caps[1]),
        }
    }
    debug!(megs = *total, "memory total");
    total
}

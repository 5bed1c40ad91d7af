use std::{fmt, ops::AddAssign};

use derive_more::derive::{Deref, Display, From, Into};
use serde::Serialize;
use tracing::debug;

use crate::{
    error::Result,
    extract::{extract_cpu_seconds, extract_job_counts, extract_memory_total},
    interval::Interval,
    report::RawReport,
};

/// Megabyte units per displayed "G". Decimal on purpose, see `MemoryTotal::as_coarse_gigabytes`.
pub const MEGS_PER_GIG: u64 = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deref, From, Into, Display)]
pub struct CpuSeconds(pub u64);

impl CpuSeconds {
    pub fn minutes(&self) -> u64 {
        self.0 / 60
    }

    /// Straight from seconds, not from the rounded-down minutes.
    pub fn hours(&self) -> u64 {
        self.0 / 3600
    }
}

/// Accumulated `<n>M` values of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deref, From, Into, Display)]
pub struct MemoryTotal(pub u64);

impl MemoryTotal {
    /// `megs / 1000`, rounded down. A display simplification, not a unit conversion (1463M -> 1G).
    pub fn as_coarse_gigabytes(&self) -> u64 {
        self.0 / MEGS_PER_GIG
    }
}

impl AddAssign for MemoryTotal {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageSummary {
    pub interval: Interval,
    pub job_count: u64,
    pub cpu_seconds: CpuSeconds,
    pub memory: MemoryTotal,
}

impl UsageSummary {
    /// Runs every extraction rule over `report`. The first rule that fails ends it.
    pub fn build(interval: Interval, report: &RawReport) -> Result<Self> {
        let counts = extract_job_counts(report)?;
        let cpu_seconds = extract_cpu_seconds(report)?;
        let memory = extract_memory_total(report);
        debug!(exited = counts.exited, "exited jobs are not part of the job count");

        Ok(Self {
            interval,
            job_count: counts.done,
            cpu_seconds,
            memory,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&JsonSummary::from(self))
    }
}

/// ```text
/// Query interval: 2008/12/01 - 2008/12/31
/// Total jobs:     686
/// CPU consumed:   4601894 secs, 76698 mins, 1278 hours
/// RAM consumed:   1G
/// ```
impl fmt::Display for UsageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Query interval: {} - {}",
            self.interval.start_for_lsf(),
            self.interval.end_for_lsf()
        )?;
        writeln!(f, "Total jobs:     {}", self.job_count)?;
        writeln!(
            f,
            "CPU consumed:   {} secs, {} mins, {} hours",
            self.cpu_seconds,
            self.cpu_seconds.minutes(),
            self.cpu_seconds.hours()
        )?;
        write!(f, "RAM consumed:   {}G", self.memory.as_coarse_gigabytes())
    }
}

/// `--json` shape: dates as `bacct` sees them, derived values precomputed.
#[derive(Debug, Serialize)]
struct JsonSummary {
    start: String,
    end: String,
    job_count: u64,
    cpu_seconds: u64,
    cpu_minutes: u64,
    cpu_hours: u64,
    memory_megs: u64,
    memory_gigs: u64,
}

impl From<&UsageSummary> for JsonSummary {
    fn from(summary: &UsageSummary) -> Self {
        Self {
            start: summary.interval.start_for_lsf(),
            end: summary.interval.end_for_lsf(),
            job_count: summary.job_count,
            cpu_seconds: *summary.cpu_seconds,
            cpu_minutes: summary.cpu_seconds.minutes(),
            cpu_hours: summary.cpu_seconds.hours(),
            memory_megs: *summary.memory,
            memory_gigs: summary.memory.as_coarse_gigabytes(),
        }
    }
}

#[allow(non_snake_case)]
#[cfg(test)]
mod test {
    use super::*;
    use crate::error::{AccountingError, ParseFailure};

    const REPORT: &str = "\
Accounting information about jobs that are:
  - submitted by users sol-pipe,
  - accounted on all projects.
------------------------------------------------------------------------------
Job <1>, User <sol-pipe>, Status <DONE>
     CPU_T     WAIT     TURNAROUND   STATUS     HOG_FACTOR    MEM
   3600.50       12          3700     done         0.9730    500M
------------------------------------------------------------------------------
SUMMARY:      ( time unit: second )
 Total number of done jobs:     686      Total number of exited jobs:    82
 Total CPU time consumed:   4601894.5      Average CPU time consumed:  5958.4
";

    fn interval() -> Result<Interval> {
        Interval::parse("2008/12/01,2008/12/31")
    }

    #[test]
    fn CpuSeconds__derived_units() {
        let secs = CpuSeconds(7199);
        assert_eq!(secs.minutes(), 119);
        assert_eq!(secs.hours(), 1);
        assert_eq!(CpuSeconds(59).minutes(), 0);
    }

    #[test]
    fn MemoryTotal__coarse_gigabytes() {
        assert_eq!(MemoryTotal(1463).as_coarse_gigabytes(), 1);
        assert_eq!(MemoryTotal(999).as_coarse_gigabytes(), 0);
        assert_eq!(MemoryTotal(2000).as_coarse_gigabytes(), 2);
    }

    #[test]
    fn MemoryTotal__add_assign_saturates() {
        let mut total = MemoryTotal(u64::MAX - 1);
        total += MemoryTotal(5);
        assert_eq!(total, MemoryTotal(u64::MAX));
    }

    #[test]
    fn UsageSummary__build() -> Result<()> {
        let summary = UsageSummary::build(interval()?, &RawReport::from(REPORT))?;
        assert_eq!(
            summary,
            UsageSummary {
                interval: interval()?,
                job_count: 686,
                cpu_seconds: CpuSeconds(4_601_894),
                memory: MemoryTotal(500),
            }
        );
        Ok(())
    }

    #[test]
    fn UsageSummary__build__missing_cpu_line() -> Result<()> {
        let report = RawReport::from(" Total number of done jobs:     1      Total number of exited jobs:    0\n");
        let err = UsageSummary::build(interval()?, &report).expect_err("no cpu line");
        assert!(matches!(err, AccountingError::Parse(ParseFailure::CpuTimeNotFound)));
        assert_eq!(err.to_string(), "Problems parsing bacct output: CPU time not found");
        Ok(())
    }

    #[test]
    fn UsageSummary__build__missing_job_line() -> Result<()> {
        let report = RawReport::from(" Total CPU time consumed:   10.0\n   1M\n");
        let err = UsageSummary::build(interval()?, &report).expect_err("no job count line");
        assert!(matches!(err, AccountingError::Parse(ParseFailure::JobCountNotFound)));
        Ok(())
    }

    #[test]
    fn UsageSummary__display() -> Result<()> {
        let summary = UsageSummary {
            interval: interval()?,
            job_count: 686,
            cpu_seconds: CpuSeconds(4_601_894),
            memory: MemoryTotal(1463),
        };
        assert_eq!(
            summary.to_string(),
            "Query interval: 2008/12/01 - 2008/12/31\n\
             Total jobs:     686\n\
             CPU consumed:   4601894 secs, 76698 mins, 1278 hours\n\
             RAM consumed:   1G"
        );
        Ok(())
    }

    #[test]
    fn UsageSummary__display__no_memory() -> Result<()> {
        let summary = UsageSummary {
            interval: interval()?,
            job_count: 0,
            cpu_seconds: CpuSeconds(0),
            memory: MemoryTotal::default(),
        };
        assert!(summary.to_string().ends_with("RAM consumed:   0G"));
        Ok(())
    }

    #[test]
    fn UsageSummary__to_json() -> Result<(), Box<dyn std::error::Error>> {
        let summary = UsageSummary {
            interval: interval()?,
            job_count: 686,
            cpu_seconds: CpuSeconds(4_601_894),
            memory: MemoryTotal(1463),
        };
        let json: serde_json::Value = serde_json::from_str(&summary.to_json()?)?;
        assert_eq!(json["start"], "2008/12/01");
        assert_eq!(json["end"], "2008/12/31");
        assert_eq!(json["job_count"], 686);
        assert_eq!(json["cpu_hours"], 1278);
        assert_eq!(json["memory_megs"], 1463);
        assert_eq!(json["memory_gigs"], 1);
        Ok(())
    }
}

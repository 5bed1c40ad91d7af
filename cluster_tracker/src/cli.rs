use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

/// Track the CPU/RAM usage of all LSF jobs of a user between two dates.
///
/// Example: cluster_tracker -i 2008/12/01,2008/12/31 -u sol-pipe
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "cluster_tracker", version, disable_version_flag = true)]
pub struct Args {
    /// Interval as `start,end`, e.g. 2008/12/01,2008/12/31
    #[arg(short, long, value_name = "START,END")]
    pub interval: String,

    /// Jobs belonging to this user
    #[arg(short, long)]
    pub user: String,

    /// Read a captured `bacct -l` report from this file instead of running bacct
    #[arg(short, long, value_name = "PATH")]
    pub simulate: Option<PathBuf>,

    /// Run in verbose mode
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Print the summary as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Settings file (TOML), defaults to `cluster_tracker.toml` in the working directory
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level, takes precedence over `--verbose`
    #[arg(long)]
    pub log_level: Option<Level>,

    /// Display the version, then exit
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    version: (),
}

#[allow(non_snake_case)]
#[cfg(test)]
mod test {
    use clap::{error::ErrorKind, CommandFactory as _};

    use super::*;

    #[test]
    fn Args__command__debug_assert() {
        Args::command().debug_assert();
    }

    #[test]
    fn Args__parse__short_flags() -> Result<(), clap::Error> {
        let args = Args::try_parse_from([
            "cluster_tracker",
            "-i",
            "2008/12/01,2008/12/31",
            "-u",
            "sol-pipe",
            "-s",
            "report.txt",
            "-V",
        ])?;
        assert_eq!(args.interval, "2008/12/01,2008/12/31");
        assert_eq!(args.user, "sol-pipe");
        assert_eq!(args.simulate, Some(PathBuf::from("report.txt")));
        assert!(args.verbose);
        assert!(!args.json);
        assert_eq!(args.log_level, None);
        Ok(())
    }

    #[test]
    fn Args__parse__long_flags() -> Result<(), clap::Error> {
        let args = Args::try_parse_from([
            "cluster_tracker",
            "--interval",
            "2008/12/01,2008/12/31",
            "--user",
            "sol-pipe",
            "--json",
            "--log-level",
            "debug",
        ])?;
        assert_eq!(args.simulate, None);
        assert!(!args.verbose);
        assert!(args.json);
        assert_eq!(args.log_level, Some(Level::DEBUG));
        Ok(())
    }

    #[test]
    fn Args__parse__missing_required() {
        let err = Args::try_parse_from(["cluster_tracker", "-i", "2008/12/01,2008/12/31"])
            .expect_err("user is required");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = Args::try_parse_from(["cluster_tracker", "-u", "sol-pipe"]).expect_err("interval is required");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn Args__parse__version_and_help() {
        let err = Args::try_parse_from(["cluster_tracker", "-v"]).expect_err("version exits early");
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);

        let err = Args::try_parse_from(["cluster_tracker", "-h"]).expect_err("help exits early");
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }
}

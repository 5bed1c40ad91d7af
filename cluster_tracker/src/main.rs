mod cli;
mod settings;

use std::time::Instant;

use accounting_data::{Interval, LsfUser, ReportRequestBuilder, RunOptions};
use chrono::Local;
use clap::Parser as _;
use cli::Args;
use color_eyre::{
    eyre::{eyre, Context as _},
    Result,
};
use settings::Settings;
use tracing::{info, Level};

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let settings = Settings::new(args.config.as_deref()).wrap_err("loading settings")?;
    register_logging(log_level(&args, &settings)?)?;

    let started = Instant::now();
    info!("Start at {}", Local::now().format("%Y-%m-%dT%H:%M:%S"));
    output_options(&args, &settings);

    let options = RunOptions {
        bacct_command: settings.bacct_command,
    };
    run(&args, &options)?;

    info!(
        elapsed = ?started.elapsed(),
        "Finished at {}",
        Local::now().format("%Y-%m-%dT%H:%M:%S")
    );
    Ok(())
}

fn run(args: &Args, options: &RunOptions) -> Result<()> {
    let interval = Interval::parse(&args.interval)?;
    let user = LsfUser::new(args.user.as_str())?;

    let mut builder = ReportRequestBuilder::default();
    builder.user(user).interval(interval);
    if let Some(path) = &args.simulate {
        builder.source(path.clone());
    }
    let request = builder.build().wrap_err("building report request")?;

    let summary = accounting_data::track(request, options)?;
    if args.json {
        println!("{}", summary.to_json().wrap_err("serializing summary")?);
    } else {
        println!("{summary}");
    }
    Ok(())
}

/// `--log-level` > `log_level` setting > `--verbose` (INFO) > WARN
fn log_level(args: &Args, settings: &Settings) -> Result<Level> {
    if let Some(level) = args.log_level {
        return Ok(level);
    }
    if let Some(level) = &settings.log_level {
        return level
            .parse()
            .map_err(|e| eyre!("invalid log_level `{level}` in settings: {e}"));
    }
    Ok(if args.verbose { Level::INFO } else { Level::WARN })
}

fn register_logging(level: Level) -> Result<()> {
    // stdout is reserved for the summary
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).wrap_err("setting default subscriber failed")
}

fn output_options(args: &Args, settings: &Settings) {
    info!("Options:");
    info!("  interval = {}", args.interval);
    info!("  user = {}", args.user);
    info!("  simulate = {:?}", args.simulate);
    info!("  json = {}", args.json);
    info!("  bacct_command = {}", settings.bacct_command);
}

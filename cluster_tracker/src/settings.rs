use std::path::Path;

use accounting_data::DEFAULT_BACCT_COMMAND;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "cluster_tracker";
const ENV_PREFIX: &str = "CLUSTER_TRACKER";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Program invoked as `<bacct_command> -C <start>,<end> -l -u <user>`
    pub bacct_command: String,
    pub log_level: Option<String>,
}

impl Settings {
    /// defaults < settings file < `CLUSTER_TRACKER_*` environment variables
    ///
    /// Without an explicit `path`, a missing `cluster_tracker.toml` is fine.
    pub fn new(path: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = Config::builder().set_default("bacct_command", DEFAULT_BACCT_COMMAND)?;
        let builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }
}

use std::{fmt, process::Command};

use chrono::NaiveDate;
use derive_more::derive::{Deref, Display, Into};
use crate::{error::AccountingError, interval::Interval};

/// Login name the accounting report is queried for. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Into, Display)]
pub struct LsfUser(String);

impl LsfUser {
    pub fn new(name: impl Into<String>) -> Result<Self, AccountingError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AccountingError::InvalidUser(name));
        }
        Ok(Self(name))
    }
}

/// `bacct -C` wants `YYYY/MM/DD`, nothing else.
pub fn format_date_for_lsf(date: NaiveDate) -> String {
    const FMT: &str = "%Y/%m/%d";
    date.format(FMT).to_string()
}

/// `<program> -C <start>,<end> -l -u <user>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacctCommand {
    program: String,
    args: Vec<String>,
}

impl BacctCommand {
    pub fn new(program: impl Into<String>, interval: &Interval, user: &LsfUser) -> Self {
        Self {
            program: program.into(),
            args: vec![
                "-C".to_owned(),
                interval.to_string(),
                "-l".to_owned(),
                "-u".to_owned(),
                user.to_string(),
            ],
        }
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl fmt::Display for BacctCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

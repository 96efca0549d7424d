//! Sets up the global `log` backend from `--log-destination` and `--log-level`.
//!
//! Terminal output goes to stderr so stdout carries only scan results. The
//! log file is truncated on every run.

use std::fs::File;
use std::path::Path;

use clap::ValueEnum;
use log::LevelFilter;
use serde::Deserialize;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "./scanner.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogDestination {
    /// stderr
    #[default]
    Terminal,
    /// `./scanner.log`
    File,
    Both,
}

impl LogDestination {
    fn to_terminal(self) -> bool {
        matches!(self, Self::Terminal | Self::Both)
    }

    fn to_file(self) -> bool {
        matches!(self, Self::File | Self::Both)
    }
}

pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let loggers = loggers_for(destination, level, Path::new(LOG_FILE));
    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
}

/// An unwritable log file is reported on stderr and skipped; the terminal
/// logger, if requested, still comes up.
fn loggers_for(
    destination: LogDestination,
    level: LevelFilter,
    log_file: &Path,
) -> Vec<Box<dyn SharedLogger>> {
    let config = scanner_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if destination.to_terminal() {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if destination.to_file() {
        match File::create(log_file) {
            Ok(file) => loggers.push(WriteLogger::new(level, config, file)),
            Err(err) => eprintln!("warning: not logging to {}: {}", log_file.display(), err),
        }
    }
    loggers
}

// RFC 3339 timestamps; module paths only on errors.
fn scanner_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

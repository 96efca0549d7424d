use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::SERVICE_URL_ENV;
use crate::logging::LogDestination;

#[derive(Debug, Parser)]
#[command(
    name = "scanner",
    version,
    about = "Submit sites to a PDF accessibility scan service and collect the reports"
)]
pub struct Cli {
    /// RON configuration file; flags and environment override its values.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long, value_name = "URL", env = SERVICE_URL_ENV)]
    pub service_url: Option<String>,

    /// Directory that downloaded report archives are saved to.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[arg(long, value_enum)]
    pub log_destination: Option<LogDestination>,

    /// Abort requests after this many seconds. Unset means wait indefinitely.
    #[arg(long, value_name = "SECS")]
    pub request_timeout_secs: Option<u64>,

    #[arg(long, value_name = "BYTES")]
    pub max_download_bytes: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Scan the given URLs once and exit with a status-dependent code.
    Scan {
        /// URLs, separated by spaces and/or commas.
        #[arg(required = true, value_name = "URL")]
        urls: Vec<String>,
    },
    /// Read URLs and commands from stdin (default).
    Interactive,
}

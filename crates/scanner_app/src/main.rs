mod app;
mod cli;
mod config;
mod effects;
mod logging;
mod render;

use std::process::ExitCode;

use clap::Parser;

fn main() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();
    let config = config::AppConfig::load(&cli)?;
    logging::initialize(config.log_destination, config.log_level);

    let mode = cli.command.unwrap_or(cli::Command::Interactive);
    app::run(&config, mode)
}

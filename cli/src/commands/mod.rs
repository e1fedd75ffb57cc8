//! CLI command definitions and dispatch.

mod images;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use conscanner_core::{LogLevel, ScanConfig};

/// conscanner - find container images in YAML manifests and report on them.
#[derive(Parser)]
#[command(name = "conscanner", version, about)]
pub struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Command {
    /// Look for images in a directory or file and write images.json
    Images(images::ImagesArgs),
    /// Run a vulnerability scan for every image in images.json
    Report(report::ReportArgs),
}

impl Cli {
    /// Build the effective configuration: file (if given), then flags.
    pub fn load_config(&self) -> Result<ScanConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => ScanConfig::from_file(path)?,
            None => ScanConfig::default(),
        };
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        match &self.command {
            Command::Images(args) => args.apply(&mut config),
            Command::Report(args) => args.apply(&mut config),
        }
        config.validate()?;
        Ok(config)
    }
}

/// Dispatch a parsed CLI to the appropriate command handler.
pub async fn dispatch(cli: Cli, config: ScanConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Images(args) => images::execute(args, config).await,
        Command::Report(args) => report::execute(args, config).await,
    }
}

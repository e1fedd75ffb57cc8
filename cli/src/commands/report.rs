//! `conscanner report` command.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use conscanner_core::ScanConfig;
use conscanner_discovery::{CommandScanner, ReportGenerator};

#[derive(Args)]
pub struct ReportArgs {
    /// Path of the images.json document
    #[arg(default_value = "./images.json")]
    pub image_file: PathBuf,

    /// Directory receiving one report per image
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Scanner executable (invoked as `<scanner> <args..> <image>`)
    #[arg(long)]
    pub scanner: Option<String>,
}

impl ReportArgs {
    pub(crate) fn apply(&self, config: &mut ScanConfig) {
        if let Some(ref dir) = self.report_dir {
            config.report_dir = dir.clone();
        }
        if let Some(ref scanner) = self.scanner {
            config.scanner.program = scanner.clone();
        }
    }
}

pub async fn execute(
    args: ReportArgs,
    config: ScanConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running for generating report...");

    let scanner = Arc::new(CommandScanner::new(&config.scanner));
    let generator = ReportGenerator::new(scanner, config.report_dir.clone());
    let summary = generator.generate(&args.image_file).await?;

    println!(
        "{} report(s) written to {}, {} failed",
        summary.written.len(),
        config.report_dir.display(),
        summary.failed.len()
    );
    Ok(())
}

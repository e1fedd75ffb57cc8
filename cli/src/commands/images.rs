//! `conscanner images` command.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use conscanner_core::ScanConfig;
use conscanner_discovery::{store, Discovery, HubTagLookup};

use crate::output;

#[derive(Args)]
pub struct ImagesArgs {
    /// Source directory (or single file) containing the YAML manifests
    #[arg(default_value = "./")]
    pub dir: PathBuf,

    /// Where to write the validated image document
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Tag lookup API base URL
    #[arg(long)]
    pub lookup_url: Option<String>,

    /// Per-lookup timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Maximum concurrent registry lookups
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Do not print the summary table
    #[arg(short, long)]
    pub quiet: bool,
}

impl ImagesArgs {
    pub(crate) fn apply(&self, config: &mut ScanConfig) {
        if let Some(ref output) = self.output {
            config.output = output.clone();
        }
        if let Some(ref url) = self.lookup_url {
            config.lookup.base_url = url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.lookup.timeout_secs = timeout;
        }
        if let Some(concurrency) = self.concurrency {
            config.lookup.concurrency = concurrency;
        }
    }
}

pub async fn execute(
    args: ImagesArgs,
    config: ScanConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running for finding images...");

    let lookup = Arc::new(HubTagLookup::new(&config.lookup)?);
    let output_path = config.output.clone();
    let discovery = Discovery::new(config, lookup)?;

    let document = discovery.run(&args.dir).await?;
    store::save(&document, &output_path)?;

    tracing::info!(
        file = %output_path.display(),
        images = document.len(),
        "Successfully generated image document"
    );

    if !args.quiet {
        println!("{}", output::images_table(&document));
    }
    Ok(())
}

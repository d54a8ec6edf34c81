use std::sync::Arc;

use anyhow::{Context, Result, bail};
use mtscrape_core::{
    DownloadConfig, DownloadOrchestrator, Driver, ProcessRunner, StreamResolver,
    load_default_file_config,
};
use tracing::{debug, info};

use crate::app::{config_runtime, terminal};
use crate::cli::Args;

pub(crate) async fn run_mtscrape(args: Args) -> Result<()> {
    let file_config = load_default_file_config().context("Cannot load config file")?;

    let default_level = config_runtime::resolve_default_log_level(&args);
    terminal::init_tracing(default_level, terminal::is_no_color_requested());

    debug!(?args, "CLI arguments parsed");
    if file_config.is_some() {
        debug!("Config file defaults applied");
    }

    let config = config_runtime::build_download_config(&args, file_config.as_ref())?;
    let sources = config_runtime::sources_from_args(&args);

    if sources.is_empty() {
        info!("Nothing to do. Pass --asx, --category, --item or --link.");
        info!("Example: mtscrape --category 208 --age 2 --match journal");
        return Ok(());
    }

    prepare_output_dir(&config)?;

    let resolver = StreamResolver::new(&config.http).context("Cannot build HTTP client")?;
    let orchestrator = DownloadOrchestrator::new(Arc::new(ProcessRunner::new()));
    let driver = Driver::new(resolver, orchestrator);

    info!(
        dir = %config.output_dir.display(),
        fast = config.fast,
        convert = config.convert,
        dry_run = config.dry_run,
        "Mtscrape starting"
    );
    driver.run(&sources, &config).await;
    Ok(())
}

/// The only fatal filesystem condition: an output directory that cannot be
/// created, or a path that exists but is not a directory.
fn prepare_output_dir(config: &DownloadConfig) -> Result<()> {
    if config.dry_run || config.output_dir.is_dir() {
        return Ok(());
    }
    if config.output_dir.exists() {
        bail!(
            "Cannot use output directory '{}': the path exists but is not a directory\n  Suggestion: Pass a directory to --dir",
            config.output_dir.display()
        );
    }
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Cannot create output directory '{}'\n  Suggestion: Check the path passed to --dir and its permissions",
            config.output_dir.display()
        )
    })?;
    info!(dir = %config.output_dir.display(), "Created output directory");
    Ok(())
}

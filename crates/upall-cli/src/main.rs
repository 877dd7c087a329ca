use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use upall_core::{PipelineBuilder, UpallConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    // (A) fixed directories and commands, relative to $HOME
    let config = UpallConfig::load().context("failed to resolve default configuration")?;
    tracing::debug!(
        plugin_dir = %config.plugin_dir.display(),
        cache_dir = %config.cache_dir.display(),
        "configuration loaded"
    );

    // (B) plan + validate before anything is spawned
    let pipeline = PipelineBuilder::new(config)
        .build()
        .context("failed to plan the run")?;

    // (C) run everything, then the post-processors
    let report = pipeline.run().await.context("run aborted")?;

    match report.to_json() {
        Ok(json) => tracing::debug!(report = %json, "run report"),
        Err(e) => tracing::debug!(error = %e, "run report not serializable"),
    }

    // task failures are reported but do not change the exit code
    if !report.all_succeeded() {
        let counts = report.counts();
        tracing::warn!(failed = counts.failed, "some tasks left no cache record");
    }
    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the default `info` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

mod archive;
mod cli;
mod config;
mod drive;
mod error;
mod hub;
mod manifest;
mod orchestrator;
mod stream;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use config::Config;
use drive::HttpTransport;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let transport = HttpTransport::new().context("Failed to build HTTP client")?;

    let summary = orchestrator::run(&config, cli.model_source, hub::connect, &transport)
        .context("Download run failed")?;

    if summary.snapshots > 0 {
        println!("✓ Pulled {} model snapshots", summary.snapshots);
    }
    println!(
        "✓ Examples ready: {} files ({} byte archive)",
        summary.extracted_files, summary.archive_bytes
    );

    Ok(())
}

use crate::archive;
use crate::config::Config;
use crate::drive::{self, DriveTransport};
use crate::error::Result;
use crate::hub::{self, ModelSource, SnapshotHub};
use crate::manifest::{Manifest, SnapshotRecord};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub snapshots: usize,
    pub archive_bytes: u64,
    pub extracted_files: usize,
}

/// Runs the five snapshots of `hub` into the configured checkpoint layout.
pub fn download_models(hub: &dyn SnapshotHub, config: &Config) -> Result<usize> {
    let source = hub.source();
    println!(
        "[{}] Downloading models to {}, model cache dir={}",
        source,
        config.checkpoints_dir.display(),
        config.hf_cache_dir.display()
    );

    let mut manifest = Manifest::load(&config.manifest_path).unwrap_or_else(|e| {
        tracing::warn!(
            "Ignoring unreadable manifest {:?}, starting fresh: {}",
            config.manifest_path,
            e
        );
        Manifest::default()
    });
    let targets = hub::snapshot_targets(source, &config.checkpoints_dir, &config.hf_cache_dir);

    for target in &targets {
        if let Some(previous) = manifest.get(&target.local_dir) {
            tracing::info!(
                "Refreshing {:?} (last pulled {} from {})",
                target.local_dir,
                previous.downloaded_at,
                previous.source
            );
        }
        let outcome = hub.snapshot_download(&target.repo_id, &target.local_dir)?;

        manifest.record(SnapshotRecord {
            repo_id: target.repo_id.clone(),
            source,
            local_dir: target.local_dir.clone(),
            files: outcome.files,
            bytes: outcome.bytes,
            downloaded_at: chrono::Utc::now().to_rfc3339(),
        });
        manifest.save(&config.manifest_path)?;
    }
    tracing::debug!("Manifest tracks {} snapshots", manifest.len());

    Ok(targets.len())
}

/// Downloads the example archive from Drive and unpacks it.
pub fn download_examples(transport: &dyn DriveTransport, config: &Config) -> Result<(u64, usize)> {
    println!("Downloading example files from Google Drive...");
    let bytes = drive::download_file(transport, &config.examples_file_id, &config.archive_path)?;
    println!("File downloaded to: {}", config.archive_path.display());

    let files = archive::extract_zip(&config.archive_path, &config.examples_dir)?;
    println!("File extracted to: {}", config.examples_dir.display());

    Ok((bytes, files))
}

/// Model snapshots when a source is chosen, then the example archive.
///
/// `connect_hub` is only called for the chosen source.
pub fn run<F>(
    config: &Config,
    source: Option<ModelSource>,
    connect_hub: F,
    transport: &dyn DriveTransport,
) -> Result<RunSummary>
where
    F: FnOnce(ModelSource, &Config) -> Result<Box<dyn SnapshotHub>>,
{
    let mut summary = RunSummary::default();

    if let Some(source) = source {
        let hub = connect_hub(source, config)?;
        summary.snapshots = download_models(hub.as_ref(), config)?;
    }

    let (archive_bytes, extracted_files) = download_examples(transport, config)?;
    summary.archive_bytes = archive_bytes;
    summary.extracted_files = extracted_files;

    Ok(summary)
}

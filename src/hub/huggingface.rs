use super::{is_up_to_date, local_path, validate_repo_id, ModelSource, SnapshotHub, SnapshotOutcome};
use crate::error::{Error, Result};
use hf_hub::api::sync::{Api, ApiBuilder};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::fs;
use std::path::Path;

const REVISION: &str = "main";

#[derive(Debug, Deserialize)]
pub struct RepoListing {
    #[serde(default)]
    pub siblings: Vec<RepoSibling>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoSibling {
    pub rfilename: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Lists repositories with file sizes through the Hub REST API, and fetches
/// files through hf-hub's cache.
pub struct HuggingFaceHub {
    api: Api,
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HuggingFaceHub {
    pub fn new(endpoint: &str, token: Option<String>) -> Result<Self> {
        let mut builder = ApiBuilder::from_env().with_progress(true);
        if token.is_some() {
            builder = builder.with_token(token.clone());
        }
        let api = builder.build()?;

        let client = Client::builder()
            .user_agent(concat!("checkpoint-fetch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            api,
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn listing_url(&self, repo_id: &str) -> String {
        format!("{}/api/models/{}/revision/{}", self.endpoint, repo_id, REVISION)
    }

    fn list_files(&self, repo_id: &str) -> Result<Vec<RepoSibling>> {
        let mut request = self
            .client
            .get(self.listing_url(repo_id))
            .query(&[("blobs", "true")]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let listing: RepoListing = request
            .send()?
            .error_for_status()
            .map_err(|e| Error::HubError(format!("Could not list '{}': {}", repo_id, e)))?
            .json()?;

        Ok(listing.siblings)
    }
}

impl SnapshotHub for HuggingFaceHub {
    fn source(&self) -> ModelSource {
        ModelSource::HuggingFace
    }

    fn snapshot_download(&self, repo_id: &str, local_dir: &Path) -> Result<SnapshotOutcome> {
        validate_repo_id(repo_id)?;
        tracing::info!("Pulling snapshot from HuggingFace: {}", repo_id);

        let siblings = self.list_files(repo_id)?;
        tracing::debug!("{} has {} files", repo_id, siblings.len());

        fs::create_dir_all(local_dir)?;

        let repo = self.api.model(repo_id.to_string());
        let mut outcome = SnapshotOutcome::default();
        for sibling in &siblings {
            let target = local_path(local_dir, &sibling.rfilename)?;

            let bytes = if is_up_to_date(&target, sibling.size) {
                tracing::debug!("Skipping up-to-date {}", sibling.rfilename);
                sibling.size.unwrap_or_default()
            } else {
                let cached = repo.get(&sibling.rfilename)?;
                link_or_copy(&cached, &target)?;
                fs::metadata(&target)?.len()
            };

            outcome.files += 1;
            outcome.bytes += bytes;
        }

        tracing::info!(
            "Snapshot '{}' placed in {:?} ({} files)",
            repo_id,
            local_dir,
            outcome.files
        );

        Ok(outcome)
    }
}

/// Places `cached` at `target`, preferring a hard link to the cache blob.
///
/// Cache snapshot entries are symlinks, so the blob is resolved first; linking
/// the symlink itself would leave a dangling relative link behind.
pub fn link_or_copy(cached: &Path, target: &Path) -> Result<()> {
    let blob = fs::canonicalize(cached).map_err(|e| {
        Error::HubError(format!("Could not resolve cached file {:?}: {}", cached, e))
    })?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    if fs::symlink_metadata(target).is_ok() {
        fs::remove_file(target)?;
    }

    if let Err(e) = fs::hard_link(&blob, target) {
        tracing::debug!("Hard link failed ({}), copying {:?}", e, blob);
        fs::copy(&blob, target)?;
    }

    Ok(())
}

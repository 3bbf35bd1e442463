//! ModelScope snapshots over the hub's public REST API.

use super::{
    is_up_to_date, local_path, validate_repo_id, ModelSource, SnapshotHub, SnapshotOutcome,
};
use crate::error::{Error, Result};
use crate::stream;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::fs;
use std::path::Path;

const REVISION: &str = "master";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileListResponse {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<FileListData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileListData {
    #[serde(default)]
    pub files: Vec<RepoFile>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepoFile {
    pub name: String,
    pub path: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(default)]
    pub size: Option<u64>,
}

impl FileListResponse {
    /// The downloadable files of the listing, or the hub's error message.
    pub fn into_blobs(self, repo_id: &str) -> Result<Vec<RepoFile>> {
        if self.code != 200 {
            return Err(Error::HubError(format!(
                "ModelScope refused to list '{}' (code {}): {}",
                repo_id,
                self.code,
                self.message.unwrap_or_default()
            )));
        }

        Ok(self
            .data
            .map(|d| d.files)
            .unwrap_or_default()
            .into_iter()
            .filter(|f| f.kind == "blob")
            .collect())
    }
}

pub struct ModelScopeHub {
    client: Client,
    endpoint: String,
}

impl ModelScopeHub {
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("checkpoint-fetch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn files_url(&self, repo_id: &str) -> String {
        format!("{}/api/v1/models/{}/repo/files", self.endpoint, repo_id)
    }

    pub fn file_url(&self, repo_id: &str) -> String {
        format!("{}/api/v1/models/{}/repo", self.endpoint, repo_id)
    }

    fn list_files(&self, repo_id: &str) -> Result<Vec<RepoFile>> {
        let listing: FileListResponse = self
            .client
            .get(self.files_url(repo_id))
            .query(&[("Revision", REVISION), ("Recursive", "true")])
            .send()?
            .error_for_status()?
            .json()?;

        listing.into_blobs(repo_id)
    }

    fn fetch_file(&self, repo_id: &str, file: &RepoFile, target: &Path) -> Result<u64> {
        let response = self
            .client
            .get(self.file_url(repo_id))
            .query(&[("Revision", REVISION), ("FilePath", file.path.as_str())])
            .send()?
            .error_for_status()?;

        let written = stream::save_reader(response, target)?;
        if let Some(expected) = file.size {
            if written != expected {
                return Err(Error::DownloadFailed(format!(
                    "{}: expected {} bytes, got {}",
                    file.path, expected, written
                )));
            }
        }

        Ok(written)
    }
}

impl SnapshotHub for ModelScopeHub {
    fn source(&self) -> ModelSource {
        ModelSource::ModelScope
    }

    fn snapshot_download(&self, repo_id: &str, local_dir: &Path) -> Result<SnapshotOutcome> {
        validate_repo_id(repo_id)?;
        tracing::info!("Pulling snapshot from ModelScope: {}", repo_id);

        let files = self.list_files(repo_id)?;
        tracing::debug!("{} has {} files", repo_id, files.len());

        fs::create_dir_all(local_dir)?;

        let mut outcome = SnapshotOutcome::default();
        for file in &files {
            let target = local_path(local_dir, &file.path)?;

            let bytes = if is_up_to_date(&target, file.size) {
                tracing::debug!("Skipping up-to-date {}", file.name);
                file.size.unwrap_or_default()
            } else {
                tracing::info!("Downloading {}", file.path);
                self.fetch_file(repo_id, file, &target)?
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

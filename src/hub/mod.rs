pub mod catalog;
pub mod huggingface;
pub mod modelscope;

pub use catalog::snapshot_targets;
pub use huggingface::HuggingFaceHub;
pub use modelscope::ModelScopeHub;

use crate::config::Config;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelSource {
    #[value(name = "modelscope")]
    ModelScope,
    #[value(name = "huggingface")]
    HuggingFace,
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSource::ModelScope => write!(f, "ModelScope"),
            ModelSource::HuggingFace => write!(f, "HuggingFace"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotOutcome {
    pub files: usize,
    pub bytes: u64,
}

/// A model hub that can mirror a whole repository into a local directory.
pub trait SnapshotHub {
    fn source(&self) -> ModelSource;

    fn snapshot_download(&self, repo_id: &str, local_dir: &Path) -> Result<SnapshotOutcome>;
}

pub fn connect(source: ModelSource, config: &Config) -> Result<Box<dyn SnapshotHub>> {
    match source {
        ModelSource::ModelScope => Ok(Box::new(ModelScopeHub::new(&config.modelscope_endpoint)?)),
        ModelSource::HuggingFace => Ok(Box::new(HuggingFaceHub::new(
            &config.hf_endpoint,
            config.hf_token.clone(),
        )?)),
    }
}

/// Repository ids are `org/name`.
pub fn validate_repo_id(repo_id: &str) -> Result<()> {
    let valid = match repo_id.split_once('/') {
        Some((org, name)) => [org, name].iter().all(|part| {
            !part.is_empty()
                && *part != "."
                && *part != ".."
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        }),
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(crate::error::Error::InvalidInput(format!(
            "Repository id must look like 'org/name', got {:?}",
            repo_id
        )))
    }
}

/// Whether `path` already holds a file of `expected` bytes.
fn is_up_to_date(path: &Path, expected: Option<u64>) -> bool {
    match (fs::metadata(path), expected) {
        (Ok(meta), Some(size)) => meta.is_file() && meta.len() == size,
        _ => false,
    }
}

/// Joins a repo-relative path onto `root`, refusing absolute paths and `..`.
fn local_path(root: &Path, relative: &str) -> Result<std::path::PathBuf> {
    use std::path::Component;

    let relative = Path::new(relative);
    if relative.as_os_str().is_empty()
        || !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(crate::error::Error::HubError(format!(
            "Refusing unsafe repository path: {:?}",
            relative
        )));
    }
    Ok(root.join(relative))
}

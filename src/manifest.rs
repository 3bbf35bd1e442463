use crate::error::Result;
use crate::hub::ModelSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub repo_id: String,
    pub source: ModelSource,
    pub local_dir: PathBuf,
    pub files: usize,
    pub bytes: u64,
    pub downloaded_at: String,
}

/// Completed snapshots, keyed by local directory.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Manifest {
    snapshots: BTreeMap<String, SnapshotRecord>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let manifest: Manifest = toml::from_str(&content)?;
        Ok(manifest)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn record(&mut self, record: SnapshotRecord) {
        let key = record.local_dir.to_string_lossy().into_owned();
        self.snapshots.insert(key, record);
    }

    pub fn get(&self, local_dir: &Path) -> Option<&SnapshotRecord> {
        self.snapshots.get(local_dir.to_string_lossy().as_ref())
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(repo_id: &str, source: ModelSource, files: usize) -> SnapshotRecord {
        SnapshotRecord {
            repo_id: repo_id.to_string(),
            source,
            local_dir: PathBuf::from("checkpoints/hf_cache/models--funasr--campplus"),
            files,
            bytes: 28_034_000,
            downloaded_at: "2026-10-16T12:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn missing_manifest_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::load(&dir.path().join("fetch-manifest.toml")).unwrap();
        assert_eq!(manifest.len(), 0);
    }

    #[test]
    fn later_snapshot_of_same_dir_replaces_earlier() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoints").join("fetch-manifest.toml");

        let mut manifest = Manifest::default();
        manifest.record(record("funasr/campplus", ModelSource::ModelScope, 3));
        manifest.record(record("funasr/campplus", ModelSource::HuggingFace, 4));
        manifest.save(&path).unwrap();

        let loaded = Manifest::load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        let entry = loaded
            .get(Path::new("checkpoints/hf_cache/models--funasr--campplus"))
            .unwrap();
        assert_eq!(entry.source, ModelSource::HuggingFace);
        assert_eq!(entry.files, 4);
        assert!(fs::read_to_string(&path).unwrap().contains("source = \"huggingface\""));
    }
}

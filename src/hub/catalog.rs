use super::ModelSource;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotTarget {
    /// Repository id on the selected hub.
    pub repo_id: String,
    pub local_dir: PathBuf,
}

/// HuggingFace repository ids of the checkpoints, and whether each one lives
/// in the shared cache (`true`) or directly in the destination.
const MODELS: [(&str, bool); 5] = [
    ("IndexTeam/IndexTTS-2", false),
    ("amphion/MaskGCT", true),
    ("facebook/w2v-bert-2.0", true),
    ("nvidia/bigvgan_v2_22khz_80band_256x", true),
    ("funasr/campplus", true),
];

/// `org/name` becomes `models--org--name`.
pub fn hub_cache_dir_name(repo_id: &str) -> String {
    format!("models--{}", repo_id.replace('/', "--"))
}

/// Where a HuggingFace repository is published on `source`.
fn published_repo_id(source: ModelSource, hf_repo_id: &str) -> String {
    match (source, hf_repo_id) {
        (ModelSource::ModelScope, "nvidia/bigvgan_v2_22khz_80band_256x") => {
            "nv-community/bigvgan_v2_22khz_80band_256x".to_string()
        }
        _ => hf_repo_id.to_string(),
    }
}

pub fn snapshot_targets(
    source: ModelSource,
    destination: &Path,
    cache_dir: &Path,
) -> Vec<SnapshotTarget> {
    MODELS
        .iter()
        .map(|&(hf_repo_id, cached)| SnapshotTarget {
            repo_id: published_repo_id(source, hf_repo_id),
            local_dir: if cached {
                cache_dir.join(hub_cache_dir_name(hf_repo_id))
            } else {
                destination.to_path_buf()
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_dir_name_follows_hub_convention() {
        assert_eq!(hub_cache_dir_name("funasr/campplus"), "models--funasr--campplus");
    }

    #[test]
    fn huggingface_targets() {
        let dest = Path::new("checkpoints");
        let cache = dest.join("hf_cache");
        let targets = snapshot_targets(ModelSource::HuggingFace, dest, &cache);

        let expected = vec![
            ("IndexTeam/IndexTTS-2", dest.to_path_buf()),
            ("amphion/MaskGCT", cache.join("models--amphion--MaskGCT")),
            ("facebook/w2v-bert-2.0", cache.join("models--facebook--w2v-bert-2.0")),
            (
                "nvidia/bigvgan_v2_22khz_80band_256x",
                cache.join("models--nvidia--bigvgan_v2_22khz_80band_256x"),
            ),
            ("funasr/campplus", cache.join("models--funasr--campplus")),
        ];
        let actual: Vec<_> = targets
            .iter()
            .map(|t| (t.repo_id.as_str(), t.local_dir.clone()))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn modelscope_bigvgan_keeps_nvidia_cache_name() {
        let dest = Path::new("checkpoints");
        let cache = dest.join("hf_cache");
        let targets = snapshot_targets(ModelSource::ModelScope, dest, &cache);

        assert_eq!(targets.len(), 5);
        let bigvgan = &targets[3];
        assert_eq!(bigvgan.repo_id, "nv-community/bigvgan_v2_22khz_80band_256x");
        assert_eq!(
            bigvgan.local_dir,
            cache.join("models--nvidia--bigvgan_v2_22khz_80band_256x")
        );
        assert_eq!(targets[0].local_dir, dest);
        assert_eq!(targets[4].repo_id, "funasr/campplus");
    }
}

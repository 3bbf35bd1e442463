use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Google Drive file holding the example wav archive.
pub const EXAMPLES_FILE_ID: &str = "1o_dCMzwjaA2azbGOxAE7-4E7NbJkgdgO";

pub const DEFAULT_MODELSCOPE_ENDPOINT: &str = "https://www.modelscope.cn";

pub const DEFAULT_HF_ENDPOINT: &str = "https://huggingface.co";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
	pub checkpoints_dir: PathBuf,
	pub hf_cache_dir: PathBuf,
	pub manifest_path: PathBuf,
	pub archive_path: PathBuf,
	pub examples_dir: PathBuf,
	pub examples_file_id: String,
	pub modelscope_endpoint: String,
	pub hf_endpoint: String,
	#[serde(skip_serializing)]
	pub hf_token: Option<String>,
}

impl Config {
	/// Lays out every output under `root`, using the fixed directory names.
	pub fn rooted_at(root: &Path) -> Self {
		let checkpoints_dir = root.join("checkpoints");
		let hf_cache_dir = checkpoints_dir.join("hf_cache");
		let manifest_path = checkpoints_dir.join("fetch-manifest.toml");

		Self {
			checkpoints_dir,
			hf_cache_dir,
			manifest_path,
			archive_path: root.join("example_wavs.zip"),
			examples_dir: root.join("examples"),
			examples_file_id: EXAMPLES_FILE_ID.to_string(),
			modelscope_endpoint: DEFAULT_MODELSCOPE_ENDPOINT.to_string(),
			hf_endpoint: DEFAULT_HF_ENDPOINT.to_string(),
			hf_token: None,
		}
	}

	pub fn from_env() -> crate::error::Result<Self> {
		let root = match std::env::var("CHECKPOINT_FETCH_ROOT") {
			Ok(root) if root.trim().is_empty() => {
				return Err(crate::error::Error::ConfigError(
					"CHECKPOINT_FETCH_ROOT is set but empty".to_string(),
				))
			}
			Ok(root) => PathBuf::from(root),
			Err(_) => PathBuf::new(),
		};

		let mut config = Self::rooted_at(&root);

		if let Ok(endpoint) = std::env::var("MODELSCOPE_ENDPOINT") {
			config.modelscope_endpoint = endpoint.trim_end_matches('/').to_string();
		}

		// also read by hf-hub itself for file downloads
		if let Ok(endpoint) = std::env::var("HF_ENDPOINT") {
			config.hf_endpoint = endpoint.trim_end_matches('/').to_string();
		}

		config.hf_token = std::env::var("HF_TOKEN").ok().filter(|t| !t.is_empty());

		Ok(config)
	}
}

impl Default for Config {
	fn default() -> Self {
		Self::rooted_at(Path::new(""))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_layout_matches_fixed_paths() {
		let config = Config::default();
		assert_eq!(config.checkpoints_dir, PathBuf::from("checkpoints"));
		assert_eq!(config.hf_cache_dir, PathBuf::from("checkpoints").join("hf_cache"));
		assert_eq!(config.archive_path, PathBuf::from("example_wavs.zip"));
		assert_eq!(config.examples_dir, PathBuf::from("examples"));
		assert_eq!(config.examples_file_id, EXAMPLES_FILE_ID);
	}

	#[test]
	fn rooted_layout_stays_under_root() {
		let root = Path::new("/tmp/fetch-root");
		let config = Config::rooted_at(root);
		for path in [
			&config.checkpoints_dir,
			&config.hf_cache_dir,
			&config.manifest_path,
			&config.archive_path,
			&config.examples_dir,
		] {
			assert!(path.starts_with(root), "{:?} escaped root", path);
		}
		assert!(config.manifest_path.starts_with(&config.checkpoints_dir));
	}
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("Invalid input: {0}")]
	InvalidInput(String),

	#[error("Download failed: {0}")]
	DownloadFailed(String),

	#[error("Hub error: {0}")]
	HubError(String),

	#[error("Archive error: {0}")]
	ArchiveError(String),

	#[error("Configuration error: {0}")]
	ConfigError(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),

	#[error("Serialization error: {0}")]
	SerializationError(String),
}

impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		Error::DownloadFailed(err.to_string())
	}
}

impl From<hf_hub::api::sync::ApiError> for Error {
	fn from(err: hf_hub::api::sync::ApiError) -> Self {
		Error::HubError(err.to_string())
	}
}

impl From<zip::result::ZipError> for Error {
	fn from(err: zip::result::ZipError) -> Self {
		Error::ArchiveError(err.to_string())
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::SerializationError(err.to_string())
	}
}

impl From<toml::de::Error> for Error {
	fn from(err: toml::de::Error) -> Self {
		Error::SerializationError(err.to_string())
	}
}

impl From<toml::ser::Error> for Error {
	fn from(err: toml::ser::Error) -> Self {
		Error::SerializationError(err.to_string())
	}
}

pub type Result<T> = std::result::Result<T, Error>;

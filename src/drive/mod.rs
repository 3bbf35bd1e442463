//! Google Drive downloads for publicly shared files.
//!
//! Large files get an antivirus interstitial instead of their bytes. The
//! endpoint then hands out a `download_warning*` cookie whose value must be
//! sent back as `confirm` on a second request.

pub mod http;

pub use http::HttpTransport;

use crate::error::{Error, Result};
use crate::stream;
use std::io::Read;
use std::path::Path;

pub const DOWNLOAD_URL: &str = "https://docs.google.com/uc?export=download";

const WARNING_COOKIE_PREFIX: &str = "download_warning";

pub struct DriveResponse {
    pub cookies: Vec<(String, String)>,
    pub body: Box<dyn Read>,
}

/// Issues one GET against [`DOWNLOAD_URL`] with the given query parameters.
pub trait DriveTransport {
    fn get(&self, params: &[(&str, &str)]) -> Result<DriveResponse>;
}

pub fn confirm_token(cookies: &[(String, String)]) -> Option<&str> {
    cookies
        .iter()
        .find(|(name, _)| name.starts_with(WARNING_COOKIE_PREFIX))
        .map(|(_, value)| value.as_str())
}

/// Downloads `file_id` into `destination`, returning the number of bytes written.
pub fn download_file(
    transport: &dyn DriveTransport,
    file_id: &str,
    destination: &Path,
) -> Result<u64> {
    if file_id.trim().is_empty() {
        return Err(Error::InvalidInput("Drive file id is empty".to_string()));
    }

    tracing::debug!("Requesting Drive file {}", file_id);
    let mut response = transport.get(&[("id", file_id)])?;

    if let Some(token) = confirm_token(&response.cookies).map(str::to_string) {
        tracing::info!("Drive asked for confirmation, retrying with token");
        response = transport.get(&[("id", file_id), ("confirm", token.as_str())])?;
    }

    let written = stream::save_reader(response.body, destination)?;
    tracing::info!("Wrote {} bytes to {:?}", written, destination);

    Ok(written)
}

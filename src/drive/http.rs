use super::{DriveResponse, DriveTransport, DOWNLOAD_URL};
use crate::error::Result;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, SET_COOKIE};

/// Blocking HTTP transport. The client keeps a cookie store so a confirmed
/// request replays the session cookies of the first one.
pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Self::with_url(DOWNLOAD_URL)
    }

    pub fn with_url(url: &str) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(concat!("checkpoint-fetch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

impl DriveTransport for HttpTransport {
    fn get(&self, params: &[(&str, &str)]) -> Result<DriveResponse> {
        let response = self
            .client
            .get(&self.url)
            .query(params)
            .send()?
            .error_for_status()?;

        let cookies = parse_set_cookies(response.headers());
        tracing::debug!("Drive responded {} with {} cookies", response.status(), cookies.len());

        Ok(DriveResponse {
            cookies,
            body: Box::new(response),
        })
    }
}

/// Extracts `(name, value)` pairs from every `Set-Cookie` header, ignoring
/// attributes such as `Path` or `Expires`.
pub fn parse_set_cookies(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|raw| {
            let pair = raw.split(';').next()?;
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().trim_matches('"').to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use httpmock::prelude::*;
    use reqwest::header::HeaderValue;
    use std::io::Read;

    fn transport_for(server: &MockServer) -> HttpTransport {
        HttpTransport::with_url(&format!("{}/uc?export=download", server.base_url())).unwrap()
    }

    #[test]
    fn warning_cookie_is_read_from_a_live_response() {
        let server = MockServer::start();
        let interstitial = server.mock(|when, then| {
            when.method(GET)
                .path("/uc")
                .query_param("export", "download")
                .query_param("id", "abc123");
            then.status(200)
                .header("set-cookie", "download_warning_0123=Xy7q; Path=/uc; HttpOnly")
                .body("<html>virus scan warning</html>");
        });

        let transport = transport_for(&server);
        let mut response = transport.get(&[("id", "abc123")]).unwrap();

        interstitial.assert_hits(1);
        assert_eq!(crate::drive::confirm_token(&response.cookies), Some("Xy7q"));
        let mut body = String::new();
        response.body.read_to_string(&mut body).unwrap();
        assert!(body.contains("virus scan"));
    }

    #[test]
    fn error_status_is_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/uc");
            then.status(404).body("Not Found");
        });

        let err = transport_for(&server)
            .get(&[("id", "missing")])
            .err()
            .expect("404 must fail");

        assert!(matches!(err, Error::DownloadFailed(_)));
    }

    #[test]
    fn set_cookie_headers_are_split_into_pairs() {
        let mut headers = HeaderMap::new();
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static(
                "download_warning_0123=AbCd; Domain=.docs.google.com; Path=/uc; Secure; HttpOnly",
            ),
        );
        headers.append(SET_COOKIE, HeaderValue::from_static("NID=511=xyz; expires=Sat"));
        headers.append(SET_COOKIE, HeaderValue::from_static("garbage"));

        let cookies = parse_set_cookies(&headers);

        assert_eq!(
            cookies,
            vec![
                ("download_warning_0123".to_string(), "AbCd".to_string()),
                ("NID".to_string(), "511=xyz".to_string()),
            ]
        );
        assert_eq!(crate::drive::confirm_token(&cookies), Some("AbCd"));
    }
}

//! Image bytes for analysis.
//!
//! [`DefaultFetcher`] resolves three kinds of source:
//!
//! - `data:` URIs, decoded in place (base64 or percent-encoded);
//! - local file paths (or `file://` URLs);
//! - `http(s)://` URLs, only when built with the `remote` feature and
//!   `fetch.remote = true`. Without it, remote sources are unavailable and
//!   the cover falls back to the default overlay.

use super::EnrichError;
use crate::config::FetchConfig;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::percent_decode_str;
use std::fs;
use std::path::Path;

pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, src: &str) -> Result<Vec<u8>, EnrichError>;
}

pub struct DefaultFetcher {
    config: FetchConfig,
    #[cfg(feature = "remote")]
    client: Option<reqwest::blocking::Client>,
}

impl DefaultFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            config: config.clone(),
            #[cfg(feature = "remote")]
            client: build_client(config),
        }
    }

    fn check_size(&self, len: u64, src: &str) -> Result<(), EnrichError> {
        if len > self.config.max_bytes {
            return Err(EnrichError::Fetch(format!(
                "{src}: {len} bytes exceeds the {} byte limit",
                self.config.max_bytes
            )));
        }
        Ok(())
    }

    fn fetch_file(&self, path: &Path) -> Result<Vec<u8>, EnrichError> {
        let len = fs::metadata(path)?.len();
        self.check_size(len, &path.display().to_string())?;
        Ok(fs::read(path)?)
    }

    #[cfg(feature = "remote")]
    fn fetch_remote(&self, url: &str) -> Result<Vec<u8>, EnrichError> {
        let client = match (&self.client, self.config.remote) {
            (Some(client), true) => client,
            _ => return Err(EnrichError::Unavailable("remote fetching is disabled".into())),
        };
        let response = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| EnrichError::Fetch(e.to_string()))?;
        if let Some(len) = response.content_length() {
            self.check_size(len, url)?;
        }
        let bytes = response.bytes().map_err(|e| EnrichError::Fetch(e.to_string()))?;
        self.check_size(bytes.len() as u64, url)?;
        Ok(bytes.to_vec())
    }

    #[cfg(not(feature = "remote"))]
    fn fetch_remote(&self, url: &str) -> Result<Vec<u8>, EnrichError> {
        Err(EnrichError::Unavailable(format!(
            "{url}: built without the `remote` feature"
        )))
    }
}

#[cfg(feature = "remote")]
fn build_client(config: &FetchConfig) -> Option<reqwest::blocking::Client> {
    if !config.remote {
        return None;
    }
    match reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_secs))
        .user_agent(concat!("travel-book/", env!("CARGO_PKG_VERSION")))
        .build()
    {
        Ok(client) => Some(client),
        Err(err) => {
            log::warn!("HTTP client unavailable, remote covers will not be analyzed: {err}");
            None
        }
    }
}

impl ImageFetcher for DefaultFetcher {
    fn fetch(&self, src: &str) -> Result<Vec<u8>, EnrichError> {
        let src = src.trim();
        let lower = src.to_ascii_lowercase();
        if lower.starts_with("data:") {
            let bytes = decode_data_uri(src)?;
            self.check_size(bytes.len() as u64, "data URI")?;
            return Ok(bytes);
        }
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return self.fetch_remote(src);
        }
        if let Some(rest) = src.strip_prefix("//") {
            return self.fetch_remote(&format!("https://{rest}"));
        }
        let path = src.strip_prefix("file://").unwrap_or(src);
        self.fetch_file(Path::new(path))
    }
}

/// Payload of a `data:[<mime>][;base64],<data>` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, EnrichError> {
    let rest = uri
        .get(5..)
        .ok_or_else(|| EnrichError::Decode("truncated data URI".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| EnrichError::Decode("data URI without a comma".into()))?;
    if meta.to_ascii_lowercase().ends_with(";base64") {
        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        STANDARD
            .decode(compact)
            .map_err(|e| EnrichError::Decode(format!("data URI: {e}")))
    } else {
        Ok(percent_decode_str(payload).collect())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned bytes and records every request.
    #[derive(Default)]
    pub struct MockFetcher {
        pub responses: HashMap<String, Vec<u8>>,
        pub requests: Mutex<Vec<String>>,
    }

    impl MockFetcher {
        pub fn with(src: &str, bytes: Vec<u8>) -> Self {
            Self {
                responses: HashMap::from([(src.to_string(), bytes)]),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn get_requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl ImageFetcher for MockFetcher {
        fn fetch(&self, src: &str) -> Result<Vec<u8>, EnrichError> {
            self.requests.lock().unwrap().push(src.to_string());
            self.responses
                .get(src)
                .cloned()
                .ok_or_else(|| EnrichError::Fetch(format!("no mock response for {src}")))
        }
    }

    fn fetcher() -> DefaultFetcher {
        DefaultFetcher::new(&FetchConfig::default())
    }

    #[test]
    fn base64_data_uri() {
        let bytes = fetcher().fetch("data:image/png;base64,aGVs bG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn percent_encoded_data_uri() {
        assert_eq!(decode_data_uri("data:text/plain,a%20b").unwrap(), b"a b");
    }

    #[test]
    fn malformed_data_uri() {
        assert!(matches!(decode_data_uri("data:image/png;base64"), Err(EnrichError::Decode(_))));
        assert!(matches!(decode_data_uri("data:;base64,!!!"), Err(EnrichError::Decode(_))));
    }

    #[test]
    fn local_files_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.jpg");
        fs::write(&path, b"jpeg bytes").unwrap();

        let f = fetcher();
        assert_eq!(f.fetch(path.to_str().unwrap()).unwrap(), b"jpeg bytes");
        let url = format!("file://{}", path.display());
        assert_eq!(f.fetch(&url).unwrap(), b"jpeg bytes");
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(fetcher().fetch("/definitely/not/here.jpg"), Err(EnrichError::Io(_))));
    }

    #[test]
    fn size_limit_applies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.jpg");
        fs::write(&path, vec![0u8; 64]).unwrap();
        let f = DefaultFetcher::new(&FetchConfig {
            max_bytes: 16,
            ..FetchConfig::default()
        });
        assert!(matches!(f.fetch(path.to_str().unwrap()), Err(EnrichError::Fetch(_))));
    }

    #[test]
    fn remote_disabled_is_unavailable() {
        let f = DefaultFetcher::new(&FetchConfig {
            remote: false,
            ..FetchConfig::default()
        });
        assert!(matches!(f.fetch("https://example.com/a.jpg"), Err(EnrichError::Unavailable(_))));
    }
}

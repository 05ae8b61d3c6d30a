//! Runtime configuration assembled in `main`.
//!
//! Nothing below the entry point reads the environment: the default fetch URL
//! (`GET_API_URL`) is resolved once and handed down inside [`FetchConfig`].

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Environment variable supplying the default fetch URL.
pub const URL_ENV: &str = "GET_API_URL";

pub const DEFAULT_FETCH_DIR: &str = "./data/get/";
pub const DEFAULT_CONVERT_DIR: &str = "./data/convert_data/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Directory layout shared by both operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub fetch_dir: PathBuf,
    pub convert_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fetch_dir: PathBuf::from(DEFAULT_FETCH_DIR),
            convert_dir: PathBuf::from(DEFAULT_CONVERT_DIR),
        }
    }
}

/// Everything the fetcher needs for one GET.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub url: Url,
    pub headers: HeaderMap,
    pub timeout: Duration,
}

impl FetchConfig {
    /// Validate `raw_url` (http/https only) and header pairs.
    pub fn new(
        raw_url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<Self, crate::morph::FetchError> {
        use crate::morph::FetchError;

        let trimmed = raw_url.trim();
        let url = Url::parse(trimmed).map_err(|e| FetchError::InvalidUrl {
            url: trimmed.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl {
                url: trimmed.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let mut map = HeaderMap::new();
        for (k, v) in headers {
            let name = HeaderName::from_bytes(k.trim().as_bytes()).map_err(|_| {
                FetchError::InvalidHeader {
                    header: k.clone(),
                    reason: "invalid header name".into(),
                }
            })?;
            let value = HeaderValue::from_str(v.trim()).map_err(|_| FetchError::InvalidHeader {
                header: k.clone(),
                reason: "invalid header value".into(),
            })?;
            map.append(name, value);
        }

        Ok(Self {
            url,
            headers: map,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morph::FetchError;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn accepts_http_and_headers() {
        let cfg = FetchConfig::new(
            " https://api.example.com/items ",
            &[
                ("Authorization".into(), "Bearer t".into()),
                ("X-Trace".into(), "1".into()),
            ],
            secs(5),
        )
        .unwrap();
        assert_eq!(cfg.url.as_str(), "https://api.example.com/items");
        assert_eq!(cfg.headers.get("authorization").unwrap(), "Bearer t");
        assert_eq!(cfg.headers.len(), 2);
        assert_eq!(cfg.timeout, secs(5));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = FetchConfig::new("ftp://example.com/x", &[], secs(1)).unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn rejects_garbage_url() {
        let err = FetchConfig::new("not a url", &[], secs(1)).unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[test]
    fn rejects_bad_header_name() {
        let err = FetchConfig::new("http://x.test", &[("bad header".into(), "v".into())], secs(1))
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidHeader { .. }));
    }

    #[test]
    fn default_layout_matches_data_dirs() {
        let s = Settings::default();
        assert_eq!(s.fetch_dir, PathBuf::from("./data/get/"));
        assert_eq!(s.convert_dir, PathBuf::from("./data/convert_data/"));
    }
}

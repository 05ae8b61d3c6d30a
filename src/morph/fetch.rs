//! Single GET + save.
//!
//! Exactly one request, no retry. Status 200 is the only success; any other
//! status is `FetchError::Status`, any reqwest send failure is
//! `FetchError::Transport`. Nothing is written unless the body parsed as JSON.

use reqwest::StatusCode;
use serde_json::Value;
use std::path::PathBuf;

use super::store::{Store, StoreError};
use crate::config::FetchConfig;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to retrieve data. Status code: {status}")]
    Status { status: u16 },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("response body is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to save dataset: {0}")]
    Store(#[from] StoreError),
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid header '{header}': {reason}")]
    InvalidHeader { header: String, reason: String },
    #[error("failed to start HTTP runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl FetchError {
    /// Short label for JSON output / logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Status { .. } => "status",
            FetchError::Transport { .. } => "transport",
            FetchError::Decode(_) => "decode",
            FetchError::Store(_) => "store",
            FetchError::InvalidUrl { .. } => "invalid_url",
            FetchError::InvalidHeader { .. } => "invalid_header",
            FetchError::Runtime(_) => "runtime",
        }
    }
}

/// Outcome of a successful fetch.
#[derive(Debug)]
pub struct Fetched {
    pub path: PathBuf,
    pub data: Value,
    pub elapsed_ms: u128,
}

/// HTTP client bound to one [`FetchConfig`].
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Transport {
                url: config.url.to_string(),
                source: e,
            })?;
        Ok(Self { client, config })
    }

    /// Issue the GET and parse the body. No side effects.
    pub async fn fetch_json(&self) -> Result<Value, FetchError> {
        let url = self.config.url.as_str();
        crate::log_debug!("GET {url} ({} header(s))", self.config.headers.len());

        let response = self
            .client
            .get(self.config.url.clone())
            .headers(self.config.headers.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        crate::log_debug!("{url} -> {status}");
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(FetchError::Decode)
    }

    /// Fetch and persist as `<fetch_dir>/<name>.json`.
    pub async fn fetch_and_save(&self, store: &Store, name: &str) -> Result<Fetched, FetchError> {
        let started = std::time::Instant::now();
        let data = self.fetch_json().await?;
        let path = store.save_dataset(name, &data)?;
        crate::log_info!("saved {} ({})", name, path.display());
        Ok(Fetched {
            path,
            data,
            elapsed_ms: started.elapsed().as_millis(),
        })
    }
}

/// Blocking wrapper: builds a Tokio runtime for the duration of the call.
pub fn fetch_and_save(
    config: FetchConfig,
    store: &Store,
    name: &str,
) -> Result<Fetched, FetchError> {
    let rt = tokio::runtime::Runtime::new().map_err(FetchError::Runtime)?;
    let fetcher = Fetcher::new(config)?;
    rt.block_on(fetcher.fetch_and_save(store, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(&Settings {
            fetch_dir: dir.path().join("get"),
            convert_dir: dir.path().join("convert"),
        });
        (dir, store)
    }

    fn fetcher(url: &str, headers: &[(String, String)]) -> Fetcher {
        Fetcher::new(FetchConfig::new(url, headers, Duration::from_secs(5)).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn ok_response_is_saved_verbatim() {
        let server = MockServer::start().await;
        let body = json!([{"id": 1, "user": {"name": "a"}}, {"id": 2}]);
        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let (_dir, store) = temp_store();
        let f = fetcher(&format!("{}/items", server.uri()), &[]);
        let fetched = f.fetch_and_save(&store, "items").await.unwrap();

        assert_eq!(fetched.data, body);
        assert_eq!(fetched.path, store.dataset_path("items"));
        assert_eq!(store.load_dataset("items").unwrap(), body);
    }

    #[tokio::test]
    async fn not_found_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let (_dir, store) = temp_store();
        let err = fetcher(&server.uri(), &[])
            .fetch_and_save(&store, "missing")
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 404 }));
        assert_eq!(err.to_string(), "Failed to retrieve data. Status code: 404");
        assert!(!store.dataset_path("missing").exists());
        assert!(!store.fetch_dir().exists());
    }

    #[tokio::test]
    async fn other_success_codes_are_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
            .mount(&server)
            .await;

        let err = fetcher(&server.uri(), &[]).fetch_json().await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 201 }));
        assert_eq!(err.kind(), "status");
    }

    #[tokio::test]
    async fn headers_are_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer secret"))
            .and(header("x-client", "json-morph"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let headers = vec![
            ("Authorization".to_string(), "Bearer secret".to_string()),
            ("X-Client".to_string(), "json-morph".to_string()),
        ];
        let value = fetcher(&server.uri(), &headers).fetch_json().await.unwrap();
        assert_eq!(value, json!({"ok": true}));
    }

    #[tokio::test]
    async fn non_json_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let (_dir, store) = temp_store();
        let err = fetcher(&server.uri(), &[])
            .fetch_and_save(&store, "page")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        assert!(!store.dataset_path("page").exists());
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let port = {
            let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let err = fetcher(&format!("http://127.0.0.1:{port}/"), &[])
            .fetch_json()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(err.kind(), "transport");
    }

    #[test]
    fn blocking_wrapper_saves_dataset() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = rt.block_on(MockServer::start());
        rt.block_on(
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
                .mount(&server),
        );

        let (_dir, store) = temp_store();
        let cfg = FetchConfig::new(&server.uri(), &[], Duration::from_secs(5)).unwrap();
        let fetched = fetch_and_save(cfg, &store, "nums").unwrap();
        assert_eq!(fetched.data, json!([1, 2]));
        assert_eq!(store.load_dataset("nums").unwrap(), json!([1, 2]));
    }
}

/*!
`get.rs`

Implements the `get` subcommand: one GET against the configured URL, body
saved as `<fetch-dir>/<name>.json`.

URL handling:
  - `--url/-u` if supplied
  - otherwise the `GET_API_URL` value resolved in `main`
  - neither -> error, exit code 1

Headers: `-H/--headers`, repeatable; a literal mapping or KEY=VALUE pairs.

JSON output (success):
{
  "status":"ok",
  "operation":"get",
  "dataset":"users",
  "url":"https://...",
  "path":"./data/get/users.json",
  "elapsed_ms": 120,
  "items": 30          // array length, null for non-array bodies
}

JSON output (failure):
{ "status":"error", "kind":"status", "error":"Failed to retrieve data. Status code: 404" }

Every failure in this command ends the process with exit code 1.
*/

use anyhow::{Context, Result, anyhow};
use clap::Args;
use std::io;
use std::time::Duration;

use crate::cmd::shared::{Reporter, parse_headers, prompt_output, resolve_data_name};
use crate::config::{DEFAULT_TIMEOUT_SECS, FetchConfig, Settings, URL_ENV};
use crate::morph::{self, FetchError, Fetched, Store};

/// CLI arguments for `json-morph get`
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Name of the data; used for saving and identifying it (prompted if omitted)
    #[arg(short = 'n', long = "data-name", alias = "data_name", value_name = "NAME")]
    pub data_name: Option<String>,

    /// API URL to fetch (falls back to the GET_API_URL environment variable)
    #[arg(short = 'u', long, value_name = "URL")]
    pub url: Option<String>,

    /// HTTP headers: a mapping like '{"Accept": "application/json"}' or KEY=VALUE (repeatable)
    #[arg(short = 'H', long = "headers", alias = "header", value_name = "HEADERS")]
    pub headers: Vec<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

/// Entrypoint for `get`. Failures are reported here and returned so `main`
/// can exit with code 1.
pub fn execute_get(args: GetArgs, settings: &Settings, reporter: &Reporter) -> Result<()> {
    match run_get(&args, settings, reporter.json) {
        Ok((name, url, fetched)) => {
            let items = fetched.data.as_array().map(|a| a.len());
            reporter.ok(
                &format!("Data saved successfully as {name}.json"),
                serde_json::json!({
                    "operation": "get",
                    "dataset": name,
                    "url": url,
                    "path": fetched.path.display().to_string(),
                    "elapsed_ms": fetched.elapsed_ms,
                    "items": items,
                }),
            );
            let count = items
                .map(|n| format!("{n} item(s)"))
                .unwrap_or_else(|| "not a list".to_string());
            reporter.note(&format!(
                "{} • {} • {} ms",
                fetched.path.display(),
                count,
                fetched.elapsed_ms
            ));
            Ok(())
        }
        Err(e) => {
            let kind = e
                .downcast_ref::<FetchError>()
                .map(FetchError::kind)
                .unwrap_or("usage");
            let title = match kind {
                "status" => "An error occurred",
                _ => "Error",
            };
            reporter.error(title, &format!("{e:#}"), kind);
            Err(e)
        }
    }
}

fn run_get(args: &GetArgs, settings: &Settings, json: bool) -> Result<(String, String, Fetched)> {
    let stdin = io::stdin();
    let name = resolve_data_name(
        args.data_name.as_deref(),
        "Please give the name of the data: ",
        &mut stdin.lock(),
        &mut prompt_output(json),
    )?;

    let url = args
        .url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| anyhow!("no URL given (use --url or set {URL_ENV})"))?;

    let headers = parse_headers(&args.headers).context("Failed to parse --headers")?;
    let config = FetchConfig::new(url, &headers, Duration::from_secs(args.timeout))?;
    crate::log_info!(
        "fetching {} as '{}' ({} header(s), timeout {}s)",
        config.url,
        name,
        headers.len(),
        args.timeout
    );

    let url = config.url.to_string();
    let store = Store::new(settings);
    crate::log_debug!("datasets are stored in {}", store.fetch_dir().display());
    let fetched = morph::fetch_and_save(config, &store, &name)?;
    Ok((name, url, fetched))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(url: Option<&str>) -> GetArgs {
        GetArgs {
            data_name: Some("ds".into()),
            url: url.map(String::from),
            headers: vec![],
            timeout: 1,
        }
    }

    fn settings(dir: &tempfile::TempDir) -> Settings {
        Settings {
            fetch_dir: dir.path().join("get"),
            convert_dir: dir.path().join("convert"),
        }
    }

    #[test]
    fn missing_url_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_get(&args(None), &settings(&dir), false).unwrap_err();
        assert!(err.to_string().contains("GET_API_URL"));
    }

    #[test]
    fn invalid_url_fails_before_request() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_get(&args(Some("file:///etc/passwd")), &settings(&dir), false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FetchError>(),
            Some(FetchError::InvalidUrl { .. })
        ));
        assert!(!dir.path().join("get").exists());
    }

    #[test]
    fn bad_header_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(Some("http://127.0.0.1:9/"));
        a.headers = vec!["no-separator".into()];
        let err = run_get(&a, &settings(&dir), false).unwrap_err();
        assert!(format!("{err:#}").contains("--headers"));
    }
}

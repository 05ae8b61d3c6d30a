//! On-disk layout: fetched datasets and converted items.
//!
//!   <fetch_dir>/<dataset>.json     raw body of a successful GET
//!   <convert_dir>/<item>.json      one converted item per dataset element
//!
//! Writes are whole-file overwrites. Directories are created on first write.

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Settings;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: invalid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True when the underlying cause is a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// File-backed storage rooted at the configured fetch / convert directories.
#[derive(Debug, Clone)]
pub struct Store {
    fetch_dir: PathBuf,
    convert_dir: PathBuf,
}

impl Store {
    pub fn new(settings: &Settings) -> Self {
        Self {
            fetch_dir: settings.fetch_dir.clone(),
            convert_dir: settings.convert_dir.clone(),
        }
    }

    pub fn fetch_dir(&self) -> &Path {
        &self.fetch_dir
    }

    pub fn convert_dir(&self) -> &Path {
        &self.convert_dir
    }

    pub fn dataset_path(&self, name: &str) -> PathBuf {
        self.fetch_dir.join(format!("{name}.json"))
    }

    pub fn converted_path(&self, stem: &str) -> PathBuf {
        self.convert_dir.join(format!("{stem}.json"))
    }

    /// Persist a dataset under `<fetch_dir>/<name>.json`.
    pub fn save_dataset(&self, name: &str, data: &Value) -> Result<PathBuf, StoreError> {
        let path = self.dataset_path(name);
        write_json(&path, data, false)?;
        Ok(path)
    }

    pub fn load_dataset(&self, name: &str) -> Result<Value, StoreError> {
        let path = self.dataset_path(name);
        let raw = fs::read(&path).map_err(|e| StoreError::io(&path, e))?;
        serde_json::from_slice(&raw).map_err(|source| StoreError::Json { path, source })
    }

    /// Write one converted item under `<convert_dir>/<stem>.json`.
    pub fn write_converted<T: Serialize>(
        &self,
        stem: &str,
        item: &T,
        pretty: bool,
    ) -> Result<PathBuf, StoreError> {
        let path = self.converted_path(stem);
        write_json(&path, item, pretty)?;
        Ok(path)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    let bytes = if pretty {
        serde_json::to_vec_pretty(value)
    } else {
        serde_json::to_vec(value)
    }
    .map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, bytes).map_err(|e| StoreError::io(path, e))
}

//! Mapping definitions: output field name -> dotted input path.
//!
//! Loaded from JSON (default) or YAML (`.yaml` / `.yml`). Entry order follows
//! the file so converted items list fields in the same order.

use serde_json::Value;
use std::path::{Path, PathBuf};

/// Default mapping file looked up when `--mapping-filename` is not given.
pub const DEFAULT_MAPPING_FILE: &str = "./mapping.json";

#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("Mapping file ({}) not found.", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read mapping file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse mapping file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    #[error("mapping root must be an object of output-field -> dotted path")]
    NotAnObject,
    #[error("mapping entry '{field}' must be a dotted path string, got {found}")]
    NonStringPath { field: String, found: &'static str },
}

/// A single `output field <- dotted path` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub output: String,
    pub path: String,
}

/// Ordered set of field rules. Output names are unique (they come from a JSON
/// object's keys).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingDefinition {
    entries: Vec<FieldMapping>,
}

impl MappingDefinition {
    /// Build from a parsed JSON value; the root must be an object of strings.
    pub fn from_value(value: &Value) -> Result<Self, MappingError> {
        let obj = value.as_object().ok_or(MappingError::NotAnObject)?;
        let mut entries = Vec::with_capacity(obj.len());
        for (field, path) in obj {
            let Some(path) = path.as_str() else {
                return Err(MappingError::NonStringPath {
                    field: field.clone(),
                    found: json_type_name(path),
                });
            };
            entries.push(FieldMapping {
                output: field.clone(),
                path: path.to_string(),
            });
        }
        Ok(Self { entries })
    }

    /// Parse mapping text. `yaml` selects the YAML parser; JSON otherwise.
    pub fn parse(raw: &str, yaml: bool, origin: &Path) -> Result<Self, MappingError> {
        let value: Value = if yaml {
            serde_yaml::from_str(raw).map_err(|e| MappingError::Parse {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            serde_json::from_str(raw).map_err(|e| MappingError::Parse {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?
        };
        Self::from_value(&value)
    }

    /// Load a mapping file, checking existence first so a missing file is
    /// reported as `NotFound` rather than a raw IO error.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        if !path.exists() {
            return Err(MappingError::NotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw, is_yaml_path(path), path)
    }

    pub fn entries(&self) -> &[FieldMapping] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

/// Short JSON type label used in diagnostics.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

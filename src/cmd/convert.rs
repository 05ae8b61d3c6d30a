/*!
`convert.rs`

Implements the `convert` subcommand: load `<fetch-dir>/<name>.json`, apply the
mapping file to every element, write one `<convert-dir>/<item>.json` each.

Outcomes:
  - mapping file missing / invalid   -> message, exit 0, nothing written
  - dataset missing / unreadable     -> message, exit 0, nothing written
  - dataset not a list               -> format-mismatch message, exit 0,
                                        convert dir untouched
  - write or stdin failure mid-run   -> message, exit 1

JSON output (success):
{
  "status":"ok",
  "operation":"convert",
  "dataset":"users",
  "mapping":"./mapping.json",
  "naming":"index",
  "count":2,
  "items":[ {"index":0,"name":"users_1","path":"...","resolved":3,"fields":4}, ... ]
}
*/

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::cmd::format::table;
use crate::cmd::naming::{ItemNamer, NamingStrategy};
use crate::cmd::shared::{Reporter, prompt_output, resolve_data_name};
use crate::config::Settings;
use crate::morph::{
    DEFAULT_MAPPING_FILE, MappingDefinition, MappingError, RemapError, Store, StoreError,
    remap_collection, resolve,
};

/// CLI arguments for `json-morph convert`
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Name of the fetched data to convert (prompted if omitted)
    #[arg(short = 'n', long = "data-name", alias = "data_name", value_name = "NAME")]
    pub data_name: Option<String>,

    /// Mapping file: JSON (or YAML) object of output field -> dotted input path
    #[arg(
        long = "mapping-filename",
        alias = "mapping_filename",
        value_name = "PATH",
        default_value = DEFAULT_MAPPING_FILE
    )]
    pub mapping_filename: PathBuf,

    /// How each converted item's file is named
    #[arg(long, value_enum, default_value_t = NamingStrategy::Index)]
    pub naming: NamingStrategy,

    /// Dotted path in each source element used as the file name (--naming field)
    #[arg(long, value_name = "PATH", required_if_eq("naming", "field"))]
    pub name_field: Option<String>,

    /// Pretty-print converted files
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error("failed to load dataset '{name}': {source}")]
    Dataset {
        name: String,
        #[source]
        source: StoreError,
    },
    #[error(transparent)]
    Format(#[from] RemapError),
    #[error("failed to write converted item: {0}")]
    Write(#[source] StoreError),
    #[error("failed to name item {index}: {message}")]
    Naming { index: usize, message: String },
}

impl ConvertError {
    /// Errors that abort mid-run (after writes may have happened).
    pub fn is_fatal(&self) -> bool {
        matches!(self, ConvertError::Write(_) | ConvertError::Naming { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::Mapping(MappingError::NotFound(_)) => "mapping_not_found",
            ConvertError::Mapping(_) => "mapping",
            ConvertError::Dataset { .. } => "dataset",
            ConvertError::Format(_) => "format_mismatch",
            ConvertError::Write(_) => "write",
            ConvertError::Naming { .. } => "naming",
        }
    }
}

/// One file written by a conversion run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WrittenItem {
    pub index: usize,
    pub name: String,
    pub path: PathBuf,
    /// Mapping entries whose path resolved (stored nulls included).
    pub resolved: usize,
    pub fields: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvertReport {
    pub dataset: String,
    pub mapping: PathBuf,
    pub naming: String,
    pub count: usize,
    pub items: Vec<WrittenItem>,
}

/// Entrypoint for `convert`.
///
/// Returns `Err` only for failures that should change the exit code.
pub fn execute_convert(args: ConvertArgs, settings: &Settings, reporter: &Reporter) -> Result<()> {
    let stdin = io::stdin();
    let name_result = resolve_data_name(
        args.data_name.as_deref(),
        "Please give the name of the data: ",
        &mut stdin.lock(),
        &mut prompt_output(reporter.json),
    );
    let name = match name_result {
        Ok(n) => n,
        Err(e) => {
            reporter.error("Convert skipped", &format!("{e:#}"), "usage");
            return Ok(());
        }
    };

    let store = Store::new(settings);
    let namer = ItemNamer::new(
        args.naming,
        &name,
        args.name_field.clone(),
        stdin.lock(),
        prompt_output(reporter.json),
    );

    match convert_dataset(&store, &name, &args.mapping_filename, namer, args.pretty) {
        Ok(report) => {
            if !reporter.json {
                print_summary(&report, reporter);
            }
            let mut payload = serde_json::to_value(&report)?;
            if let serde_json::Value::Object(ref mut m) = payload {
                m.insert("operation".into(), "convert".into());
            }
            reporter.ok(&format!("Conversion for {name} done!"), payload);
            Ok(())
        }
        Err(e) => {
            let title = if e.is_fatal() {
                "Convert failed"
            } else {
                "Convert skipped"
            };
            reporter.error(title, &e.to_string(), e.kind());
            if let ConvertError::Dataset { source, .. } = &e
                && source.is_not_found()
            {
                reporter.note(&format!("run `json-morph get -n {name}` first"));
            }
            if e.is_fatal() { Err(e.into()) } else { Ok(()) }
        }
    }
}

/// Load, remap and write. Nothing is written unless the mapping and the
/// dataset both load and the dataset is a list.
pub fn convert_dataset<R: BufRead, W: Write>(
    store: &Store,
    name: &str,
    mapping_path: &Path,
    mut namer: ItemNamer<R, W>,
    pretty: bool,
) -> Result<ConvertReport, ConvertError> {
    let mapping = MappingDefinition::load(mapping_path)?;
    if mapping.is_empty() {
        crate::log_warn!("{} has no fields; items will be empty objects", mapping_path.display());
    }
    crate::log_debug!(
        "mapping {} with {} field(s)",
        mapping_path.display(),
        mapping.len()
    );

    let dataset = store
        .load_dataset(name)
        .map_err(|source| ConvertError::Dataset {
            name: name.to_string(),
            source,
        })?;
    let converted = remap_collection(&dataset, &mapping)?;
    crate::log_info!(
        "converting {} item(s) from '{}' into {}",
        converted.len(),
        name,
        store.convert_dir().display()
    );

    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(converted.len());
    for item in converted {
        let resolved = mapping
            .entries()
            .iter()
            .filter(|e| {
                let hit = resolve(item.source, &e.path).is_some();
                if !hit {
                    crate::log_trace!("item {}: '{}' did not resolve", item.index + 1, e.path);
                }
                hit
            })
            .count();

        let stem = namer
            .name_for(item.index, item.source)
            .map_err(|e| ConvertError::Naming {
                index: item.index + 1,
                message: format!("{e:#}"),
            })?;
        if !seen.insert(stem.clone()) {
            crate::log_warn!("'{stem}.json' written more than once; earlier item overwritten");
        }

        let path = store
            .write_converted(&stem, &item.fields, pretty)
            .map_err(ConvertError::Write)?;
        crate::log_debug!("wrote {}", path.display());
        items.push(WrittenItem {
            index: item.index,
            name: stem,
            path,
            resolved,
            fields: mapping.len(),
        });
    }

    Ok(ConvertReport {
        dataset: name.to_string(),
        mapping: mapping_path.to_path_buf(),
        naming: namer.strategy().to_string(),
        count: items.len(),
        items,
    })
}

fn print_summary(report: &ConvertReport, reporter: &Reporter) {
    if report.items.is_empty() {
        reporter.note("dataset is an empty list; nothing written");
        return;
    }
    let rows: Vec<Vec<String>> = report
        .items
        .iter()
        .map(|i| {
            vec![
                (i.index + 1).to_string(),
                format!("{}.json", i.name),
                format!("{}/{}", i.resolved, i.fields),
            ]
        })
        .collect();
    println!("{}", table(&["#", "FILE", "RESOLVED"], &rows, &reporter.style));
}

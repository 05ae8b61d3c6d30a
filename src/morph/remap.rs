//! Mapping-driven projection of dataset items.

use serde_json::{Map, Value};

use super::mapping::{MappingDefinition, json_type_name};
use super::path::resolve_or_null;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RemapError {
    /// The dataset root is not a JSON array.
    #[error("Data is not in the expected format. It should be a list of items. (found {found})")]
    FormatMismatch { found: &'static str },
}

/// One converted element together with the source it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedItem<'a> {
    /// 0-based position in the dataset array.
    pub index: usize,
    pub source: &'a Value,
    pub fields: Map<String, Value>,
}

/// Apply every mapping entry to one source element.
///
/// Unresolved paths become `null`. Fields appear in mapping order.
pub fn convert_item(item: &Value, mapping: &MappingDefinition) -> Map<String, Value> {
    let mut out = Map::with_capacity(mapping.len());
    for entry in mapping.entries() {
        out.insert(entry.output.clone(), resolve_or_null(item, &entry.path));
    }
    out
}

/// Convert every element of `dataset`, which must be an array.
///
/// A non-array dataset is rejected as a whole; nothing is converted.
pub fn remap_collection<'a>(
    dataset: &'a Value,
    mapping: &MappingDefinition,
) -> Result<Vec<ConvertedItem<'a>>, RemapError> {
    let Some(items) = dataset.as_array() else {
        return Err(RemapError::FormatMismatch {
            found: json_type_name(dataset),
        });
    };
    Ok(items
        .iter()
        .enumerate()
        .map(|(index, source)| ConvertedItem {
            index,
            source,
            fields: convert_item(source, mapping),
        })
        .collect())
}

//! Core of json-morph: fetch a dataset, reshape its items.
//!
//!   fetch   -> Fetcher / fetch_and_save (single GET, 200 only)
//!   store   -> Store (fetch_dir / convert_dir layout)
//!   mapping -> MappingDefinition (output field -> dotted path)
//!   path    -> resolve (dotted lookup, never fails)
//!   remap   -> convert_item / remap_collection
//!
//! Command modules under `cmd/` drive these; nothing here prints or prompts.

pub mod fetch;
pub mod mapping;
pub mod path;
pub mod remap;
pub mod store;

pub use fetch::{FetchError, Fetched, fetch_and_save};
pub use mapping::{DEFAULT_MAPPING_FILE, MappingDefinition, MappingError};
pub use path::resolve;
pub use remap::{RemapError, remap_collection};
pub use store::{Store, StoreError};

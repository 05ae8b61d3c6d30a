/*!
Command dispatcher module.

Layout:
  src/cmd/
    mod.rs       (this file: declarations + re-exports)
    get.rs       (GetArgs + execute_get)
    convert.rs   (ConvertArgs + execute_convert)
    naming.rs    (NamingStrategy + ItemNamer for converted files)
    shared.rs    (header parsing, prompts, Reporter)
    format.rs    (colors, boxes, tables)

Conventions:
  - Each subcommand exposes one `execute_*` function returning
    `anyhow::Result<()>`; `Err` means "exit with code 1".
  - Argument structs derive `clap::Args`.
  - Core logic lives in `crate::morph`; modules here only parse, prompt and
    print.
*/

pub mod convert;
pub mod format;
pub mod get;
pub mod naming;
pub mod shared;

pub use convert::{ConvertArgs, execute_convert};
pub use get::{GetArgs, execute_get};

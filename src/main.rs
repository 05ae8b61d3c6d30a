use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;
mod config;
mod morph;
mod utils;

use cmd::shared::Reporter;
use cmd::{ConvertArgs, GetArgs};
use config::{DEFAULT_CONVERT_DIR, DEFAULT_FETCH_DIR, Settings, URL_ENV};

/// json-morph - fetch a JSON dataset and reshape its items
///
/// Commands:
///   json-morph get     -n <name> [-u <url>] [-H <headers>]
///   json-morph convert -n <name> [--mapping-filename <path>] [--naming index|field|prompt]
///
/// Files:
///   get      writes <fetch-dir>/<name>.json           (default ./data/get/)
///   convert  reads  <fetch-dir>/<name>.json and the mapping file,
///            writes <convert-dir>/<item>.json per list element
///            (default ./data/convert_data/)
///
/// Global flags / env:
///   -v / -vv        Increase verbosity (logs on stderr)
///   -q / --quiet    Errors only, no banner
///   --json          Machine-readable results on stdout
///   GET_API_URL     Default URL for `get` when -u is not given (also read from .env)
///
/// Examples:
///   json-morph get -n users -u https://jsonplaceholder.typicode.com/users
///   json-morph get -n users -H '{"Authorization": "Bearer TOKEN"}'
///   json-morph convert -n users --mapping-filename ./mapping.json
///   json-morph convert -n users --naming field --name-field id
#[derive(Parser, Debug)]
#[command(
    name = "json-morph",
    version,
    about = "Fetch a JSON dataset over HTTP and reshape its items with a dotted-path mapping",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Do not print the startup banner
    #[arg(long, global = true)]
    no_banner: bool,

    /// Directory for fetched datasets
    #[arg(long, global = true, value_name = "DIR", default_value = DEFAULT_FETCH_DIR)]
    fetch_dir: PathBuf,

    /// Directory for converted items
    #[arg(long, global = true, value_name = "DIR", default_value = DEFAULT_CONVERT_DIR)]
    convert_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch data from the API and save it under a name
    Get(GetArgs),

    /// Convert a saved list with a mapping file, one output file per item
    Convert(ConvertArgs),
}

fn main() {
    let cli = Cli::parse();

    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    let settings = Settings {
        fetch_dir: cli.fetch_dir.clone(),
        convert_dir: cli.convert_dir.clone(),
    };
    let reporter = Reporter::new(cli.json);

    if !(cli.quiet || cli.json || cli.no_banner) {
        println!("{}", cmd::format::banner(&reporter.style));
    }

    // Default fetch URL for `get`; a `.env` file may supply it.
    dotenvy::dotenv().ok();
    let default_url = std::env::var(URL_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty());

    let result = match cli.command {
        Commands::Get(mut args) => {
            if args.url.is_none() {
                args.url = default_url;
            }
            cmd::execute_get(args, &settings, &reporter)
        }
        Commands::Convert(args) => cmd::execute_convert(args, &settings, &reporter),
    };

    if let Err(e) = result {
        crate::log_debug!("exiting with failure: {e:#}");
        std::process::exit(1);
    }
}

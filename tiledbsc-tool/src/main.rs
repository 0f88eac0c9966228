//! Command-line walker for SOMA and SOMA collection layouts.

mod commands;
mod config;
mod error;
mod store;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tiledbsc_core::GroupStore;
use tiledbsc_rocks::RocksGroupStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{load_config, resolve_store_config};
use crate::store::{AnyStore, StoreType, load_manifest};

const VERBOSE_FILTER: &str = "tiledbsc_core=debug,tiledbsc_rocks=debug,tiledbsc_tool=debug";

#[derive(Parser)]
#[command(name = "tsc")]
#[command(about = "Resolve SOMA collections to dataset and array URIs", long_about = None)]
struct Cli {
    /// Store type: rocks or manifest
    #[arg(long, global = true)]
    store_type: Option<StoreType>,

    /// Path to the RocksDB catalog or the manifest file
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Log traversal details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a JSON or YAML layout manifest into the RocksDB catalog
    Import {
        /// Manifest file
        manifest: PathBuf,
    },

    #[command(flatten)]
    Query(Query),
}

#[derive(Subcommand)]
enum Query {
    /// Print every SOMA of a collection and every array inside it
    Walk { uri: String },

    /// List the arrays of a SOMA
    Arrays { uri: String },

    /// List the SOMAs of a collection
    Somas { uri: String },

    /// List the direct members of a group
    Ls { uri: String },

    /// Show the group hierarchy under a URI
    Tree { uri: String },

    /// Show the kind of object stored at a URI
    Stat { uri: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { VERBOSE_FILTER } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let (store_type, store_path) = resolve_store_config(load_config()?, cli.store_type, cli.store);

    match cli.command {
        Command::Import { manifest } => {
            anyhow::ensure!(
                store_type == StoreType::Rocks,
                "import writes to a rocks catalog, not a {} store",
                store_type
            );
            let catalog = RocksGroupStore::open(&store_path)?;
            let layout = load_manifest(&manifest)?;
            layout.apply(&catalog)?;
            info!(
                catalog = %store_path.display(),
                arrays = layout.arrays.len(),
                groups = layout.groups.len(),
                "imported manifest"
            );
            Ok(())
        }
        Command::Query(query) => {
            let store = AnyStore::open(store_type, &store_path)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            match &store {
                AnyStore::Rocks(s) => query.run(s, &mut out),
                AnyStore::Manifest(s) => query.run(s, &mut out),
            }
        }
    }
}

impl Query {
    fn run<S: GroupStore, W: Write>(&self, store: &S, out: &mut W) -> anyhow::Result<()> {
        match self {
            Query::Walk { uri } => commands::walk_soco(store, uri, out),
            Query::Arrays { uri } => commands::arrays(store, uri, out),
            Query::Somas { uri } => commands::somas(store, uri, out),
            Query::Ls { uri } => commands::ls(store, uri, out),
            Query::Tree { uri } => commands::tree(store, uri, out),
            Query::Stat { uri } => commands::stat(store, uri, out),
        }
    }
}

//! oxide-tablesync CLI
//!
//! Renders the statements a reconciliation would send, working offline on
//! JSON spec and state documents.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use oxide_tablesync::prelude::*;
use oxide_tablesync::schema::load_json;

/// Declarative ClickHouse table reconciliation.
#[derive(Parser)]
#[command(name = "oxide-tablesync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the CREATE TABLE statement for a spec.
    Create {
        /// Desired table spec (JSON).
        #[arg(short, long)]
        spec: PathBuf,
    },

    /// Print the statements that bring an observed table in line with a spec.
    Plan {
        /// Desired table spec (JSON).
        #[arg(short, long)]
        spec: PathBuf,

        /// Observed table state (JSON).
        #[arg(long)]
        state: PathBuf,
    },

    /// Print the DROP TABLE statement for an observed table.
    Drop {
        /// Observed table state (JSON).
        #[arg(long)]
        state: PathBuf,
    },

    /// Validate a `[cluster:]database:table` reference.
    ParseId {
        /// The reference.
        id: String,
    },
}

fn load<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    load_json(path).with_context(|| format!("loading {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Create { spec } => {
            let spec: TableSpec = load(&spec)?;
            println!("{}", build_create(&spec)?);
        }

        Commands::Plan { spec, state } => {
            let spec: TableSpec = load(&spec)?;
            let state: TableState = load(&state)?;

            let plan = diff_columns(
                &spec.columns,
                &state.table.columns,
                &state.table.order_by,
                spec.allow_destructive,
            )?;

            if plan.must_recreate() {
                warn!("Table must be recreated");
                for reason in &plan.recreate_reasons {
                    println!("-- {reason}");
                }
                return Ok(());
            }

            if plan.is_empty() {
                info!("Columns are in sync, nothing to do.");
                return Ok(());
            }

            let target = state.target();
            if !plan.columns_to_drop.is_empty() {
                println!("{}", build_drop_columns(&target, &plan.columns_to_drop)?);
            }
            if !plan.columns_to_add.is_empty() {
                println!("{}", build_add_columns(&target, &plan.columns_to_add)?);
            }
        }

        Commands::Drop { state } => {
            let state: TableState = load(&state)?;
            if !state.table.allow_destructive {
                return Err(ReconcileError::DestructiveChangeDenied {
                    object: format!("table '{}.{}'", state.table.database_name, state.table.name),
                }
                .into());
            }
            println!("{}", build_drop(&state.target())?);
        }

        Commands::ParseId { id } => {
            let id = ImportId::parse(&id)?;
            match &id.table {
                TableRef::Uuid(uuid) => info!(database = %id.database, %uuid, "Table by uuid"),
                TableRef::Name(name) => info!(database = %id.database, %name, "Table by name"),
            }
            println!("{id}");
        }
    }

    Ok(())
}

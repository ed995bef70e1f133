//! homelab inventory script
//!
//! Ansible dynamic inventory executable backed by the homelab machine database

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use homelab_db::{MemoryRecordStore, RecordStore};
use homelab_inventory::{
    Inventory, Mutation, PluginConfig, apply_all, build, build_with_store, render_host,
    render_list,
};
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "homelab-cli", version)]
#[command(about = "Ansible dynamic inventory from the homelab machine database", long_about = None)]
struct Cli {
    /// Print the full inventory (default)
    #[arg(long, conflicts_with = "host")]
    list: bool,

    /// Print the variables of a single host
    #[arg(long, value_name = "HOST")]
    host: Option<String>,

    /// Print the computed mutations instead of the inventory
    #[arg(long, conflicts_with = "host")]
    mutations: bool,

    /// Plugin configuration file (.yml or .yaml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Read machine documents from a JSON file instead of MongoDB
    #[arg(long, value_name = "PATH")]
    records: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn compute_mutations(
    config: &PluginConfig,
    records: Option<&Path>,
) -> Result<Vec<Mutation>> {
    let mutations = match records {
        Some(path) => {
            let store = MemoryRecordStore::from_json_file(path)?;
            debug!(
                store = store.store_type(),
                documents = store.len(),
                "using record file"
            );
            build_with_store(config, &store).await?
        }
        None => build(config).await?,
    };
    Ok(mutations)
}

fn print_json(value: &Value, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let path = match cli.config {
        Some(path) => path,
        None => PluginConfig::discover()?,
    };
    let config = PluginConfig::load(&path)
        .wrap_err_with(|| format!("failed to load {}", path.display()))?;
    info!(path = %path.display(), "configuration loaded");

    let mutations = compute_mutations(&config, cli.records.as_deref())
        .await
        .wrap_err("failed to build inventory")?;

    if cli.mutations {
        return print_json(&serde_json::to_value(&mutations)?, cli.pretty);
    }

    let mut inventory = Inventory::new();
    apply_all(&mutations, &mut inventory)?;

    debug!(list = cli.list, host = ?cli.host, "rendering inventory");
    let output = match cli.host.as_deref() {
        Some(host) => render_host(&inventory, host),
        None => render_list(&inventory),
    };
    print_json(&output, cli.pretty)
}

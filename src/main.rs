use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use terraform_inventory::cli::{Cli, Mode};
use terraform_inventory::config::{self, InventoryConfig};
use terraform_inventory::{Inventory, TerraformDelegate, generate};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TF_INVENTORY_LOG";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = config::load(cli.config.as_deref())?;
    let terraform_dir = cli
        .terraform_dir
        .clone()
        .unwrap_or_else(|| config.terraform_dir());
    let inventory = collect(&config, terraform_dir);

    let rendered = match cli.mode() {
        Mode::List => inventory.to_pretty_json(),
        Mode::Host(host) => match inventory.host_vars(&host) {
            Some(vars) => serde_json::to_string_pretty(vars),
            None => {
                tracing::info!(%host, "host not in inventory");
                serde_json::to_string_pretty(&json!({}))
            }
        },
    }
    .context("failed to encode inventory JSON")?;
    println!("{rendered}");
    Ok(())
}

/// Terraform failures never fail the run: they are reported on stderr and the
/// caller gets the empty inventory.
fn collect(config: &InventoryConfig, terraform_dir: PathBuf) -> Inventory {
    let outputs = TerraformDelegate::from_config(config, terraform_dir)
        .and_then(|delegate| delegate.outputs());
    match outputs {
        Ok(outputs) => generate(&outputs, &config.inventory),
        Err(err) => {
            eprintln!("{}", err.report());
            tracing::debug!(error = ?err, "falling back to empty inventory");
            Inventory::empty()
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

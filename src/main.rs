mod bank;
mod console;
mod loader;
mod money;
mod shell;

use clap::Parser;
use std::{io, path::PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::bank::Bank;
use crate::console::Console;

#[derive(Parser, Debug)]
#[clap(about = "Browse the customers and accounts of a bank from a text console")]
struct Args {
    /// Tab-delimited customer file loaded at startup
    #[clap(default_value = "data/test.dat")]
    data_file: PathBuf,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let data_file = Args::parse().data_file;
    let mut bank = Bank::default();
    let mut out = io::stdout();

    if let Err(err) = loader::load_from_path(&data_file, &mut bank) {
        warn!(
            path = %data_file.display(),
            error = %err,
            loaded = bank.customer_count(),
            "customer file load failed"
        );
        shell::write_load_error(&mut out, &data_file)?;
    }

    let mut console = Console::new()?;
    shell::run(&bank, &mut console, &mut out)?;
    Ok(())
}

use std::path::PathBuf;

use clap::Parser;
use cosmoviz::{Command, init_logging, run};

#[derive(Parser, Debug)]
#[command(name = "cosmoviz")]
#[command(about = "Synthetic cosmology sweep generator and web-view converter")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let _guard = init_logging(&args.log_level, args.log_file.as_deref())?;

    run(args.command)?;

    tracing::info!("Done");
    Ok(())
}

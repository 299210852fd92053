//! chkdigest CLI Binary
//!
//! Command-line interface for creating and verifying digest checklists.

use chkdigest::cli::{load_config, Cli, RunContext};
use chkdigest::logging::init_logging;
use clap::Parser;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let workspace_root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Failed to resolve working directory: {}", e);
            process::exit(1);
        }
    };

    // Config feeds logging, so it is resolved before any subscriber exists.
    let config = match load_config(&cli, &workspace_root) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", chkdigest::cli::map_error(&e));
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(Some(&config.logging)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("chkdigest starting");

    let context = RunContext::from_cli(&cli, config);
    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output.text);
            if !output.success {
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", chkdigest::cli::map_error(&e));
            process::exit(1);
        }
    }
}

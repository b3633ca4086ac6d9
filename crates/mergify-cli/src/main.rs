//! # validate-mergify entry point
//!
//! Parses command-line arguments, initialises logging, and runs the
//! validate command. Logs go to stderr; stdout carries only per-file
//! diagnostics.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mergify_cli::validate::{run_validate, ValidateArgs};

/// Validate Mergify configuration files against the official schema.
#[derive(Parser, Debug)]
#[command(name = "validate-mergify", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    validate: ValidateArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();
    match run_validate(&cli.validate, &mut stdout) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::from(1)
        }
    }
}

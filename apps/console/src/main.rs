//! # Detailing Console Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        detailing-console                                │
//! │                                                                         │
//! │  main.rs ────► parses the CLI, sets up logging                         │
//! │                                                                         │
//! │  lib.rs ─────► loads config and the cart file, runs the command        │
//! │                                                                         │
//! │  stdout ─────► pretty JSON result                                      │
//! │  stderr ─────► logs and the error, if any                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use detailing_console::{execute, init_tracing, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match execute(cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(code = ?e.code, "{}", e.message);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

//! # Detailing Console Backend
//!
//! Orchestration layer between the browser console and `detailing-core`.
//!
//! ## Module Organization
//! ```text
//! detailing-console/
//! ├── main.rs          # CLI entry point
//! ├── lib.rs           # Tracing setup, CLI definition and dispatch
//! ├── error.rs         # ApiError, ConfigError
//! ├── commands/
//! │   ├── mod.rs       # Re-exports all commands
//! │   ├── cart.rs      # add_service, set_adjustment, apply_target_total, ...
//! │   └── summary.rs   # get_summary, build_visit_submission
//! └── state/
//!     ├── mod.rs       # State type exports
//!     ├── cart.rs      # CartState (Arc<Mutex<Cart>>)
//!     └── config.rs    # ConsoleConfig (TOML + environment)
//! ```
//!
//! ## CLI
//! ```text
//! detailing-console [--config PATH] quote    CART.json
//! detailing-console [--config PATH] allocate CART.json --target 120,00 [--basis net|gross]
//! detailing-console [--config PATH] submit   CART.json --customer REF --vehicle REF
//! detailing-console [--config PATH] config
//! ```
//!
//! A cart file is a JSON array of services:
//! ```json
//! [
//!   { "serviceId": "svc-wash", "name": "Hand wash", "basePriceNet": 10000 },
//!   { "serviceId": "svc-wax", "name": "Wax", "basePriceNet": 5000, "vatRatePercent": 8,
//!     "adjustment": { "kind": "percent", "value": -1000 } }
//! ]
//! ```
//! JSON goes to stdout, logs go to stderr.

pub mod commands;
pub mod error;
pub mod state;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use detailing_core::AllocationBasis;

use crate::commands::ServiceInput;
use crate::error::ApiError;
use crate::state::{CartState, ConsoleConfig};

// =============================================================================
// CLI Definition
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "detailing-console")]
#[command(about = "Price detailing carts and fit them to a target total")]
pub struct Cli {
    /// Path to a TOML config file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the priced summary of a cart file
    Quote {
        /// JSON array of services
        cart: PathBuf,
    },

    /// Rewrite a cart's adjustments so its total equals the target
    Allocate {
        cart: PathBuf,

        /// Target total, e.g. "120,00" or "1 200.50"
        #[arg(short, long)]
        target: String,

        /// net or gross (defaults to the configured basis)
        #[arg(short, long)]
        basis: Option<AllocationBasis>,
    },

    /// Build the visit payload for a cart file
    Submit {
        cart: PathBuf,

        #[arg(long)]
        customer: String,

        #[arg(long)]
        vehicle: String,
    },

    /// Print the effective configuration
    Config,
}

// =============================================================================
// Dispatch
// =============================================================================

/// Runs one CLI command and returns its JSON output.
pub fn execute(cli: Cli) -> Result<String, ApiError> {
    let config = match cli.config {
        Some(path) => ConsoleConfig::load(Some(path))?,
        None => ConsoleConfig::load_or_default(None),
    };
    debug!(?config, "Configuration ready");

    match cli.command {
        Command::Quote { cart } => {
            let cart = load_cart(&cart, &config)?;
            to_json(&commands::get_summary(&cart, &config))
        }
        Command::Allocate {
            cart,
            target,
            basis,
        } => {
            let cart = load_cart(&cart, &config)?;
            let basis = basis.unwrap_or(config.pricing.default_basis);
            to_json(&commands::apply_target_total(&cart, &target, basis)?)
        }
        Command::Submit {
            cart,
            customer,
            vehicle,
        } => {
            let cart = load_cart(&cart, &config)?;
            to_json(&commands::build_visit_submission(
                &cart, &config, &customer, &vehicle,
            )?)
        }
        Command::Config => to_json(&config),
    }
}

/// Reads a cart file and adds every service through `add_service`, so file
/// input gets the same validation as interactive input.
pub fn load_cart(path: &Path, config: &ConsoleConfig) -> Result<CartState, ApiError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ApiError::cart(format!("Cannot read {}: {}", path.display(), e)))?;

    let services: Vec<ServiceInput> = serde_json::from_str(&contents)
        .map_err(|e| ApiError::validation(format!("Invalid cart file {}: {}", path.display(), e)))?;

    let cart = CartState::new();
    for service in services {
        commands::add_service(&cart, config, service)?;
    }

    info!(path = %path.display(), lines = cart.with_cart(|c| c.len()), "Cart loaded");
    Ok(cart)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::internal(format!("Failed to serialize output: {}", e)))
}

// =============================================================================
// Tracing
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=detailing=trace` - Show trace for detailing crates only
/// - Default: INFO, DEBUG for detailing crates
///
/// Logs are written to stderr so stdout carries only JSON.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,detailing=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::fs;
    use tempfile::TempDir;

    const CART: &str = r#"[
        { "serviceId": "svc-wash", "name": "Exterior wash", "basePriceNet": 10000, "vatRatePercent": 23 },
        { "serviceId": "svc-vac", "name": "Interior", "basePriceNet": 5000 }
    ]"#;

    struct Fixture {
        dir: TempDir,
        cart: PathBuf,
        config: PathBuf,
    }

    fn fixture(cart: &str) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let cart_path = dir.path().join("cart.json");
        let config_path = dir.path().join("config.toml");
        fs::write(&cart_path, cart).unwrap();
        ConsoleConfig::default().save(Some(config_path.clone())).unwrap();
        Fixture {
            dir,
            cart: cart_path,
            config: config_path,
        }
    }

    fn run(fixture: &Fixture, command: Command) -> Result<serde_json::Value, ApiError> {
        let output = execute(Cli {
            config: Some(fixture.config.clone()),
            command,
        })?;
        Ok(serde_json::from_str(&output).unwrap())
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "detailing-console",
            "allocate",
            "cart.json",
            "--target",
            "120,00",
            "--basis",
            "net",
        ])
        .unwrap();

        match cli.command {
            Command::Allocate { target, basis, .. } => {
                assert_eq!(target, "120,00");
                assert_eq!(basis, Some(AllocationBasis::Net));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_quote() {
        let fx = fixture(CART);
        let json = run(&fx, Command::Quote { cart: fx.cart.clone() }).unwrap();

        assert_eq!(json["totals"]["totalGross"], 18450);
        assert_eq!(json["totalGrossDisplay"], "184,50 zł");
        assert_eq!(json["lines"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_allocate_uses_configured_basis() {
        let fx = fixture(CART);
        let json = run(
            &fx,
            Command::Allocate {
                cart: fx.cart.clone(),
                target: "120,00".to_string(),
                basis: None,
            },
        )
        .unwrap();

        assert_eq!(json["totals"]["totalGross"], 12000);
        assert_eq!(json["items"][0]["item"]["adjustment"]["kind"], "percent");
        assert_eq!(json["items"][0]["item"]["adjustment"]["value"], -3496);
    }

    #[test]
    fn test_allocate_rejects_surcharge() {
        let fx = fixture(CART);
        let err = run(
            &fx,
            Command::Allocate {
                cart: fx.cart.clone(),
                target: "500".to_string(),
                basis: Some(AllocationBasis::Gross),
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::TargetAboveCurrentTotal);
    }

    #[test]
    fn test_submit() {
        let fx = fixture(CART);
        let json = run(
            &fx,
            Command::Submit {
                cart: fx.cart.clone(),
                customer: "CUST-7".to_string(),
                vehicle: "KR 1234A".to_string(),
            },
        )
        .unwrap();

        assert_eq!(json["customerRef"], "CUST-7");
        assert_eq!(json["lines"][1]["vatRatePercent"], 23);
        assert_eq!(json["totals"]["totalNet"], 15000);
    }

    #[test]
    fn test_invalid_cart_file() {
        let fx = fixture(r#"[{ "serviceId": "svc", "name": "", "basePriceNet": 100 }]"#);
        let err = run(&fx, Command::Quote { cart: fx.cart.clone() }).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let fx = fixture("not json");
        let err = run(&fx, Command::Quote { cart: fx.cart.clone() }).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let missing = fx.dir.path().join("missing.json");
        let err = run(&fx, Command::Quote { cart: missing }).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[test]
    fn test_config_file_is_honoured() {
        let fx = fixture(CART);
        fs::write(&fx.config, "[pricing]\ndefault_vat_rate_percent = 8\n").unwrap();

        let json = run(&fx, Command::Quote { cart: fx.cart.clone() }).unwrap();
        // The second service has no VAT rate of its own.
        assert_eq!(json["lines"][1]["pricing"]["finalGross"], 5400);
    }

    #[test]
    fn test_broken_explicit_config_is_an_error() {
        let fx = fixture(CART);
        fs::write(&fx.config, "[pricing\n").unwrap();

        let err = run(&fx, Command::Config).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
    }
}

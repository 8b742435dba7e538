//! # Console Configuration
//!
//! Currency display and pricing defaults, loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     DETAILING_DEFAULT_VAT=8                                            │
//! │     DETAILING_BASIS=net                                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config PATH, or                                                  │
//! │     ~/.config/console/config.toml (Linux)                              │
//! │     ~/Library/Application Support/com.detailing.console/config.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     PLN / zł, VAT 23%, gross basis, 100 lines                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # config.toml
//! [currency]
//! code = "PLN"
//! symbol = "zł"
//! symbol_after = true
//! decimal_separator = ","
//!
//! [pricing]
//! default_vat_rate_percent = 23
//! default_basis = "gross"
//! max_cart_lines = 100
//! ```
//!
//! Amounts are always held in minor units with two decimal places; the
//! currency section only controls how they are rendered.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use detailing_core::{AllocationBasis, Money, VatRate, DEFAULT_VAT_RATE_PERCENT, MAX_CART_LINES};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Sections
// =============================================================================

/// How amounts are rendered for the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    /// ISO 4217 code
    pub code: String,

    pub symbol: String,

    /// `true` renders "110,70 zł", `false` renders "zł110,70".
    pub symbol_after: bool,

    pub decimal_separator: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        CurrencyConfig {
            code: "PLN".to_string(),
            symbol: "zł".to_string(),
            symbol_after: true,
            decimal_separator: ",".to_string(),
        }
    }
}

/// Defaults applied when building lines and allocating targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// VAT rate for services whose catalog entry carries none.
    pub default_vat_rate_percent: u32,

    /// Basis the target-total modal starts in.
    pub default_basis: AllocationBasis,

    /// Line limit per cart, capped at the engine's hard limit.
    pub max_cart_lines: usize,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            default_vat_rate_percent: DEFAULT_VAT_RATE_PERCENT,
            default_basis: AllocationBasis::Gross,
            max_cart_lines: MAX_CART_LINES,
        }
    }
}

// =============================================================================
// Console Config
// =============================================================================

/// Complete console configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub currency: CurrencyConfig,
    pub pricing: PricingConfig,
}

impl ConsoleConfig {
    // =========================================================================
    // Loading & Saving
    // =========================================================================

    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Overlay the config file if it exists
    /// 3. Apply environment variable overrides
    /// 4. Validate
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading console config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads configuration, falling back to defaults on any error.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load console config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file, creating the parent directory.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::Invalid("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Saved console config");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.currency.code.trim().is_empty() {
            return Err(ConfigError::Invalid("Currency code must not be empty".into()));
        }

        if self.pricing.default_vat_rate_percent > 100 {
            return Err(ConfigError::Invalid(format!(
                "Default VAT rate must be between 0 and 100, got: {}",
                self.pricing.default_vat_rate_percent
            )));
        }

        if self.pricing.max_cart_lines == 0 {
            return Err(ConfigError::Invalid(
                "max_cart_lines must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `DETAILING_*` environment variables.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`. Unparsable values are ignored with a
    /// warning so a typo never blocks the console from starting.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(code) = lookup("DETAILING_CURRENCY_CODE") {
            debug!(code = %code, "Overriding currency code from environment");
            self.currency.code = code;
        }

        if let Some(symbol) = lookup("DETAILING_CURRENCY_SYMBOL") {
            self.currency.symbol = symbol;
        }

        if let Some(vat) = lookup("DETAILING_DEFAULT_VAT") {
            match vat.trim().parse::<u32>() {
                Ok(percent) => self.pricing.default_vat_rate_percent = percent,
                Err(_) => warn!(value = %vat, "Ignoring invalid DETAILING_DEFAULT_VAT"),
            }
        }

        if let Some(basis) = lookup("DETAILING_BASIS") {
            match basis.parse::<AllocationBasis>() {
                Ok(basis) => self.pricing.default_basis = basis,
                Err(e) => warn!("Ignoring DETAILING_BASIS: {}", e),
            }
        }

        if let Some(max) = lookup("DETAILING_MAX_LINES") {
            match max.trim().parse::<usize>() {
                Ok(max) => self.pricing.max_cart_lines = max,
                Err(_) => warn!(value = %max, "Ignoring invalid DETAILING_MAX_LINES"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "detailing", "console")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn default_vat_rate(&self) -> VatRate {
        VatRate::from_percent(self.pricing.default_vat_rate_percent)
    }

    /// Line limit actually enforced; never above the engine's hard cap.
    pub fn max_cart_lines(&self) -> usize {
        self.pricing.max_cart_lines.min(MAX_CART_LINES)
    }

    /// Formats an amount with the configured symbol and separator.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConsoleConfig::default();
    /// assert_eq!(config.format_money(Money::from_cents(11070)), "110,70 zł");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        let number = format!(
            "{}{}{:02}",
            amount.major().abs(),
            self.currency.decimal_separator,
            amount.minor_part().abs()
        );

        if self.currency.symbol_after {
            format!("{}{} {}", sign, number, self.currency.symbol)
        } else {
            format!("{}{}{}", sign, self.currency.symbol, number)
        }
    }
}

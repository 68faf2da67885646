//! Configuration structures for receipt parsing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{RcptError, Result};

/// Main configuration for the rcpt pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RcptConfig {
    /// Currency and number format.
    pub locale: LocaleConfig,

    /// Line classifier thresholds.
    pub classifier: ClassifierConfig,

    /// Item parser settings.
    pub parser: ParserConfig,

    /// Total reconciliation settings.
    pub reconciliation: ReconciliationConfig,
}

/// Currency symbols and decimal separator recognized in prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Symbols that may precede or follow a price.
    pub currency_symbols: Vec<char>,

    /// Separator between whole units and the two-digit fraction.
    pub decimal_separator: char,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            currency_symbols: vec!['£', '€', '$'],
            decimal_separator: '.',
        }
    }
}

impl LocaleConfig {
    /// Check that the locale can be turned into unambiguous price patterns.
    pub fn validate(&self) -> Result<()> {
        if self.currency_symbols.is_empty() {
            return Err(RcptError::Config(
                "at least one currency symbol is required".to_string(),
            ));
        }

        let sep = self.decimal_separator;
        if sep.is_ascii_digit() || sep.is_whitespace() || sep.is_alphabetic() {
            return Err(RcptError::Config(format!(
                "invalid decimal separator: {:?}",
                sep
            )));
        }

        if self.currency_symbols.contains(&sep) {
            return Err(RcptError::Config(format!(
                "decimal separator {:?} is also a currency symbol",
                sep
            )));
        }

        if let Some(bad) = self
            .currency_symbols
            .iter()
            .find(|c| c.is_alphanumeric() || c.is_whitespace())
        {
            return Err(RcptError::Config(format!(
                "invalid currency symbol: {:?}",
                bad
            )));
        }

        Ok(())
    }
}

/// Line classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Lines shorter than this (in characters) are never items.
    pub min_line_length: usize,

    /// Minimum length of an all-uppercase line to be treated as a header.
    pub uppercase_header_min_len: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_line_length: 3,
            uppercase_header_min_len: 8,
        }
    }
}

/// Item parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Minimum digit count of a leading token to be read as a product code.
    pub product_code_min_digits: usize,

    /// A leading product code must also be greater than this value.
    pub product_code_threshold: u64,

    /// Collapse items sharing a normalized name and price.
    pub deduplicate: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            product_code_min_digits: 4,
            product_code_threshold: 1000,
            deduplicate: true,
        }
    }
}

/// Tolerance used when comparing the item sum against the stated total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    /// Allowed difference as a fraction of the stated total.
    pub tolerance_ratio: Decimal,

    /// Lower bound on the allowed difference.
    pub min_tolerance: Decimal,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            tolerance_ratio: Decimal::new(2, 2),
            min_tolerance: Decimal::new(1, 2),
        }
    }
}

impl RcptConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate all sections.
    pub fn validate(&self) -> Result<()> {
        self.locale.validate()?;

        if self.reconciliation.tolerance_ratio.is_sign_negative()
            || self.reconciliation.min_tolerance.is_sign_negative()
        {
            return Err(RcptError::Config(
                "reconciliation tolerances must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}

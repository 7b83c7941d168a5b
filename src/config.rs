//! Billing configuration types.
//!
//! This module defines TOML-deserializable configuration for the fee
//! schedule engine: GST component rates, billing currency, and the overdue
//! grace window. Institutes load one [`BillingConfig`] at startup and pass
//! it to every engine call; the engine itself holds no global state.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{FeeError, Result};

fn default_currency() -> String {
    "INR".to_owned()
}

fn default_component_rate() -> Decimal {
    Decimal::new(9, 0)
}

/// Root billing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Billing currency code (ISO 4217). Defaults to `INR`.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// GST component rates.
    #[serde(default)]
    pub tax: TaxConfig,

    /// Days past the due date before a pending installment is considered
    /// overdue. Defaults to 0 (overdue from the day after the due date).
    #[serde(default)]
    pub overdue_grace_days: u16,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            tax: TaxConfig::default(),
            overdue_grace_days: 0,
        }
    }
}

impl BillingConfig {
    /// Parses a billing configuration from TOML and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`FeeError::ConfigError`] if the TOML is malformed or any
    /// value fails [`validate`](Self::validate).
    ///
    /// # Examples
    ///
    /// ```
    /// use fee_schedule_engine::config::BillingConfig;
    ///
    /// let toml = r#"
    ///     currency = "INR"
    ///
    ///     [tax]
    ///     cgst_rate_percent = 9
    ///     sgst_rate_percent = 9
    /// "#;
    ///
    /// let config = BillingConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.currency, "INR");
    /// ```
    pub fn from_toml(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)
            .map_err(|e| FeeError::ConfigError(format!("malformed TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the billing configuration.
    ///
    /// This method checks that:
    /// - Both GST component rates are between 0 and 100 percent
    /// - The currency is a three-letter uppercase ISO 4217 code
    ///
    /// # Errors
    ///
    /// Returns [`FeeError::ConfigError`] if any validation fails.
    pub fn validate(&self) -> Result<()> {
        self.tax.validate()?;
        validate_currency(&self.currency)?;
        Ok(())
    }
}

/// GST component rate configuration.
///
/// CGST and SGST are two equal-rate components of a single combined tax,
/// both computed on the same taxable base (tax is never compounded). The
/// rates are configurable independently because a handful of supply
/// categories carry asymmetric components.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxConfig {
    /// Central GST rate, in percent. Defaults to 9.
    #[serde(default = "default_component_rate")]
    pub cgst_rate_percent: Decimal,

    /// State GST rate, in percent. Defaults to 9.
    #[serde(default = "default_component_rate")]
    pub sgst_rate_percent: Decimal,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            cgst_rate_percent: default_component_rate(),
            sgst_rate_percent: default_component_rate(),
        }
    }
}

impl TaxConfig {
    /// Validates that both component rates are within 0..=100 percent.
    ///
    /// # Errors
    ///
    /// Returns [`FeeError::ConfigError`] if a rate is negative or above 100.
    pub fn validate(&self) -> Result<()> {
        validate_rate("cgst_rate_percent", self.cgst_rate_percent)?;
        validate_rate("sgst_rate_percent", self.sgst_rate_percent)?;
        Ok(())
    }
}

fn validate_rate(name: &str, rate: Decimal) -> Result<()> {
    if rate.is_sign_negative() {
        return Err(FeeError::ConfigError(format!("{name} cannot be negative, got {rate}")));
    }
    if rate > Decimal::ONE_HUNDRED {
        return Err(FeeError::ConfigError(format!("{name} cannot exceed 100, got {rate}")));
    }
    Ok(())
}

fn validate_currency(currency: &str) -> Result<()> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(FeeError::ConfigError(format!(
            "currency must be a three-letter uppercase ISO 4217 code, got '{currency}'"
        )));
    }
    Ok(())
}

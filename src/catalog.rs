//! Course catalog input types.
//!
//! The course/board catalog is owned by the calling application; this module
//! defines the plain-data shapes the engine consumes from it: named fee line
//! items for one-time courses, per-subject monthly prices for board courses,
//! and the validated admission identifier used to correlate audit records.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FeeError, Result};

/// Unique identifier for an admission.
///
/// Wraps the application-assigned admission id with type safety. The id is
/// the correlation key for audit records and for the persistence layer's
/// per-installment payment lock.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdmissionId(String);

impl AdmissionId {
    /// Creates a new admission id after validation.
    ///
    /// # Errors
    ///
    /// Returns error if the id is empty, exceeds 64 characters, or contains
    /// invalid characters. Only alphanumeric characters, hyphens, and
    /// underscores are allowed.
    pub fn new<S: Into<String>>(id: S) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(FeeError::InvalidAdmissionId("admission id cannot be empty".into()));
        }
        if id.len() > 64 {
            return Err(FeeError::InvalidAdmissionId(
                "admission id must be 64 characters or less".into(),
            ));
        }
        if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(FeeError::InvalidAdmissionId(
                "admission id can only contain alphanumeric characters, hyphens, and underscores"
                    .into(),
            ));
        }
        Ok(Self(id))
    }

    /// Returns the inner string reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One named component of a one-time course's base price.
///
/// Line items come from the course catalog (tuition, lab fee, study
/// material) and are immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeLineItem {
    /// Component name as displayed on the receipt.
    pub fees_type: String,
    /// Component amount. Must be non-negative.
    pub value: Decimal,
}

impl FeeLineItem {
    /// Validates the line item.
    ///
    /// # Errors
    ///
    /// Returns [`FeeError::InvalidAmount`] if the value is negative.
    pub fn validate(&self) -> Result<()> {
        if self.value.is_sign_negative() {
            return Err(FeeError::InvalidAmount(format!(
                "fee line item '{}' cannot be negative, got {}",
                self.fees_type, self.value
            )));
        }
        Ok(())
    }
}

/// Sums a course's fee line items into its base fee.
///
/// # Errors
///
/// Returns [`FeeError::InvalidAmount`] if any line item is negative, or
/// [`FeeError::AmountOverflow`] on checked-addition overflow.
pub fn base_fees(line_items: &[FeeLineItem]) -> Result<Decimal> {
    let mut total = Decimal::ZERO;
    for item in line_items {
        item.validate()?;
        total = total
            .checked_add(item.value)
            .ok_or_else(|| FeeError::AmountOverflow("overflow summing fee line items".into()))?;
    }
    Ok(total)
}

/// Per-subject monthly prices for board courses.
///
/// Keyed by subject name; ordering is deterministic so that derived amounts
/// and serialized snapshots are stable across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectPriceList {
    prices: BTreeMap<String, Decimal>,
}

impl SubjectPriceList {
    /// Creates an empty price list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subject's monthly price, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`FeeError::InvalidAmount`] if the price is negative.
    pub fn with_price<S: Into<String>>(mut self, subject: S, monthly_price: Decimal) -> Result<Self> {
        let subject = subject.into();
        if monthly_price.is_sign_negative() {
            return Err(FeeError::InvalidAmount(format!(
                "monthly price for '{subject}' cannot be negative, got {monthly_price}"
            )));
        }
        self.prices.insert(subject, monthly_price);
        Ok(self)
    }

    /// Looks up one subject's monthly price.
    ///
    /// # Errors
    ///
    /// Returns [`FeeError::UnknownSubject`] if the subject is not listed.
    pub fn monthly_price(&self, subject: &str) -> Result<Decimal> {
        self.prices
            .get(subject)
            .copied()
            .ok_or_else(|| FeeError::UnknownSubject(subject.to_owned()))
    }

    /// Sums the monthly prices of a subject selection.
    ///
    /// # Errors
    ///
    /// Returns [`FeeError::UnknownSubject`] for an unlisted subject, or
    /// [`FeeError::AmountOverflow`] on checked-addition overflow.
    pub fn monthly_total(&self, subjects: &[String]) -> Result<Decimal> {
        let mut total = Decimal::ZERO;
        for subject in subjects {
            let price = self.monthly_price(subject)?;
            total = total.checked_add(price).ok_or_else(|| {
                FeeError::AmountOverflow("overflow summing subject prices".into())
            })?;
        }
        Ok(total)
    }

    /// Returns the number of listed subjects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Returns true if no subjects are listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

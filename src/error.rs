//! Error types for the fee schedule engine.
//!
//! This module defines all error types that can occur during fee schedule
//! computation and installment lifecycle transitions. All errors implement
//! the standard [`std::error::Error`] trait via [`thiserror::Error`].
//!
//! The engine is a pure computation layer, so every variant represents a
//! caller-contract violation or an arithmetic guard; there is no transient
//! failure mode and nothing here is retryable.
//!
//! # Error Categories
//!
//! - **Input validation** ([`FeeError::InvalidAmount`],
//!   [`FeeError::InvalidInstallmentCount`], [`FeeError::InvalidAdmissionId`],
//!   [`FeeError::EmptySubjectSelection`]): malformed engine input
//! - **Catalog lookups** ([`FeeError::UnknownSubject`]): a subject missing
//!   from the supplied price list
//! - **Arithmetic guards** ([`FeeError::AmountOverflow`],
//!   [`FeeError::ScheduleError`]): checked decimal or calendar arithmetic
//!   out of range
//! - **Lifecycle violations** ([`FeeError::PaymentError`]): an installment
//!   or billing-month state transition that is not permitted
//! - **Configuration** ([`FeeError::ConfigError`]): invalid billing
//!   configuration
//!
//! # Examples
//!
//! ```
//! use fee_schedule_engine::error::{FeeError, Result};
//! use rust_decimal::Decimal;
//!
//! fn validate_waiver(waiver: Decimal) -> Result<Decimal> {
//!     if waiver.is_sign_negative() {
//!         return Err(FeeError::InvalidAmount("fee_waiver cannot be negative".to_string()));
//!     }
//!     Ok(waiver)
//! }
//! ```

use thiserror::Error;

/// Result type alias for fee schedule operations.
///
/// This is a convenience type that uses [`FeeError`] as the error type.
/// All fallible functions in this crate return this type.
pub type Result<T> = std::result::Result<T, FeeError>;

/// Errors that can occur in the fee schedule engine.
///
/// All variants include contextual information about what went wrong.
/// The error messages are designed to be surfaced to back-office staff
/// by the calling application layer.
///
/// Because the engine performs no I/O, none of these errors are transient:
/// the caller must correct the input (or the configuration) before calling
/// again.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum FeeError {
    /// An installment or month count below one was requested.
    ///
    /// A fee schedule needs at least one installment, and a board billing
    /// cycle needs at least one month. The count is validated before any
    /// arithmetic runs.
    #[error("invalid installment count: {0} (expected at least 1)")]
    InvalidInstallmentCount(u32),

    /// A monetary input was negative.
    ///
    /// Base fees, waivers, carry-forward balances, down payments, line item
    /// values, subject prices, and paid amounts must all be non-negative.
    /// Clamping is applied only where the billing rules call for it (a
    /// waiver larger than the base fee floors the taxable amount at zero);
    /// everywhere else a negative amount is rejected.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// An admission identifier failed validation.
    ///
    /// Admission ids must be non-empty, at most 64 characters, and contain
    /// only alphanumeric characters, hyphens, and underscores.
    #[error("invalid admission id: {0}")]
    InvalidAdmissionId(String),

    /// A board admission was created or re-billed with no subjects selected
    /// and no selection to inherit.
    #[error("board billing requires at least one selected subject")]
    EmptySubjectSelection,

    /// A board subject was not found in the supplied price list.
    ///
    /// The subject catalog is owned by the calling application; this error
    /// usually means the price list passed to the engine is stale.
    #[error("unknown subject: {0}")]
    UnknownSubject(String),

    /// Checked decimal arithmetic overflowed.
    ///
    /// Amounts within realistic tuition ranges never trigger this; it guards
    /// the engine against pathological inputs rather than silently wrapping.
    #[error("amount overflow: {0}")]
    AmountOverflow(String),

    /// Calendar date arithmetic went out of the representable range.
    #[error("schedule error: {0}")]
    ScheduleError(String),

    /// An installment or billing-month lifecycle transition was not
    /// permitted.
    ///
    /// Examples: paying an installment that is already settled, confirming
    /// clearance on a non-clearing payment, or re-billing a month that has
    /// been frozen by payment.
    #[error("payment error: {0}")]
    PaymentError(String),

    /// The billing configuration failed validation.
    ///
    /// Tax component rates must be between 0 and 100 percent and the
    /// currency must be a three-letter ISO 4217 code.
    #[error("invalid billing configuration: {0}")]
    ConfigError(String),
}

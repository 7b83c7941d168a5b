//! Fee Schedule Engine: Admission Billing for Coaching Institutes
//!
//! A pure computation library that turns an admission's billing parameters
//! into an exact payment schedule: GST breakup, waiver and carry-forward
//! adjustment, ceiling-rounded installment splitting, calendar-month due
//! dates, and monthly per-subject billing for board courses.
//!
//! # What problem does it solve?
//!
//! Installment arithmetic is easy to get subtly wrong. Naive equal division
//! either strands a fractional remainder or, once rounded per installment,
//! drifts away from the amount actually owed; floating point compounds the
//! drift across repeated CGST/SGST sums. This engine keeps every amount in
//! [`rust_decimal::Decimal`], rounds non-final installments *up* to the next
//! whole currency unit (billing policy in the institution's favor), and
//! makes the final installment absorb all residue so the schedule is exact
//! in total.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  Application     │  admission forms, payment desk, receipt renderer
//! │  (HTTP/DB layer) │
//! └────────┬─────────┘
//!          │ plain data in, plain data out; the engine does no I/O
//!          │
//! ┌────────▼─────────────────────────────────────────┐
//! │        Fee Schedule Engine (this crate)          │
//! │                                                  │
//! │  adjust ──► tax ──► split ──► materialize        │
//! │  (waiver,   (CGST/  (exact-   (due dates,        │
//! │   balance)   SGST)   sum)      numbering)        │
//! │                                                  │
//! │  board: per-month subject pricing + inheritance  │
//! │  installment: payment lifecycle state machine    │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## 1. Quote a one-time admission
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fee_schedule_engine::{
//!     admission::{AdmissionBilling, AdmissionFeeRequest, FeeSchedule, quote},
//!     catalog::{AdmissionId, FeeLineItem, SubjectPriceList},
//!     config::BillingConfig,
//! };
//! use rust_decimal::Decimal;
//!
//! # fn example() -> fee_schedule_engine::error::Result<()> {
//! let request = AdmissionFeeRequest {
//!     admission_id: AdmissionId::new("adm-2024-0042")?,
//!     billing: AdmissionBilling::OneTime {
//!         line_items: vec![FeeLineItem {
//!             fees_type: "Tuition".to_string(),
//!             value: Decimal::new(10000, 0),
//!         }],
//!         installment_count: 3,
//!     },
//!     fee_waiver: Decimal::new(1000, 0),
//!     previous_balance: Decimal::ZERO,
//!     down_payment: Decimal::new(2000, 0),
//!     start_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
//! };
//!
//! let quote = quote(&request, &SubjectPriceList::new(), &BillingConfig::default())?;
//!
//! assert_eq!(quote.total_fees, Decimal::new(10620, 0));
//! assert_eq!(quote.remaining_amount, Decimal::new(8620, 0));
//! if let FeeSchedule::Installments { installments } = &quote.schedule {
//!     let total: Decimal = installments.iter().map(|i| i.amount).sum();
//!     assert_eq!(total, quote.remaining_amount);
//! }
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## 2. Bill a board course month by month
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fee_schedule_engine::{
//!     board::MonthlyBillingCycle,
//!     catalog::{AdmissionId, SubjectPriceList},
//!     config::BillingConfig,
//! };
//! use rust_decimal::Decimal;
//!
//! # fn example() -> fee_schedule_engine::error::Result<()> {
//! let prices = SubjectPriceList::new()
//!     .with_price("MATH", Decimal::new(1200, 0))?
//!     .with_price("PHYSICS", Decimal::new(1500, 0))?;
//! let config = BillingConfig::default();
//!
//! let mut cycle = MonthlyBillingCycle::create(
//!     AdmissionId::new("adm-board-7")?,
//!     vec!["MATH".to_string(), "PHYSICS".to_string()],
//!     6,
//!     NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
//!     &prices,
//!     &config,
//! )?;
//!
//! // Drop PHYSICS from month 3 onward; month 3 is re-priced immediately,
//! // later months inherit the selection when they are opened.
//! let today = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
//! let amount = cycle.rebill(3, Some(vec!["MATH".to_string()]), &prices, today, &config)?;
//! assert_eq!(amount, Decimal::new(1416, 0)); // 1200 + 18% GST
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## 3. Apply payments
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fee_schedule_engine::installment::{
//!     Installment, InstallmentStatus, PaymentDetails, PaymentMethod,
//! };
//! use rust_decimal::Decimal;
//!
//! # fn example(installment: &mut Installment) -> fee_schedule_engine::error::Result<()> {
//! let receipt = installment.record_payment(PaymentDetails {
//!     paid_amount: Decimal::new(2874, 0),
//!     method: PaymentMethod::Cheque {
//!         cheque_date: NaiveDate::from_ymd_opt(2024, 2, 18).unwrap(),
//!     },
//!     transaction_id: Some("CHQ-000451".to_string()),
//!     received_date: NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
//!     remarks: None,
//! })?;
//!
//! // Cheques park in clearance until the bank confirms.
//! assert_eq!(receipt.status, InstallmentStatus::PendingClearance);
//! installment.confirm_clearance()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`schedule`]: the computation pipeline (adjust, tax, split, materialize)
//! - [`admission`]: the engine entry point: request sum type, quote, payment
//!   operations
//! - [`board`]: monthly billing cycle with subject inheritance and
//!   freeze-on-paid
//! - [`installment`]: installment records and their payment lifecycle
//! - [`catalog`]: catalog input shapes and the validated admission id
//! - [`config`]: TOML billing configuration (tax rates, currency, grace days)
//! - [`audit`]: structured billing audit events over `tracing`
//! - [`error`]: error types shared across the crate
//!
//! # Design Guarantees
//!
//! - **Exact totals**: installment amounts sum to the remaining amount to
//!   the decimal; display layers may round independently without touching
//!   stored values.
//! - **Calendar-month due dates**: Jan 31 + 1 month is the last day of
//!   February, never a fixed 30-day offset, and every due date is computed
//!   from the schedule start so short months never shift later installments.
//! - **Carry-forward is never re-taxed**: a prior cycle's balance joins the
//!   total after GST.
//! - **Permanent numbering**: installment numbers are assigned once and
//!   survive out-of-order payment.
//! - **Pure and reentrant**: no I/O, no shared mutable state; safe to call
//!   concurrently. The persistence layer owns the per-installment payment
//!   lock (compare-and-set on admission id + installment number).
//!
//! # Error Handling
//!
//! All operations return [`Result<T, FeeError>`](error::Result). Every error
//! is a caller-contract violation or arithmetic guard; there is nothing to
//! retry:
//!
//! ```rust
//! use fee_schedule_engine::{error::FeeError, schedule::split::split};
//! use rust_decimal::Decimal;
//!
//! match split(Decimal::new(8620, 0), 0) {
//!     Err(FeeError::InvalidInstallmentCount(count)) => {
//!         eprintln!("rejected count {count} before any arithmetic ran");
//!     }
//!     other => panic!("expected a count violation, got {other:?}"),
//! }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod admission;
pub mod audit;
pub mod board;
pub mod catalog;
pub mod config;
pub mod error;
pub mod installment;
pub mod schedule;

pub use admission::{AdmissionBilling, AdmissionFeeRequest, FeeQuote, FeeSchedule, quote};
pub use board::MonthlyBillingCycle;
pub use catalog::{AdmissionId, FeeLineItem, SubjectPriceList};
pub use config::{BillingConfig, TaxConfig};
pub use error::{FeeError, Result};
pub use installment::{
    Installment, InstallmentStatus, PaymentDetails, PaymentMethod, PaymentReceipt,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify public API is accessible
        let _ = std::marker::PhantomData::<FeeError>;
    }
}

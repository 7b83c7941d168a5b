//! Installment records and their payment lifecycle.
//!
//! An installment is created `Pending` by the schedule materializer and
//! moves through a small state machine driven by payment events from the
//! calling application:
//!
//! ```text
//! Pending ──┬─► Paid
//!           ├─► PendingClearance ──► Paid
//!           └─► Overdue ──┬─► Paid
//!                         └─► PendingClearance ──► Paid
//! ```
//!
//! `Paid` is terminal. `Overdue` is derived on-read by comparing the due
//! date against the current date; an overdue installment remains payable.
//! Installment numbers are permanent identifiers and are never
//! renumbered, even when later installments are paid out of order.
//!
//! Concurrency contract: the engine holds no locks. The persistence layer
//! must serialize payment mutations per `(admission_id, installment number)`
//! (a compare-and-set or row lock) so that two simultaneous payments for
//! the same installment cannot both succeed.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FeeError, Result};

/// Runtime status of an installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    /// Scheduled, not yet paid.
    Pending,
    /// Fully settled. Terminal.
    Paid,
    /// Paid with a clearing instrument; awaiting clearance confirmation.
    PendingClearance,
    /// Pending and past the due date (plus any configured grace window).
    Overdue,
}

/// How an installment was paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash at the front desk.
    Cash,
    /// Card swipe.
    Card,
    /// UPI transfer.
    Upi,
    /// Direct bank transfer.
    BankTransfer,
    /// Cheque, the only clearing instrument.
    Cheque {
        /// Date written on the cheque.
        cheque_date: NaiveDate,
    },
}

impl PaymentMethod {
    /// Returns true for instruments that settle asynchronously.
    ///
    /// A clearing payment parks the installment in
    /// [`InstallmentStatus::PendingClearance`] until the external payment
    /// collaborator confirms clearance.
    #[must_use]
    pub fn is_clearing(&self) -> bool {
        matches!(self, Self::Cheque { .. })
    }

    /// Returns the snake_case label used in receipts and audit records.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Upi => "upi",
            Self::BankTransfer => "bank_transfer",
            Self::Cheque { .. } => "cheque",
        }
    }
}

/// Details of a payment event applied to an installment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetails {
    /// Amount received. Must be non-negative.
    pub paid_amount: Decimal,
    /// Payment instrument.
    pub method: PaymentMethod,
    /// External reference (cheque number, UPI reference, gateway id).
    pub transaction_id: Option<String>,
    /// Date the payment was received.
    pub received_date: NaiveDate,
    /// Free-form remarks from the front desk.
    pub remarks: Option<String>,
}

/// Receipt returned when a payment is applied.
///
/// The receipt is the engine's record of what happened; the billing
/// renderer consumes it to produce the printed document. `excess` is
/// reported for display and audit only; it never auto-creates a credit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReceipt {
    /// Generated receipt identifier.
    pub receipt_id: Uuid,
    /// Installment the payment was applied to.
    pub installment_number: u32,
    /// Amount that was due on the installment.
    pub amount_due: Decimal,
    /// Amount actually received.
    pub paid_amount: Decimal,
    /// Amount received beyond the due amount, when over-paid.
    pub excess: Option<Decimal>,
    /// Status the installment settled into.
    pub status: InstallmentStatus,
}

/// One scheduled partial payment of an admission's total fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    /// 1-based permanent installment number.
    pub number: u32,
    /// Calendar due date.
    pub due_date: NaiveDate,
    /// Amount due.
    pub amount: Decimal,
    /// Current lifecycle status.
    pub status: InstallmentStatus,
    /// Payment details, set once a payment has been applied.
    pub payment: Option<PaymentDetails>,
}

impl Installment {
    /// Creates a pending installment.
    pub(crate) fn new(number: u32, due_date: NaiveDate, amount: Decimal) -> Self {
        Self { number, due_date, amount, status: InstallmentStatus::Pending, payment: None }
    }

    /// Returns true once a payment has been applied (settled or clearing).
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self.status, InstallmentStatus::Paid | InstallmentStatus::PendingClearance)
    }

    /// Applies a payment event to this installment.
    ///
    /// Cash-equivalent instruments settle to [`InstallmentStatus::Paid`]
    /// immediately; clearing instruments park in
    /// [`InstallmentStatus::PendingClearance`] until
    /// [`confirm_clearance`](Self::confirm_clearance). Paying more than the
    /// due amount is accepted and the surplus reported on the receipt.
    ///
    /// # Errors
    ///
    /// Returns [`FeeError::InvalidAmount`] if the paid amount is negative,
    /// or [`FeeError::PaymentError`] if the installment is already settled.
    pub fn record_payment(&mut self, details: PaymentDetails) -> Result<PaymentReceipt> {
        if details.paid_amount.is_sign_negative() {
            return Err(FeeError::InvalidAmount(format!(
                "paid amount cannot be negative, got {}",
                details.paid_amount
            )));
        }
        if self.is_settled() {
            return Err(FeeError::PaymentError(format!(
                "installment {} is already settled",
                self.number
            )));
        }

        let excess = details
            .paid_amount
            .checked_sub(self.amount)
            .filter(|diff| diff > &Decimal::ZERO);

        self.status = if details.method.is_clearing() {
            InstallmentStatus::PendingClearance
        } else {
            InstallmentStatus::Paid
        };
        let receipt = PaymentReceipt {
            receipt_id: Uuid::new_v4(),
            installment_number: self.number,
            amount_due: self.amount,
            paid_amount: details.paid_amount,
            excess,
            status: self.status,
        };
        self.payment = Some(details);
        Ok(receipt)
    }

    /// Confirms clearance of a clearing-instrument payment.
    ///
    /// Owned by the external payment collaborator; the engine only applies
    /// the resulting transition.
    ///
    /// # Errors
    ///
    /// Returns [`FeeError::PaymentError`] unless the installment is in
    /// [`InstallmentStatus::PendingClearance`].
    pub fn confirm_clearance(&mut self) -> Result<()> {
        if self.status != InstallmentStatus::PendingClearance {
            return Err(FeeError::PaymentError(format!(
                "installment {} is not awaiting clearance",
                self.number
            )));
        }
        self.status = InstallmentStatus::Paid;
        Ok(())
    }

    /// Derives the overdue state from the current date.
    ///
    /// A pending installment becomes [`InstallmentStatus::Overdue`] once
    /// `today` is past the due date plus the grace window. Returns true if
    /// the status flipped on this call. Settled installments and
    /// installments already marked overdue are left untouched.
    pub fn refresh_overdue(&mut self, today: NaiveDate, grace_days: u16) -> bool {
        if self.status != InstallmentStatus::Pending {
            return false;
        }
        let grace_end = self
            .due_date
            .checked_add_days(Days::new(u64::from(grace_days)))
            .unwrap_or(self.due_date);
        if today > grace_end {
            self.status = InstallmentStatus::Overdue;
            return true;
        }
        false
    }
}

//! Audit logging for billing-relevant events.
//!
//! Provides structured audit records with payment-reference redaction and a
//! generated correlation id per record. Events are emitted through
//! [`tracing`] with a dedicated `audit` target so operators can route them
//! to a separate sink from application logs.

use std::time::SystemTime;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Types of auditable billing events.
///
/// Each variant represents a money-relevant operation that back-office
/// staff may need to reconstruct later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingEventType {
    /// A fee quote was computed for an admission.
    QuoteComputed,
    /// An installment schedule or monthly billing cycle was created.
    ScheduleCreated,
    /// A payment was applied to an installment or billing month.
    PaymentRecorded,
    /// A clearing-instrument payment was confirmed cleared.
    ClearanceConfirmed,
    /// A pending installment was derived overdue.
    InstallmentOverdue,
    /// A board billing month was re-billed.
    MonthRebilled,
    /// A payment exceeded the amount due.
    ExcessPaymentObserved,
}

/// Details attached to an audit record.
///
/// Fields are optional and skipped when not applicable so that records stay
/// compact in the log stream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditDetails {
    /// Installment or month number the event concerns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installment_number: Option<u32>,
    /// Amount involved in the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    /// Amount received beyond the amount due.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excess: Option<Decimal>,
    /// Payment method label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// External payment reference (redacted before storage).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Error message, for rejected operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One audit record.
///
/// # Examples
///
/// ```
/// use fee_schedule_engine::audit::{AuditEvent, BillingEventType, audit_log};
/// use rust_decimal::Decimal;
///
/// let event = AuditEvent::new(BillingEventType::PaymentRecorded, "adm-2024-0042")
///     .with_installment(3)
///     .with_amount(Decimal::new(2874, 0))
///     .with_reference("UPI-4402118899");
///
/// audit_log(&event);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// When the event occurred.
    pub timestamp: SystemTime,
    /// What happened.
    pub event_type: BillingEventType,
    /// Which admission it happened to.
    pub admission_id: String,
    /// Correlation id for this record.
    pub record_id: Uuid,
    /// Contextual details.
    pub details: AuditDetails,
}

impl AuditEvent {
    /// Creates a new audit event with a fresh correlation id.
    #[must_use]
    pub fn new(event_type: BillingEventType, admission_id: impl Into<String>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            event_type,
            admission_id: admission_id.into(),
            record_id: Uuid::new_v4(),
            details: AuditDetails::default(),
        }
    }

    /// Adds the installment or month number.
    #[must_use]
    pub fn with_installment(mut self, number: u32) -> Self {
        self.details.installment_number = Some(number);
        self
    }

    /// Adds the amount involved.
    #[must_use]
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.details.amount = Some(amount);
        self
    }

    /// Adds the excess amount of an over-payment.
    #[must_use]
    pub fn with_excess(mut self, excess: Decimal) -> Self {
        self.details.excess = Some(excess);
        self
    }

    /// Adds the payment method label.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.details.method = Some(method.into());
        self
    }

    /// Adds an external payment reference, redacted to its last four
    /// characters.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.details.reference = Some(redact_reference(&reference.into()));
        self
    }

    /// Adds an error message for a rejected operation.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.details.error = Some(error.into());
        self
    }
}

/// Logs an audit event to tracing with target `audit`.
///
/// The dedicated target lets deployments filter audit records into a
/// separate file or retention policy from application logs.
pub fn audit_log(event: &AuditEvent) {
    tracing::info!(
        target: "audit",
        timestamp = ?event.timestamp,
        event_type = ?event.event_type,
        admission_id = %event.admission_id,
        record_id = %event.record_id,
        details = ?event.details,
        "AUDIT"
    );
}

/// Redacts a payment reference to its last four characters.
///
/// Cheque numbers, UPI references, and gateway ids identify bank accounts;
/// the last four characters are enough for reconciliation.
///
/// # Examples
///
/// ```
/// use fee_schedule_engine::audit::redact_reference;
///
/// assert_eq!(redact_reference("UPI-4402118899"), "**********8899");
/// assert_eq!(redact_reference("451"), "451");
/// ```
#[must_use]
pub fn redact_reference(reference: &str) -> String {
    let chars: Vec<char> = reference.chars().collect();
    if chars.len() <= 4 {
        return reference.to_owned();
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{visible}", "*".repeat(chars.len() - 4))
}

/// Convenience macro for audit logging.
///
/// Creates and logs an audit event in a single expression.
///
/// # Examples
///
/// ```
/// use fee_schedule_engine::{audit, audit::BillingEventType};
/// use rust_decimal::Decimal;
///
/// audit!(BillingEventType::QuoteComputed, "adm-2024-0042");
///
/// audit!(
///     BillingEventType::PaymentRecorded,
///     "adm-2024-0042",
///     with_installment(3),
///     with_amount(Decimal::new(2874, 0))
/// );
/// ```
#[macro_export]
macro_rules! audit {
    ($event_type:expr, $admission_id:expr) => {
        $crate::audit::audit_log(
            &$crate::audit::AuditEvent::new($event_type, $admission_id)
        )
    };
    ($event_type:expr, $admission_id:expr, $($method:ident($arg:expr)),+ $(,)?) => {
        $crate::audit::audit_log(
            &$crate::audit::AuditEvent::new($event_type, $admission_id)
                $(.$method($arg))+
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_reference() {
        assert_eq!(redact_reference("CHQ-000451"), "******0451");
        assert_eq!(redact_reference("UPI-4402118899"), "**********8899");
    }

    #[test]
    fn test_redact_reference_short_values_untouched() {
        assert_eq!(redact_reference(""), "");
        assert_eq!(redact_reference("7"), "7");
        assert_eq!(redact_reference("4451"), "4451");
    }

    #[test]
    fn test_audit_event_builder() {
        let event = AuditEvent::new(BillingEventType::PaymentRecorded, "adm-1")
            .with_installment(3)
            .with_amount(Decimal::new(2874, 0))
            .with_excess(Decimal::new(126, 0))
            .with_method("cash")
            .with_reference("CHQ-000451");

        assert_eq!(event.admission_id, "adm-1");
        assert_eq!(event.details.installment_number, Some(3));
        assert_eq!(event.details.amount, Some(Decimal::new(2874, 0)));
        assert_eq!(event.details.excess, Some(Decimal::new(126, 0)));
        assert_eq!(event.details.method.as_deref(), Some("cash"));
        assert_eq!(event.details.reference.as_deref(), Some("******0451"));
    }

    #[test]
    fn test_audit_event_redacts_reference() {
        let event = AuditEvent::new(BillingEventType::PaymentRecorded, "adm-1")
            .with_reference("CHQ-000451");
        let reference = event.details.reference.expect("reference should be set");
        assert!(!reference.contains("000451"));
        assert!(reference.ends_with("0451"));
    }

    #[test]
    fn test_event_type_serialization() {
        let json = serde_json::to_string(&BillingEventType::PaymentRecorded).unwrap();
        assert_eq!(json, "\"payment_recorded\"");
        let json = serde_json::to_string(&BillingEventType::MonthRebilled).unwrap();
        assert_eq!(json, "\"month_rebilled\"");
    }

    #[test]
    fn test_audit_event_serialization_skips_empty_details() {
        let event = AuditEvent::new(BillingEventType::QuoteComputed, "adm-1");
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("quote_computed"));
        assert!(!json.contains("installment_number"));
        assert!(!json.contains("reference"));
    }

    #[test]
    fn test_unique_record_ids() {
        let a = AuditEvent::new(BillingEventType::QuoteComputed, "adm-1");
        let b = AuditEvent::new(BillingEventType::QuoteComputed, "adm-1");
        assert_ne!(a.record_id, b.record_id);
    }
}

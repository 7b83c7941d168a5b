//! Admission fee quoting, the engine's entry point.
//!
//! Composes the schedule pipeline (waiver/carry-forward adjustment, GST
//! breakup, installment splitting, materialization) into a single call that
//! turns a plain-data [`AdmissionFeeRequest`] into a plain-data
//! [`FeeQuote`]. The engine performs no I/O: the calling application
//! persists the quote transactionally and serializes it for the frontend.
//!
//! One-time and board admissions are two variants of a sum type rather than
//! one struct with conditionally-relevant fields, so a request can never
//! carry a board duration alongside one-time line items.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    audit::{AuditEvent, BillingEventType, audit_log},
    board::MonthlyBillingCycle,
    catalog::{AdmissionId, FeeLineItem, SubjectPriceList, base_fees},
    config::BillingConfig,
    error::{FeeError, Result},
    installment::{Installment, PaymentDetails, PaymentReceipt},
    schedule::{adjust::adjust, materialize::materialize, split::split},
};

/// How an admission is billed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdmissionBilling {
    /// A one-time course fee split into installments.
    OneTime {
        /// Base price components from the course catalog.
        line_items: Vec<FeeLineItem>,
        /// Number of installments to split the remaining amount into.
        installment_count: u32,
    },
    /// A board course billed monthly per selected subject.
    Board {
        /// Default subject selection for the admission.
        subjects: Vec<String>,
        /// Course duration in months; sets the billing cycle length.
        duration_months: u32,
    },
}

/// Engine input for one admission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionFeeRequest {
    /// Admission being quoted.
    pub admission_id: AdmissionId,
    /// Billing mode and its parameters.
    pub billing: AdmissionBilling,
    /// Flat discount subtracted before tax. Must be non-negative.
    pub fee_waiver: Decimal,
    /// Outstanding balance carried forward from a prior cycle, added after
    /// tax. Must be non-negative.
    pub previous_balance: Decimal,
    /// Amount paid immediately at admission; not part of the schedule.
    /// Must be non-negative.
    pub down_payment: Decimal,
    /// Schedule anchor; the first installment or month is due one calendar
    /// month later.
    pub start_date: NaiveDate,
}

/// The payment schedule attached to a quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeeSchedule {
    /// One-time billing: an exact-sum installment split.
    Installments {
        /// Ordered installments summing to the remaining amount.
        installments: Vec<Installment>,
    },
    /// Board billing: independently priced monthly bills.
    Monthly {
        /// The monthly billing cycle.
        cycle: MonthlyBillingCycle,
    },
}

/// Engine output for one admission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeQuote {
    /// Taxable base after the waiver floor.
    pub taxable_amount: Decimal,
    /// Central GST on the taxable base, unrounded.
    pub cgst_amount: Decimal,
    /// State GST on the taxable base, unrounded.
    pub sgst_amount: Decimal,
    /// Taxable base plus tax plus carry-forward balance.
    pub total_fees: Decimal,
    /// Amount left to schedule after the down payment, floored at zero.
    pub remaining_amount: Decimal,
    /// Down payment beyond the total, when over-paid at admission time.
    /// Display and audit only, never auto-converted to a credit.
    pub excess_payment: Option<Decimal>,
    /// The payment schedule.
    pub schedule: FeeSchedule,
}

/// Computes the fee quote for an admission.
///
/// The price list is consulted for board admissions only; one-time callers
/// may pass an empty list.
///
/// # Errors
///
/// Returns [`FeeError::InvalidAmount`] for a negative monetary input,
/// [`FeeError::InvalidInstallmentCount`] for a zero count or duration,
/// [`FeeError::EmptySubjectSelection`] / [`FeeError::UnknownSubject`] for
/// board selection problems, and arithmetic or calendar guards as
/// [`FeeError::AmountOverflow`] / [`FeeError::ScheduleError`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fee_schedule_engine::{
///     admission::{AdmissionBilling, AdmissionFeeRequest, quote},
///     catalog::{AdmissionId, FeeLineItem, SubjectPriceList},
///     config::BillingConfig,
/// };
/// use rust_decimal::Decimal;
///
/// let request = AdmissionFeeRequest {
///     admission_id: AdmissionId::new("adm-2024-0042").unwrap(),
///     billing: AdmissionBilling::OneTime {
///         line_items: vec![FeeLineItem {
///             fees_type: "Tuition".to_string(),
///             value: Decimal::new(10000, 0),
///         }],
///         installment_count: 3,
///     },
///     fee_waiver: Decimal::new(1000, 0),
///     previous_balance: Decimal::ZERO,
///     down_payment: Decimal::new(2000, 0),
///     start_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
/// };
///
/// let quote = quote(&request, &SubjectPriceList::new(), &BillingConfig::default()).unwrap();
/// assert_eq!(quote.remaining_amount, Decimal::new(8620, 0));
/// ```
pub fn quote(
    request: &AdmissionFeeRequest,
    prices: &SubjectPriceList,
    config: &BillingConfig,
) -> Result<FeeQuote> {
    if request.down_payment.is_sign_negative() {
        return Err(FeeError::InvalidAmount(format!(
            "down_payment cannot be negative, got {}",
            request.down_payment
        )));
    }

    let base = match &request.billing {
        AdmissionBilling::OneTime { line_items, installment_count } => {
            if *installment_count == 0 {
                return Err(FeeError::InvalidInstallmentCount(0));
            }
            base_fees(line_items)?
        }
        AdmissionBilling::Board { subjects, duration_months } => {
            if *duration_months == 0 {
                return Err(FeeError::InvalidInstallmentCount(0));
            }
            if subjects.is_empty() {
                return Err(FeeError::EmptySubjectSelection);
            }
            prices
                .monthly_total(subjects)?
                .checked_mul(Decimal::from(*duration_months))
                .ok_or_else(|| {
                    FeeError::AmountOverflow("overflow computing board base fees".into())
                })?
        }
    };

    let totals = adjust(base, request.fee_waiver, request.previous_balance, &config.tax)?;
    let after_down_payment = totals
        .total_fees
        .checked_sub(request.down_payment)
        .ok_or_else(|| FeeError::AmountOverflow("overflow applying down payment".into()))?;
    let remaining_amount = after_down_payment.max(Decimal::ZERO);
    let excess_payment = if after_down_payment.is_sign_negative() {
        Some(-after_down_payment)
    } else {
        None
    };

    let schedule = match &request.billing {
        AdmissionBilling::OneTime { installment_count, .. } => {
            let amounts = split(remaining_amount, *installment_count)?;
            let installments = materialize(&amounts, request.start_date)?;
            audit_log(
                &AuditEvent::new(BillingEventType::ScheduleCreated, request.admission_id.as_str())
                    .with_amount(remaining_amount),
            );
            FeeSchedule::Installments { installments }
        }
        AdmissionBilling::Board { subjects, duration_months } => {
            let cycle = MonthlyBillingCycle::create(
                request.admission_id.clone(),
                subjects.clone(),
                *duration_months,
                request.start_date,
                prices,
                config,
            )?;
            FeeSchedule::Monthly { cycle }
        }
    };

    audit_log(
        &AuditEvent::new(BillingEventType::QuoteComputed, request.admission_id.as_str())
            .with_amount(totals.total_fees),
    );
    if let Some(excess) = excess_payment {
        audit_log(
            &AuditEvent::new(
                BillingEventType::ExcessPaymentObserved,
                request.admission_id.as_str(),
            )
            .with_excess(excess),
        );
    }
    info!(
        admission_id = %request.admission_id.as_str(),
        total_fees = %totals.total_fees,
        remaining = %remaining_amount,
        "fee quote computed"
    );

    Ok(FeeQuote {
        taxable_amount: totals.taxable_amount,
        cgst_amount: totals.cgst_amount,
        sgst_amount: totals.sgst_amount,
        total_fees: totals.total_fees,
        remaining_amount,
        excess_payment,
        schedule,
    })
}

/// Applies a payment to an installment of a one-time schedule, with audit.
///
/// # Errors
///
/// Propagates [`Installment::record_payment`] errors.
pub fn record_installment_payment(
    admission_id: &AdmissionId,
    installment: &mut Installment,
    details: PaymentDetails,
) -> Result<PaymentReceipt> {
    let method_label = details.method.label();
    let reference = details.transaction_id.clone();
    let receipt = installment.record_payment(details)?;

    let mut event = AuditEvent::new(BillingEventType::PaymentRecorded, admission_id.as_str())
        .with_installment(receipt.installment_number)
        .with_amount(receipt.paid_amount)
        .with_method(method_label);
    if let Some(reference) = reference {
        event = event.with_reference(reference);
    }
    audit_log(&event);

    if let Some(excess) = receipt.excess {
        audit_log(
            &AuditEvent::new(BillingEventType::ExcessPaymentObserved, admission_id.as_str())
                .with_installment(receipt.installment_number)
                .with_excess(excess),
        );
    }
    Ok(receipt)
}

/// Confirms clearance of an installment paid with a clearing instrument.
///
/// # Errors
///
/// Propagates [`Installment::confirm_clearance`] errors.
pub fn confirm_installment_clearance(
    admission_id: &AdmissionId,
    installment: &mut Installment,
) -> Result<()> {
    installment.confirm_clearance()?;
    audit_log(
        &AuditEvent::new(BillingEventType::ClearanceConfirmed, admission_id.as_str())
            .with_installment(installment.number),
    );
    Ok(())
}

/// Derives overdue state across a schedule. Returns how many installments
/// flipped to overdue on this call.
pub fn refresh_overdue_installments(
    admission_id: &AdmissionId,
    installments: &mut [Installment],
    today: NaiveDate,
    config: &BillingConfig,
) -> u32 {
    let mut flipped = 0;
    for installment in installments {
        if installment.refresh_overdue(today, config.overdue_grace_days) {
            flipped += 1;
            audit_log(
                &AuditEvent::new(BillingEventType::InstallmentOverdue, admission_id.as_str())
                    .with_installment(installment.number),
            );
        }
    }
    flipped
}

//! Monthly billing for board (subscription) courses.
//!
//! A board admission is billed month by month: each month's amount is the
//! independently computed tax-inclusive price of that month's *selected
//! subjects*, never a split of a lump sum. Subjects can differ from month to
//! month, and a month with no explicit selection inherits one on read:
//!
//! 1. the month's own non-empty subject list, else
//! 2. the nearest earlier month's non-empty list, else
//! 3. the admission's default subject list.
//!
//! Because of inheritance-on-read, the amount of a future unpaid month is
//! not fixed at schedule creation: it is recomputed via [`rebill`] whenever
//! the month is opened for editing, using current subject prices. Marking a
//! month paid snapshots its effective subject list and freezes its amount
//! permanently.
//!
//! [`rebill`]: MonthlyBillingCycle::rebill

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    audit::{AuditEvent, BillingEventType, audit_log},
    catalog::{AdmissionId, SubjectPriceList},
    config::BillingConfig,
    error::{FeeError, Result},
    installment::{Installment, PaymentDetails, PaymentReceipt},
    schedule::{materialize::due_date, tax::gst_breakup},
};

/// Computes one month's tax-inclusive amount for a subject selection.
///
/// # Errors
///
/// Returns [`FeeError::UnknownSubject`] for an unlisted subject, or
/// [`FeeError::AmountOverflow`] on checked-arithmetic overflow.
pub fn month_amount(
    subjects: &[String],
    prices: &SubjectPriceList,
    config: &BillingConfig,
) -> Result<Decimal> {
    let taxable = prices.monthly_total(subjects)?;
    let breakup = gst_breakup(taxable, &config.tax)?;
    taxable
        .checked_add(breakup.total()?)
        .ok_or_else(|| FeeError::AmountOverflow("overflow computing monthly amount".into()))
}

/// One month of a board admission's billing cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBill {
    /// Explicit subject selection for this month. Empty means "inherit"
    /// until the month is paid, at which point the effective selection is
    /// snapshotted here.
    pub subjects: Vec<String>,
    /// The installment record carrying amount, due date, and status. Its
    /// number is the 1-based month number.
    pub installment: Installment,
}

impl MonthlyBill {
    /// Returns the 1-based month number.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.installment.number
    }
}

/// The full monthly billing cycle for one board admission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyBillingCycle {
    admission_id: AdmissionId,
    default_subjects: Vec<String>,
    bills: Vec<MonthlyBill>,
}

impl MonthlyBillingCycle {
    /// Creates the billing cycle for a board admission.
    ///
    /// One bill per month of the course duration, each initially `Pending`
    /// with no explicit subject selection (so every month inherits the
    /// default list until edited) and an amount priced from the default
    /// selection. Month 1 is due one calendar month after the start date.
    ///
    /// # Errors
    ///
    /// Returns [`FeeError::InvalidInstallmentCount`] for a zero duration,
    /// [`FeeError::EmptySubjectSelection`] for an empty default selection,
    /// [`FeeError::UnknownSubject`] for an unlisted default subject, or
    /// [`FeeError::ScheduleError`] if a due date is out of range.
    pub fn create(
        admission_id: AdmissionId,
        default_subjects: Vec<String>,
        duration_months: u32,
        start_date: NaiveDate,
        prices: &SubjectPriceList,
        config: &BillingConfig,
    ) -> Result<Self> {
        if duration_months == 0 {
            return Err(FeeError::InvalidInstallmentCount(0));
        }
        if default_subjects.is_empty() {
            return Err(FeeError::EmptySubjectSelection);
        }

        let amount = month_amount(&default_subjects, prices, config)?;
        let mut bills = Vec::with_capacity(duration_months as usize);
        for month in 1..=duration_months {
            bills.push(MonthlyBill {
                subjects: Vec::new(),
                installment: Installment::new(month, due_date(start_date, month)?, amount),
            });
        }

        audit_log(
            &AuditEvent::new(BillingEventType::ScheduleCreated, admission_id.as_str())
                .with_amount(amount),
        );

        Ok(Self { admission_id, default_subjects, bills })
    }

    /// Returns the admission this cycle bills.
    #[must_use]
    pub fn admission_id(&self) -> &AdmissionId {
        &self.admission_id
    }

    /// Returns the admission's default subject selection.
    #[must_use]
    pub fn default_subjects(&self) -> &[String] {
        &self.default_subjects
    }

    /// Returns all monthly bills in month order.
    #[must_use]
    pub fn bills(&self) -> &[MonthlyBill] {
        &self.bills
    }

    fn bill_index(&self, month: u32) -> Result<usize> {
        if month == 0 || month as usize > self.bills.len() {
            return Err(FeeError::ScheduleError(format!(
                "month {month} is not in the billing cycle (1..={})",
                self.bills.len()
            )));
        }
        Ok((month - 1) as usize)
    }

    /// Resolves the effective subject selection for a month.
    ///
    /// Uses the month's own non-empty list, else the nearest earlier month's
    /// non-empty list, else the admission's default selection.
    ///
    /// # Errors
    ///
    /// Returns [`FeeError::ScheduleError`] for a month outside the cycle.
    pub fn effective_subjects(&self, month: u32) -> Result<&[String]> {
        let index = self.bill_index(month)?;
        for bill in self.bills[..=index].iter().rev() {
            if !bill.subjects.is_empty() {
                return Ok(&bill.subjects);
            }
        }
        Ok(&self.default_subjects)
    }

    /// Re-bills a future unpaid month at current subject prices.
    ///
    /// Passing `Some(subjects)` replaces the month's explicit selection
    /// first (an empty list reverts the month to inheritance); `None` keeps
    /// the selection and only re-reads prices. Returns the month's new
    /// amount.
    ///
    /// # Errors
    ///
    /// Returns [`FeeError::PaymentError`] if the month is settled (frozen)
    /// or not strictly after `today`, [`FeeError::ScheduleError`] for a
    /// month outside the cycle, and price-lookup errors as in
    /// [`month_amount`].
    pub fn rebill(
        &mut self,
        month: u32,
        subjects: Option<Vec<String>>,
        prices: &SubjectPriceList,
        today: NaiveDate,
        config: &BillingConfig,
    ) -> Result<Decimal> {
        let index = self.bill_index(month)?;
        if self.bills[index].installment.is_settled() {
            return Err(FeeError::PaymentError(format!("month {month} is frozen by payment")));
        }
        if self.bills[index].installment.due_date <= today {
            return Err(FeeError::PaymentError(format!(
                "month {month} is not in the future; only future unpaid months can be re-billed"
            )));
        }

        if let Some(selection) = subjects {
            self.bills[index].subjects = selection;
        }
        let effective = self.effective_subjects(month)?.to_vec();
        let amount = month_amount(&effective, prices, config)?;
        self.bills[index].installment.amount = amount;

        audit_log(
            &AuditEvent::new(BillingEventType::MonthRebilled, self.admission_id.as_str())
                .with_installment(month)
                .with_amount(amount),
        );

        Ok(amount)
    }

    /// Applies a payment to a month and freezes its subject selection.
    ///
    /// The effective (possibly inherited) selection is snapshotted onto the
    /// bill so that later edits to earlier months can no longer change what
    /// this month's payment covered.
    ///
    /// # Errors
    ///
    /// Propagates [`Installment::record_payment`] errors; returns
    /// [`FeeError::ScheduleError`] for a month outside the cycle.
    pub fn record_month_payment(
        &mut self,
        month: u32,
        details: PaymentDetails,
    ) -> Result<PaymentReceipt> {
        let index = self.bill_index(month)?;
        let effective = self.effective_subjects(month)?.to_vec();
        let receipt = self.bills[index].installment.record_payment(details)?;
        self.bills[index].subjects = effective;

        let mut event =
            AuditEvent::new(BillingEventType::PaymentRecorded, self.admission_id.as_str())
                .with_installment(month)
                .with_amount(receipt.paid_amount);
        if let Some(excess) = receipt.excess {
            event = event.with_excess(excess);
        }
        audit_log(&event);

        Ok(receipt)
    }

    /// Confirms clearance of a month paid with a clearing instrument.
    ///
    /// # Errors
    ///
    /// Propagates [`Installment::confirm_clearance`] errors; returns
    /// [`FeeError::ScheduleError`] for a month outside the cycle.
    pub fn confirm_month_clearance(&mut self, month: u32) -> Result<()> {
        let index = self.bill_index(month)?;
        self.bills[index].installment.confirm_clearance()?;
        audit_log(
            &AuditEvent::new(BillingEventType::ClearanceConfirmed, self.admission_id.as_str())
                .with_installment(month),
        );
        Ok(())
    }

    /// Derives overdue state for every pending month. Returns how many
    /// months flipped to overdue on this call.
    pub fn refresh_overdue(&mut self, today: NaiveDate, config: &BillingConfig) -> u32 {
        let mut flipped = 0;
        for bill in &mut self.bills {
            if bill.installment.refresh_overdue(today, config.overdue_grace_days) {
                flipped += 1;
                audit_log(
                    &AuditEvent::new(
                        BillingEventType::InstallmentOverdue,
                        self.admission_id.as_str(),
                    )
                    .with_installment(bill.installment.number),
                );
            }
        }
        flipped
    }

    /// Sums the currently billed amounts across all months.
    ///
    /// # Errors
    ///
    /// Returns [`FeeError::AmountOverflow`] on checked-addition overflow.
    pub fn total_billed(&self) -> Result<Decimal> {
        let mut total = Decimal::ZERO;
        for bill in &self.bills {
            total = total.checked_add(bill.installment.amount).ok_or_else(|| {
                FeeError::AmountOverflow("overflow summing monthly amounts".into())
            })?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installment::{InstallmentStatus, PaymentMethod};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn prices() -> SubjectPriceList {
        SubjectPriceList::new()
            .with_price("MATH", Decimal::new(1200, 0))
            .unwrap()
            .with_price("PHYSICS", Decimal::new(1500, 0))
            .unwrap()
            .with_price("CHEMISTRY", Decimal::new(1300, 0))
            .unwrap()
    }

    fn default_subjects() -> Vec<String> {
        vec!["MATH".to_owned(), "PHYSICS".to_owned()]
    }

    fn cycle() -> MonthlyBillingCycle {
        MonthlyBillingCycle::create(
            AdmissionId::new("adm-board-7").unwrap(),
            default_subjects(),
            6,
            date(2024, 1, 15),
            &prices(),
            &BillingConfig::default(),
        )
        .unwrap()
    }

    fn cash(amount: Decimal) -> PaymentDetails {
        PaymentDetails {
            paid_amount: amount,
            method: PaymentMethod::Cash,
            transaction_id: None,
            received_date: date(2024, 2, 1),
            remarks: None,
        }
    }

    // Default selection: 1200 + 1500 = 2700 taxable, 18% GST → 3186.
    const DEFAULT_MONTH_AMOUNT: i64 = 3186;

    // ========================================================================
    // Creation Tests
    // ========================================================================

    #[test]
    fn test_create_one_bill_per_month() {
        let cycle = cycle();
        assert_eq!(cycle.bills().len(), 6);
        let months: Vec<u32> = cycle.bills().iter().map(MonthlyBill::month).collect();
        assert_eq!(months, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_create_months_priced_from_defaults() {
        let cycle = cycle();
        for bill in cycle.bills() {
            assert_eq!(bill.installment.amount, Decimal::new(DEFAULT_MONTH_AMOUNT, 0));
            assert_eq!(bill.installment.status, InstallmentStatus::Pending);
            assert!(bill.subjects.is_empty());
        }
    }

    #[test]
    fn test_create_due_dates_monthly_from_start() {
        let cycle = cycle();
        assert_eq!(cycle.bills()[0].installment.due_date, date(2024, 2, 15));
        assert_eq!(cycle.bills()[5].installment.due_date, date(2024, 7, 15));
    }

    #[test]
    fn test_create_zero_duration_rejected() {
        let result = MonthlyBillingCycle::create(
            AdmissionId::new("adm-board-7").unwrap(),
            default_subjects(),
            0,
            date(2024, 1, 15),
            &prices(),
            &BillingConfig::default(),
        );
        assert!(matches!(result.unwrap_err(), FeeError::InvalidInstallmentCount(0)));
    }

    #[test]
    fn test_create_empty_defaults_rejected() {
        let result = MonthlyBillingCycle::create(
            AdmissionId::new("adm-board-7").unwrap(),
            Vec::new(),
            6,
            date(2024, 1, 15),
            &prices(),
            &BillingConfig::default(),
        );
        assert!(matches!(result.unwrap_err(), FeeError::EmptySubjectSelection));
    }

    #[test]
    fn test_create_unknown_default_subject_rejected() {
        let result = MonthlyBillingCycle::create(
            AdmissionId::new("adm-board-7").unwrap(),
            vec!["BIOLOGY".to_owned()],
            6,
            date(2024, 1, 15),
            &prices(),
            &BillingConfig::default(),
        );
        assert!(matches!(result.unwrap_err(), FeeError::UnknownSubject(_)));
    }

    // ========================================================================
    // Subject Inheritance Tests
    // ========================================================================

    #[test]
    fn test_unselected_month_inherits_default() {
        // Months 1-2 empty, month 3 empty: falls through to the default.
        let cycle = cycle();
        assert_eq!(cycle.effective_subjects(3).unwrap(), default_subjects().as_slice());
    }

    #[test]
    fn test_month_inherits_nearest_prior_selection() {
        let mut cycle = cycle();
        cycle
            .rebill(2, Some(vec!["MATH".to_owned()]), &prices(), date(2024, 1, 20), &BillingConfig::default())
            .unwrap();

        assert_eq!(cycle.effective_subjects(2).unwrap(), ["MATH".to_owned()].as_slice());
        // Months after 2 inherit month 2's selection, not the default.
        assert_eq!(cycle.effective_subjects(5).unwrap(), ["MATH".to_owned()].as_slice());
        // Month 1 is before the selection and still inherits the default.
        assert_eq!(cycle.effective_subjects(1).unwrap(), default_subjects().as_slice());
    }

    #[test]
    fn test_own_selection_wins_over_inheritance() {
        let mut cycle = cycle();
        let today = date(2024, 1, 20);
        let config = BillingConfig::default();
        cycle.rebill(2, Some(vec!["MATH".to_owned()]), &prices(), today, &config).unwrap();
        cycle.rebill(4, Some(vec!["CHEMISTRY".to_owned()]), &prices(), today, &config).unwrap();

        assert_eq!(cycle.effective_subjects(4).unwrap(), ["CHEMISTRY".to_owned()].as_slice());
        assert_eq!(cycle.effective_subjects(3).unwrap(), ["MATH".to_owned()].as_slice());
    }

    #[test]
    fn test_effective_subjects_unknown_month_rejected() {
        let cycle = cycle();
        assert!(cycle.effective_subjects(0).is_err());
        assert!(cycle.effective_subjects(7).is_err());
    }

    // ========================================================================
    // Re-billing Tests
    // ========================================================================

    #[test]
    fn test_rebill_reprices_month() {
        let mut cycle = cycle();
        // MATH only: 1200 taxable + 18% GST = 1416.
        let amount = cycle
            .rebill(3, Some(vec!["MATH".to_owned()]), &prices(), date(2024, 1, 20), &BillingConfig::default())
            .unwrap();

        assert_eq!(amount, Decimal::new(1416, 0));
        assert_eq!(cycle.bills()[2].installment.amount, Decimal::new(1416, 0));
        // Other months keep their amounts until they are themselves opened.
        assert_eq!(cycle.bills()[3].installment.amount, Decimal::new(DEFAULT_MONTH_AMOUNT, 0));
    }

    #[test]
    fn test_rebill_without_selection_rereads_prices() {
        let mut cycle = cycle();
        let raised = SubjectPriceList::new()
            .with_price("MATH", Decimal::new(1400, 0))
            .unwrap()
            .with_price("PHYSICS", Decimal::new(1500, 0))
            .unwrap();

        // No selection change; amount tracks the new price list.
        let amount = cycle
            .rebill(2, None, &raised, date(2024, 1, 20), &BillingConfig::default())
            .unwrap();
        assert_eq!(amount, Decimal::new(3422, 0)); // 2900 + 18%
    }

    #[test]
    fn test_rebill_empty_selection_reverts_to_inheritance() {
        let mut cycle = cycle();
        let today = date(2024, 1, 20);
        let config = BillingConfig::default();
        cycle.rebill(2, Some(vec!["MATH".to_owned()]), &prices(), today, &config).unwrap();

        let amount = cycle.rebill(2, Some(Vec::new()), &prices(), today, &config).unwrap();
        assert_eq!(amount, Decimal::new(DEFAULT_MONTH_AMOUNT, 0));
        assert_eq!(cycle.effective_subjects(2).unwrap(), default_subjects().as_slice());
    }

    #[test]
    fn test_rebill_past_month_rejected() {
        let mut cycle = cycle();
        // Month 1 is due 2024-02-15; by March it is no longer future.
        let result = cycle.rebill(
            1,
            Some(vec!["MATH".to_owned()]),
            &prices(),
            date(2024, 3, 1),
            &BillingConfig::default(),
        );
        assert!(matches!(result.unwrap_err(), FeeError::PaymentError(_)));
    }

    #[test]
    fn test_rebill_due_day_rejected() {
        // The due day itself is not "future".
        let mut cycle = cycle();
        let result =
            cycle.rebill(1, None, &prices(), date(2024, 2, 15), &BillingConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_rebill_paid_month_rejected() {
        let mut cycle = cycle();
        cycle.record_month_payment(2, cash(Decimal::new(DEFAULT_MONTH_AMOUNT, 0))).unwrap();

        let result = cycle.rebill(
            2,
            Some(vec!["MATH".to_owned()]),
            &prices(),
            date(2024, 1, 20),
            &BillingConfig::default(),
        );
        assert!(matches!(result.unwrap_err(), FeeError::PaymentError(_)));
    }

    // ========================================================================
    // Payment / Freeze Tests
    // ========================================================================

    #[test]
    fn test_payment_freezes_inherited_subjects() {
        let mut cycle = cycle();
        let today = date(2024, 1, 20);
        let config = BillingConfig::default();
        cycle.rebill(2, Some(vec!["MATH".to_owned()]), &prices(), today, &config).unwrap();

        // Month 3 inherits [MATH] and is paid; the snapshot is taken.
        cycle.record_month_payment(3, cash(Decimal::new(1416, 0))).unwrap();
        assert_eq!(cycle.bills()[2].subjects, vec!["MATH".to_owned()]);

        // Changing month 2 afterwards no longer affects month 3's record.
        cycle.rebill(2, Some(vec!["CHEMISTRY".to_owned()]), &prices(), today, &config).unwrap();
        assert_eq!(cycle.effective_subjects(3).unwrap(), ["MATH".to_owned()].as_slice());
    }

    #[test]
    fn test_cheque_month_clears_to_paid() {
        let mut cycle = cycle();
        let details = PaymentDetails {
            paid_amount: Decimal::new(DEFAULT_MONTH_AMOUNT, 0),
            method: PaymentMethod::Cheque { cheque_date: date(2024, 2, 10) },
            transaction_id: Some("CHQ-77".to_owned()),
            received_date: date(2024, 2, 12),
            remarks: None,
        };
        let receipt = cycle.record_month_payment(1, details).unwrap();
        assert_eq!(receipt.status, InstallmentStatus::PendingClearance);

        cycle.confirm_month_clearance(1).unwrap();
        assert_eq!(cycle.bills()[0].installment.status, InstallmentStatus::Paid);
    }

    #[test]
    fn test_refresh_overdue_counts_flips() {
        let mut cycle = cycle();
        cycle.record_month_payment(1, cash(Decimal::new(DEFAULT_MONTH_AMOUNT, 0))).unwrap();

        // Months 2 and 3 are due 2024-03-15 and 2024-04-15.
        let flipped = cycle.refresh_overdue(date(2024, 4, 16), &BillingConfig::default());
        assert_eq!(flipped, 2);
        assert_eq!(cycle.bills()[1].installment.status, InstallmentStatus::Overdue);
        assert_eq!(cycle.bills()[3].installment.status, InstallmentStatus::Pending);
    }

    #[test]
    fn test_total_billed() {
        let cycle = cycle();
        assert_eq!(cycle.total_billed().unwrap(), Decimal::new(DEFAULT_MONTH_AMOUNT * 6, 0));
    }

    #[test]
    fn test_cycle_roundtrip() {
        let cycle = cycle();
        let json = serde_json::to_string(&cycle).unwrap();
        let parsed: MonthlyBillingCycle = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.bills(), cycle.bills());
        assert_eq!(parsed.default_subjects(), cycle.default_subjects());
    }
}

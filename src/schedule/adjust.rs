//! Waiver and carry-forward adjustment.
//!
//! Applies the fee waiver to the base fee before tax, then folds the
//! previous cycle's outstanding balance into the total after tax. The
//! carry-forward balance was already taxed in its own cycle, so it never
//! re-enters the taxable base.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    config::TaxConfig,
    error::{FeeError, Result},
    schedule::tax::gst_breakup,
};

/// Adjusted admission totals before the down payment is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustedTotals {
    /// Taxable base after the waiver floor.
    pub taxable_amount: Decimal,
    /// Central GST on the taxable base, unrounded.
    pub cgst_amount: Decimal,
    /// State GST on the taxable base, unrounded.
    pub sgst_amount: Decimal,
    /// Taxable base plus both tax components plus the carry-forward balance.
    pub total_fees: Decimal,
}

/// Applies the fee waiver to the base fee.
///
/// A waiver larger than the base fee clamps the taxable amount to zero
/// rather than going negative; the floor is deliberate billing policy, not
/// an error.
///
/// # Errors
///
/// Returns [`FeeError::AmountOverflow`] on checked-subtraction overflow.
pub fn apply_waiver(base_fees: Decimal, fee_waiver: Decimal) -> Result<Decimal> {
    let reduced = base_fees
        .checked_sub(fee_waiver)
        .ok_or_else(|| FeeError::AmountOverflow("overflow applying fee waiver".into()))?;
    Ok(reduced.max(Decimal::ZERO))
}

/// Computes the adjusted admission totals.
///
/// The waiver reduces the tax base; the carry-forward balance is added after
/// tax so it is never taxed twice.
///
/// # Errors
///
/// Returns [`FeeError::InvalidAmount`] if any input is negative, or
/// [`FeeError::AmountOverflow`] on checked-arithmetic overflow.
///
/// # Examples
///
/// ```
/// use fee_schedule_engine::{config::TaxConfig, schedule::adjust::adjust};
/// use rust_decimal::Decimal;
///
/// let totals = adjust(
///     Decimal::new(10000, 0),
///     Decimal::new(1000, 0),
///     Decimal::ZERO,
///     &TaxConfig::default(),
/// )
/// .unwrap();
/// assert_eq!(totals.taxable_amount, Decimal::new(9000, 0));
/// assert_eq!(totals.total_fees, Decimal::new(10620, 0));
/// ```
pub fn adjust(
    base_fees: Decimal,
    fee_waiver: Decimal,
    previous_balance: Decimal,
    tax: &TaxConfig,
) -> Result<AdjustedTotals> {
    for (name, amount) in [
        ("base_fees", base_fees),
        ("fee_waiver", fee_waiver),
        ("previous_balance", previous_balance),
    ] {
        if amount.is_sign_negative() {
            return Err(FeeError::InvalidAmount(format!(
                "{name} cannot be negative, got {amount}"
            )));
        }
    }

    let taxable_amount = apply_waiver(base_fees, fee_waiver)?;
    let breakup = gst_breakup(taxable_amount, tax)?;
    let total_fees = taxable_amount
        .checked_add(breakup.total()?)
        .and_then(|v| v.checked_add(previous_balance))
        .ok_or_else(|| FeeError::AmountOverflow("overflow computing total fees".into()))?;

    Ok(AdjustedTotals {
        taxable_amount,
        cgst_amount: breakup.cgst,
        sgst_amount: breakup.sgst,
        total_fees,
    })
}

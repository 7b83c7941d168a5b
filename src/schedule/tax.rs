//! GST computation.
//!
//! CGST and SGST are computed as two equal-status components on the same
//! taxable base; tax is never compounded. No rounding happens here:
//! rounding policy is owned by the installment splitter so that repeated
//! arithmetic over the breakup stays exact.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    config::TaxConfig,
    error::{FeeError, Result},
};

/// Computes one tax component on a taxable base.
///
/// Returns `taxable_amount × rate_percent / 100` as an unrounded decimal.
/// Negative taxable amounts are a caller contract violation: the waiver
/// adjuster clamps the taxable base to zero before tax is ever computed.
///
/// # Errors
///
/// Returns [`FeeError::AmountOverflow`] on checked-arithmetic overflow.
///
/// # Examples
///
/// ```
/// use fee_schedule_engine::schedule::tax::compute_tax;
/// use rust_decimal::Decimal;
///
/// let cgst = compute_tax(Decimal::new(9000, 0), Decimal::new(9, 0)).unwrap();
/// assert_eq!(cgst, Decimal::new(810, 0));
/// ```
pub fn compute_tax(taxable_amount: Decimal, rate_percent: Decimal) -> Result<Decimal> {
    taxable_amount
        .checked_mul(rate_percent)
        .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(|| FeeError::AmountOverflow("overflow computing tax component".into()))
}

/// CGST/SGST breakup on one taxable base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GstBreakup {
    /// Central GST component, unrounded.
    pub cgst: Decimal,
    /// State GST component, unrounded.
    pub sgst: Decimal,
}

impl GstBreakup {
    /// Returns the combined tax amount.
    ///
    /// # Errors
    ///
    /// Returns [`FeeError::AmountOverflow`] on checked-addition overflow.
    pub fn total(&self) -> Result<Decimal> {
        self.cgst
            .checked_add(self.sgst)
            .ok_or_else(|| FeeError::AmountOverflow("overflow summing tax components".into()))
    }
}

/// Computes the CGST/SGST breakup for a taxable base.
///
/// Both components use the same base; the second component is not applied
/// on top of the first.
///
/// # Errors
///
/// Returns [`FeeError::AmountOverflow`] on checked-arithmetic overflow.
pub fn gst_breakup(taxable_amount: Decimal, tax: &TaxConfig) -> Result<GstBreakup> {
    Ok(GstBreakup {
        cgst: compute_tax(taxable_amount, tax.cgst_rate_percent)?,
        sgst: compute_tax(taxable_amount, tax.sgst_rate_percent)?,
    })
}

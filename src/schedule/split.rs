//! Installment splitting.
//!
//! Splits a remaining amount into an ordered list of installment amounts
//! whose sum equals the remaining amount exactly. Non-final installments are
//! rounded up to the next whole currency unit (billing policy in the
//! institution's favor, so students never see a sub-unit installment) and
//! the final installment absorbs all rounding residue.
//!
//! Naive equal division (`remaining / count` repeated `count` times) either
//! strands a fractional remainder or, if each share is rounded, drifts above
//! or below the remaining amount. The ceiling/residual scheme here keeps the
//! schedule exact in total.

use rust_decimal::Decimal;

use crate::error::{FeeError, Result};

/// Splits a remaining amount into `count` ordered installment amounts.
///
/// - `count == 1`: the amount passes through unchanged, fractional part and
///   all: a single payment has no drift risk, so no ceiling is applied.
/// - `count > 1`: installments `1..count-1` each equal
///   `ceil(remaining / count)`; the last equals
///   `max(0, remaining − per × (count − 1))` and may be fractional.
///
/// The amounts sum to `remaining_amount` exactly whenever the residual is
/// non-negative. When the remaining amount is smaller than `count` whole
/// units the residual clamp engages and the schedule over-collects by the
/// shortfall (e.g. `split(1, 3)` → `[1, 1, 0]`); that corner inherits the
/// institution-favoring rounding policy.
///
/// # Errors
///
/// Returns [`FeeError::InvalidInstallmentCount`] if `count` is zero,
/// [`FeeError::InvalidAmount`] if `remaining_amount` is negative, or
/// [`FeeError::AmountOverflow`] on checked-arithmetic overflow.
///
/// # Examples
///
/// ```
/// use fee_schedule_engine::schedule::split::split;
/// use rust_decimal::Decimal;
///
/// let amounts = split(Decimal::new(8620, 0), 3).unwrap();
/// assert_eq!(amounts, vec![
///     Decimal::new(2874, 0),
///     Decimal::new(2874, 0),
///     Decimal::new(2872, 0),
/// ]);
/// ```
pub fn split(remaining_amount: Decimal, count: u32) -> Result<Vec<Decimal>> {
    if count == 0 {
        return Err(FeeError::InvalidInstallmentCount(0));
    }
    if remaining_amount.is_sign_negative() {
        return Err(FeeError::InvalidAmount(format!(
            "remaining amount cannot be negative, got {remaining_amount}"
        )));
    }
    if count == 1 {
        return Ok(vec![remaining_amount]);
    }

    let per_installment = remaining_amount
        .checked_div(Decimal::from(count))
        .ok_or_else(|| FeeError::AmountOverflow("overflow dividing remaining amount".into()))?
        .ceil();
    let collected_before_last = per_installment
        .checked_mul(Decimal::from(count - 1))
        .ok_or_else(|| FeeError::AmountOverflow("overflow computing installment total".into()))?;
    let last = remaining_amount
        .checked_sub(collected_before_last)
        .ok_or_else(|| FeeError::AmountOverflow("overflow computing final installment".into()))?
        .max(Decimal::ZERO);

    let mut amounts = vec![per_installment; (count - 1) as usize];
    amounts.push(last);
    Ok(amounts)
}

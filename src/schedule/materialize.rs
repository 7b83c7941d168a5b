//! Schedule materialization.
//!
//! Turns a list of split amounts into pending [`Installment`] records with
//! calendar-month due dates and permanent 1-based numbers. Every due date is
//! computed from the schedule start date, never from the previous due date,
//! so a short month (Jan 31 to Feb 29) does not shift later installments.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    error::{FeeError, Result},
    installment::Installment,
};

/// Computes the due date for one installment number.
///
/// Installment 1 is due one calendar month after the start date, installment
/// 2 two months after, and so on. Month arithmetic clamps to the last valid
/// day of a shorter month (Jan 31 + 1 month → Feb 29 in a leap year).
///
/// # Errors
///
/// Returns [`FeeError::ScheduleError`] if the date leaves the representable
/// calendar range.
pub fn due_date(start_date: NaiveDate, installment_number: u32) -> Result<NaiveDate> {
    start_date.checked_add_months(Months::new(installment_number)).ok_or_else(|| {
        FeeError::ScheduleError(format!(
            "due date for installment {installment_number} from {start_date} is out of range"
        ))
    })
}

/// Materializes split amounts into pending installments.
///
/// Numbers are assigned sequentially from 1 in array order and are permanent
/// identifiers for later payment lookups.
///
/// # Errors
///
/// Returns [`FeeError::ScheduleError`] if a due date leaves the
/// representable calendar range.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fee_schedule_engine::schedule::materialize::materialize;
/// use rust_decimal::Decimal;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
/// let schedule = materialize(&[Decimal::new(500, 0), Decimal::new(500, 0)], start).unwrap();
///
/// assert_eq!(schedule[0].due_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// assert_eq!(schedule[1].due_date, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
/// ```
pub fn materialize(amounts: &[Decimal], start_date: NaiveDate) -> Result<Vec<Installment>> {
    let mut installments = Vec::with_capacity(amounts.len());
    for (index, amount) in amounts.iter().enumerate() {
        let number = u32::try_from(index + 1)
            .map_err(|_| FeeError::ScheduleError("installment count exceeds u32".into()))?;
        installments.push(Installment::new(number, due_date(start_date, number)?, *amount));
    }
    Ok(installments)
}

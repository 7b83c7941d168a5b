use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::schedule::{materialize::materialize, split::split};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn test_split_sum_invariant(paise in 0i64..1_000_000_000, count in 2u32..=36) {
        let remaining = Decimal::new(paise, 2);
        let amounts = split(remaining, count).unwrap();
        prop_assert_eq!(amounts.len(), count as usize);

        let per = amounts[0];
        let collected_before_last = per * Decimal::from(count - 1);
        let total: Decimal = amounts.iter().copied().sum();

        if collected_before_last <= remaining {
            // Residual non-negative: the schedule is exact in total.
            prop_assert_eq!(total, remaining);
        } else {
            // Degenerate clamp corner: last installment floors at zero.
            prop_assert_eq!(*amounts.last().unwrap(), Decimal::ZERO);
            prop_assert_eq!(total, collected_before_last);
        }
    }

    #[test]
    fn test_split_ceiling_invariant(paise in 0i64..1_000_000_000, count in 2u32..=36) {
        let remaining = Decimal::new(paise, 2);
        let amounts = split(remaining, count).unwrap();

        let per = (remaining / Decimal::from(count)).ceil();
        for amount in &amounts[..amounts.len() - 1] {
            prop_assert_eq!(*amount, per);
        }
        let last = *amounts.last().unwrap();
        prop_assert!(last <= per);
        prop_assert!(last >= Decimal::ZERO);
    }

    #[test]
    fn test_split_single_installment_passthrough(paise in 0i64..1_000_000_000) {
        let remaining = Decimal::new(paise, 2);
        let amounts = split(remaining, 1).unwrap();
        prop_assert_eq!(amounts, vec![remaining]);
    }

    #[test]
    fn test_materialized_due_dates_strictly_increase(
        year in 2020i32..=2032,
        month in 1u32..=12,
        day in 1u32..=28,
        count in 1usize..=24,
    ) {
        let start = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        let schedule = materialize(&vec![Decimal::ONE; count], start).unwrap();

        prop_assert!(schedule[0].due_date > start);
        for pair in schedule.windows(2) {
            prop_assert!(pair[0].due_date < pair[1].due_date);
            prop_assert_eq!(pair[0].number + 1, pair[1].number);
        }
    }
}

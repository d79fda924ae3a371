//! Expense lifecycle tests
//!
//! Tests for the salary-expense rules: the amount must match the employee's
//! monthly salary, and only one salary expense per employee is accepted per
//! calendar month.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{salary_month_bounds, validate_positive_amount, ExpenseCategory};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// The month window runs from the first of the month to the first of
    /// the next month
    #[test]
    fn test_month_bounds_mid_month() {
        let (start, next) = salary_month_bounds(date(2026, 7, 18));
        assert_eq!(start, date(2026, 7, 1));
        assert_eq!(next, date(2026, 8, 1));
    }

    /// December rolls over into January of the next year
    #[test]
    fn test_month_bounds_december_rollover() {
        let (start, next) = salary_month_bounds(date(2026, 12, 31));
        assert_eq!(start, date(2026, 12, 1));
        assert_eq!(next, date(2027, 1, 1));
    }

    /// Leap-year February is covered by the same arithmetic
    #[test]
    fn test_month_bounds_leap_february() {
        let (start, next) = salary_month_bounds(date(2028, 2, 29));
        assert_eq!(start, date(2028, 2, 1));
        assert_eq!(next, date(2028, 3, 1));
    }

    /// The window is half-open: the first of the next month is outside it
    #[test]
    fn test_month_window_half_open() {
        let (start, next) = salary_month_bounds(date(2026, 7, 18));

        let in_window = |d: NaiveDate| d >= start && d < next;
        assert!(in_window(date(2026, 7, 1)));
        assert!(in_window(date(2026, 7, 31)));
        assert!(!in_window(date(2026, 8, 1)));
        assert!(!in_window(date(2026, 6, 30)));
    }

    /// A second salary for the same employee in the same window is the
    /// duplicate case
    #[test]
    fn test_duplicate_salary_detection() {
        let (start, next) = salary_month_bounds(date(2026, 7, 18));
        let existing = vec![date(2026, 7, 3)];

        let is_duplicate = existing.iter().any(|d| *d >= start && *d < next);
        assert!(is_duplicate);

        let existing_last_month = vec![date(2026, 6, 3)];
        let is_duplicate = existing_last_month.iter().any(|d| *d >= start && *d < next);
        assert!(!is_duplicate);
    }

    /// Salary amounts must match the employee's monthly salary exactly
    #[test]
    fn test_salary_amount_match() {
        let monthly_salary = dec("25000.00");

        assert_eq!(dec("25000.00"), monthly_salary);
        assert_ne!(dec("25000.01"), monthly_salary);
        assert_ne!(dec("24999.99"), monthly_salary);
    }

    /// Expense amounts must be strictly positive
    #[test]
    fn test_amount_must_be_positive() {
        assert!(validate_positive_amount(dec("0.01")).is_ok());
        assert!(validate_positive_amount(dec("0")).is_err());
        assert!(validate_positive_amount(dec("-5")).is_err());
    }

    /// Only the salary category carries an employee link
    #[test]
    fn test_employee_link_by_category() {
        for category in [
            ExpenseCategory::Material,
            ExpenseCategory::Utility,
            ExpenseCategory::Rent,
            ExpenseCategory::Maintenance,
            ExpenseCategory::Other,
        ] {
            assert_ne!(category.as_str(), "salary");
        }
        assert_eq!(ExpenseCategory::Salary.as_str(), "salary");
    }

    /// Category wire names parse back to the enum
    #[test]
    fn test_category_roundtrip() {
        let categories = [
            ExpenseCategory::Salary,
            ExpenseCategory::Material,
            ExpenseCategory::Utility,
            ExpenseCategory::Rent,
            ExpenseCategory::Maintenance,
            ExpenseCategory::Other,
        ];
        for category in categories {
            assert_eq!(ExpenseCategory::from_str(category.as_str()), Some(category));
        }
        assert_eq!(ExpenseCategory::from_str("travel"), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;
    use chrono::Datelike;

    /// Strategy for arbitrary dates in a workable range
    fn date_strategy() -> impl Strategy<Value = NaiveDate> {
        (2020i32..2035, 1u32..=12, 1u32..=28)
            .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Both bounds fall on the first of a month and the input date is
        /// inside the window
        #[test]
        fn prop_month_bounds_contain_date(today in date_strategy()) {
            let (start, next) = salary_month_bounds(today);

            prop_assert_eq!(start.day(), 1);
            prop_assert_eq!(next.day(), 1);
            prop_assert!(start <= today);
            prop_assert!(today < next);
        }

        /// The window always spans a single calendar month (28 to 31 days)
        #[test]
        fn prop_month_window_length(today in date_strategy()) {
            let (start, next) = salary_month_bounds(today);
            let days = (next - start).num_days();

            prop_assert!((28..=31).contains(&days));
            prop_assert_eq!(start.month(), today.month());
        }

        /// Two dates fall in the same window exactly when they share a
        /// calendar month
        #[test]
        fn prop_same_window_means_same_month(a in date_strategy(), b in date_strategy()) {
            let (start, next) = salary_month_bounds(a);
            let b_in_window = b >= start && b < next;

            prop_assert_eq!(
                b_in_window,
                a.year() == b.year() && a.month() == b.month()
            );
        }
    }
}

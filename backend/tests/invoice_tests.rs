//! Invoice lifecycle tests
//!
//! Tests for invoice numbering, amount consistency and the revert/reapply
//! arithmetic behind edit and delete.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::{
    format_invoice_number, next_invoice_number, parse_invoice_number, validate_invoice_amounts,
    validate_line_items, InvoiceLineItem,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn item(quantity: i32, price: &str) -> InvoiceLineItem {
    InvoiceLineItem {
        product_id: Uuid::new_v4(),
        quantity,
        price: dec(price),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Invoice numbers are zero-padded to five digits
    #[test]
    fn test_invoice_number_formatting() {
        assert_eq!(format_invoice_number(1), "00001");
        assert_eq!(format_invoice_number(42), "00042");
        assert_eq!(format_invoice_number(99999), "99999");
        // Width is a minimum, not a cap
        assert_eq!(format_invoice_number(123456), "123456");
    }

    /// Formatted numbers parse back to their numeric value
    #[test]
    fn test_invoice_number_parse_roundtrip() {
        assert_eq!(parse_invoice_number("00001"), Some(1));
        assert_eq!(parse_invoice_number("00423"), Some(423));
        assert_eq!(parse_invoice_number("garbage"), None);
    }

    /// Numbering starts at 1 and always advances past the maximum
    #[test]
    fn test_next_invoice_number() {
        assert_eq!(next_invoice_number(None), 1);
        assert_eq!(next_invoice_number(Some(1)), 2);
        assert_eq!(next_invoice_number(Some(41)), 42);
    }

    /// Deleted invoices keep their number; allocation never reuses it
    #[test]
    fn test_numbers_not_reused_after_delete() {
        // Simulate: create 1..=3, soft-delete #2, create again
        let mut all_numbers = vec![1i64, 2, 3];
        let deleted = 2i64;

        let next = next_invoice_number(all_numbers.iter().max().copied());
        all_numbers.push(next);

        assert_eq!(next, 4);
        assert!(all_numbers.contains(&deleted));
    }

    /// Paid and due must add up to the total
    #[test]
    fn test_amount_consistency() {
        assert!(validate_invoice_amounts(dec("150"), dec("100"), dec("50")).is_ok());
        assert!(validate_invoice_amounts(dec("150"), dec("100"), dec("60")).is_err());
        assert!(validate_invoice_amounts(dec("-1"), dec("-1"), dec("0")).is_err());
    }

    /// Line items need a positive quantity and a non-negative price
    #[test]
    fn test_line_item_validation() {
        assert!(validate_line_items(&[item(3, "25.00")]).is_ok());
        assert!(validate_line_items(&[]).is_err());
        assert!(validate_line_items(&[item(0, "25.00")]).is_err());
        assert!(validate_line_items(&[item(1, "-0.01")]).is_err());
    }

    /// Customer totals after create-then-delete return to the baseline
    #[test]
    fn test_customer_totals_revert() {
        let (mut purchase, mut paid, mut due) = (dec("1000"), dec("700"), dec("300"));
        let baseline = (purchase, paid, due);

        // Invoice of 150 = 100 paid + 50 due
        purchase += dec("150");
        paid += dec("100");
        due += dec("50");

        // Delete reverts the same amounts
        purchase -= dec("150");
        paid -= dec("100");
        due -= dec("50");

        assert_eq!((purchase, paid, due), baseline);
    }

    /// Reserved quantities after create-then-delete return to the baseline
    #[test]
    fn test_reserved_revert() {
        let mut reserved = 7i32;
        let baseline = reserved;

        reserved += 3; // create with qty 3
        reserved = (reserved - 3).max(0); // delete releases it, floored at 0

        assert_eq!(reserved, baseline);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Formatting and parsing are inverse for any plausible number
        #[test]
        fn prop_format_parse_roundtrip(n in 1i64..10_000_000) {
            prop_assert_eq!(parse_invoice_number(&format_invoice_number(n)), Some(n));
        }

        /// Allocated numbers are strictly increasing and unique regardless
        /// of deletions in between
        #[test]
        fn prop_numbers_strictly_increasing(
            deletions in prop::collection::vec(any::<bool>(), 1..50)
        ) {
            let mut numbers: Vec<i64> = Vec::new();

            for delete_after in deletions {
                let next = next_invoice_number(numbers.iter().max().copied());
                prop_assert!(numbers.iter().all(|&n| n < next));
                numbers.push(next);
                // A deletion keeps the number in the allocation set
                let _ = delete_after;
            }

            let mut sorted = numbers.clone();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), numbers.len());
        }

        /// Zero-padded form is always at least five characters and numeric
        #[test]
        fn prop_format_width(n in 1i64..10_000_000) {
            let formatted = format_invoice_number(n);
            prop_assert!(formatted.len() >= 5);
            prop_assert!(formatted.chars().all(|c| c.is_ascii_digit()));
        }

        /// Amount validation accepts exactly the consistent splits
        #[test]
        fn prop_amounts_split(total in 0i64..1_000_000, paid in 0i64..1_000_000) {
            let total = Decimal::new(total, 2);
            let paid = Decimal::new(paid, 2);

            if paid <= total {
                let due = total - paid;
                prop_assert!(validate_invoice_amounts(total, paid, due).is_ok());
            } else {
                // paid > total forces a negative due, which must be rejected
                let due = total - paid;
                prop_assert!(validate_invoice_amounts(total, paid, due).is_err());
            }
        }
    }
}

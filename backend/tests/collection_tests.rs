//! Collection tests
//!
//! Tests for payments received against customer dues:
//! - A collection may never exceed the outstanding due
//! - Customer totals and the ledger move together

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{BalanceSnapshot, CollectionMethod};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Simulation helpers mirroring the service semantics
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct CustomerTotals {
    total_purchase_amount: Decimal,
    total_paid_amount: Decimal,
    total_due: Decimal,
}

/// Apply a collection to the customer totals, rejecting over-payment the
/// way the service does before writing anything.
fn simulate_collection(
    customer: &mut CustomerTotals,
    balance: &mut BalanceSnapshot,
    amount: Decimal,
) -> Result<(), String> {
    if amount <= Decimal::ZERO {
        return Err("Amount must be positive".to_string());
    }
    if amount > customer.total_due {
        return Err(format!(
            "Collection amount {} exceeds outstanding due {}",
            amount, customer.total_due
        ));
    }

    customer.total_paid_amount += amount;
    customer.total_due -= amount;
    balance.apply_inflow(amount, -amount);
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn customer() -> CustomerTotals {
        CustomerTotals {
            total_purchase_amount: dec("1000"),
            total_paid_amount: dec("600"),
            total_due: dec("400"),
        }
    }

    /// A collection moves due into paid on the customer
    #[test]
    fn test_collection_updates_customer() {
        let mut c = customer();
        let mut balance = BalanceSnapshot::default();
        balance.apply_inflow(dec("600"), dec("400"));

        simulate_collection(&mut c, &mut balance, dec("150")).unwrap();

        assert_eq!(c.total_paid_amount, dec("750"));
        assert_eq!(c.total_due, dec("250"));
        assert_eq!(c.total_purchase_amount, dec("1000"));
    }

    /// The ledger gains cash and loses unpaid by the same amount
    #[test]
    fn test_collection_updates_ledger() {
        let mut c = customer();
        let mut balance = BalanceSnapshot::default();
        balance.apply_inflow(dec("600"), dec("400"));

        simulate_collection(&mut c, &mut balance, dec("150")).unwrap();

        assert_eq!(balance.total_paid, dec("750"));
        assert_eq!(balance.current_balance, dec("750"));
        assert_eq!(balance.total_unpaid, dec("250"));
    }

    /// A collection larger than the due is rejected with nothing written
    #[test]
    fn test_overpayment_rejected() {
        let mut c = customer();
        let mut balance = BalanceSnapshot::default();
        balance.apply_inflow(dec("600"), dec("400"));

        let customer_before = c;
        let balance_before = balance;

        let err = simulate_collection(&mut c, &mut balance, dec("400.01")).unwrap_err();

        assert!(err.contains("exceeds"));
        assert_eq!(c, customer_before);
        assert_eq!(balance, balance_before);
    }

    /// Collecting exactly the outstanding due clears it
    #[test]
    fn test_exact_due_collection() {
        let mut c = customer();
        let mut balance = BalanceSnapshot::default();
        balance.apply_inflow(dec("600"), dec("400"));

        simulate_collection(&mut c, &mut balance, dec("400")).unwrap();

        assert_eq!(c.total_due, Decimal::ZERO);
        assert_eq!(balance.total_unpaid, Decimal::ZERO);
    }

    /// Zero and negative amounts are invalid
    #[test]
    fn test_non_positive_amount_rejected() {
        let mut c = customer();
        let mut balance = BalanceSnapshot::default();

        assert!(simulate_collection(&mut c, &mut balance, dec("0")).is_err());
        assert!(simulate_collection(&mut c, &mut balance, dec("-10")).is_err());
    }

    /// Payment method wire names
    #[test]
    fn test_method_wire_names() {
        assert_eq!(CollectionMethod::Cash.as_str(), "cash");
        assert_eq!(CollectionMethod::Cheque.as_str(), "cheque");
        assert_eq!(CollectionMethod::MobileBanking.as_str(), "mobile_banking");
        assert_eq!(CollectionMethod::BankTransfer.as_str(), "bank_transfer");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// An accepted collection never drives the due negative
        #[test]
        fn prop_due_never_negative(
            due in amount_strategy(),
            amount in amount_strategy()
        ) {
            let mut c = CustomerTotals {
                total_purchase_amount: due,
                total_paid_amount: Decimal::ZERO,
                total_due: due,
            };
            let mut balance = BalanceSnapshot::default();
            balance.apply_inflow(Decimal::ZERO, due);

            match simulate_collection(&mut c, &mut balance, amount) {
                Ok(()) => prop_assert!(c.total_due >= Decimal::ZERO),
                Err(_) => prop_assert_eq!(c.total_due, due),
            }
        }

        /// Paid plus due is conserved by collections
        #[test]
        fn prop_collection_conserves_totals(
            due in amount_strategy(),
            paid in amount_strategy(),
            amount in amount_strategy()
        ) {
            let mut c = CustomerTotals {
                total_purchase_amount: paid + due,
                total_paid_amount: paid,
                total_due: due,
            };
            let mut balance = BalanceSnapshot::default();
            balance.apply_inflow(paid, due);

            let sum_before = c.total_paid_amount + c.total_due;
            let _ = simulate_collection(&mut c, &mut balance, amount);

            prop_assert_eq!(c.total_paid_amount + c.total_due, sum_before);
            prop_assert_eq!(c.total_purchase_amount, sum_before);
        }

        /// Ledger cash and unpaid shift by exactly the collected amount
        #[test]
        fn prop_ledger_shift_matches_amount(
            due in amount_strategy(),
            amount in amount_strategy()
        ) {
            prop_assume!(amount <= due);

            let mut c = CustomerTotals {
                total_purchase_amount: due,
                total_paid_amount: Decimal::ZERO,
                total_due: due,
            };
            let mut balance = BalanceSnapshot::default();
            balance.apply_inflow(Decimal::ZERO, due);

            let cash_before = balance.current_balance;
            let unpaid_before = balance.total_unpaid;

            simulate_collection(&mut c, &mut balance, amount).unwrap();

            prop_assert_eq!(balance.current_balance - cash_before, amount);
            prop_assert_eq!(unpaid_before - balance.total_unpaid, amount);
        }
    }
}

//! Balance ledger tests
//!
//! Tests for the running-balance bookkeeping including:
//! - Lazy creation on the first financial event
//! - The cash invariant current_balance = total_paid - total_expense
//! - Expense rejection when the cash balance would go negative

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{BalanceSnapshot, LedgerError};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Balance starts absent; the first invoice creates it with the paid
    /// amount as cash on hand.
    #[test]
    fn test_first_invoice_creates_balance() {
        let mut balance = BalanceSnapshot::default();
        balance.apply_inflow(dec("500"), dec("200"));

        assert_eq!(balance.total_paid, dec("500"));
        assert_eq!(balance.total_unpaid, dec("200"));
        assert_eq!(balance.current_balance, dec("500"));
        assert_eq!(balance.total_expense, dec("0"));
    }

    /// Invoice of paid=500/due=200 followed by an expense of 150.
    #[test]
    fn test_invoice_then_expense_scenario() {
        let mut balance = BalanceSnapshot::default();
        balance.apply_inflow(dec("500"), dec("200"));
        balance.apply_expense(dec("150")).unwrap();

        assert_eq!(balance.total_paid, dec("500"));
        assert_eq!(balance.total_unpaid, dec("200"));
        assert_eq!(balance.current_balance, dec("350"));
        assert_eq!(balance.total_expense, dec("150"));
    }

    /// An expense exceeding the cash balance is rejected and the snapshot
    /// is untouched.
    #[test]
    fn test_overdraft_expense_rejected() {
        let mut balance = BalanceSnapshot::default();
        balance.apply_inflow(dec("100"), dec("0"));

        let before = balance;
        let err = balance.apply_expense(dec("150")).unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                available: dec("100"),
                requested: dec("150"),
            }
        );
        assert_eq!(balance, before);
    }

    /// An expense against an absent balance is an overdraft by definition.
    #[test]
    fn test_expense_on_absent_balance_rejected() {
        let mut balance = BalanceSnapshot::default();
        assert!(balance.apply_expense(dec("1")).is_err());
        assert_eq!(balance, BalanceSnapshot::default());
    }

    /// Editing an invoice from paid=100/due=50 to paid=80/due=70 moves the
    /// cash balance by -20 and the unpaid total by +20.
    #[test]
    fn test_invoice_edit_adjusts_by_difference() {
        let mut balance = BalanceSnapshot::default();
        balance.apply_inflow(dec("100"), dec("50"));

        let cash_before = balance.current_balance;
        let unpaid_before = balance.total_unpaid;

        balance.revert_inflow(dec("100"), dec("50"));
        balance.apply_inflow(dec("80"), dec("70"));

        assert_eq!(balance.current_balance - cash_before, dec("-20"));
        assert_eq!(balance.total_unpaid - unpaid_before, dec("20"));
    }

    /// Deleting an invoice returns the ledger to its pre-creation state.
    #[test]
    fn test_invoice_delete_reverts_contribution() {
        let mut balance = BalanceSnapshot::default();
        balance.apply_inflow(dec("900"), dec("100"));

        let before = balance;
        balance.apply_inflow(dec("250"), dec("70"));
        balance.revert_inflow(dec("250"), dec("70"));

        assert_eq!(balance, before);
    }

    /// A collection is an inflow of the amount paired with the same
    /// reduction of the unpaid total.
    #[test]
    fn test_collection_moves_unpaid_to_paid() {
        let mut balance = BalanceSnapshot::default();
        balance.apply_inflow(dec("300"), dec("500"));

        balance.apply_inflow(dec("200"), dec("-200"));

        assert_eq!(balance.total_paid, dec("500"));
        assert_eq!(balance.total_unpaid, dec("300"));
        assert_eq!(balance.current_balance, dec("500"));
    }

    /// Deleting an expense hands the full amount back.
    #[test]
    fn test_expense_delete_reverts() {
        let mut balance = BalanceSnapshot::default();
        balance.apply_inflow(dec("1000"), dec("0"));

        let before = balance;
        balance.apply_expense(dec("400")).unwrap();
        balance.revert_expense(dec("400"));

        assert_eq!(balance, before);
    }

    /// Editing an expense passes only the signed difference through the
    /// ledger.
    #[test]
    fn test_expense_edit_applies_difference() {
        let mut balance = BalanceSnapshot::default();
        balance.apply_inflow(dec("1000"), dec("0"));
        balance.apply_expense(dec("400")).unwrap();

        // 400 -> 250: difference of -150 is always legal
        balance.apply_expense(dec("-150")).unwrap();

        assert_eq!(balance.total_expense, dec("250"));
        assert_eq!(balance.current_balance, dec("750"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for money amounts (0.01 to 10000.00)
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Inflows accumulate: totals equal the sums of the applied parts
        #[test]
        fn prop_inflows_accumulate(
            inflows in prop::collection::vec((amount_strategy(), amount_strategy()), 1..20)
        ) {
            let mut balance = BalanceSnapshot::default();
            for (paid, due) in &inflows {
                balance.apply_inflow(*paid, *due);
            }

            let total_paid: Decimal = inflows.iter().map(|(p, _)| *p).sum();
            let total_due: Decimal = inflows.iter().map(|(_, d)| *d).sum();

            prop_assert_eq!(balance.total_paid, total_paid);
            prop_assert_eq!(balance.total_unpaid, total_due);
            prop_assert_eq!(balance.current_balance, total_paid);
        }

        /// The cash invariant holds across any accepted operation sequence
        #[test]
        fn prop_cash_invariant_holds(
            ops in prop::collection::vec((0u8..3, amount_strategy(), amount_strategy()), 1..30)
        ) {
            let mut balance = BalanceSnapshot::default();

            for (kind, a, b) in &ops {
                match kind {
                    0 => balance.apply_inflow(*a, *b),
                    1 => {
                        // May legitimately be rejected; either way the
                        // invariant must survive
                        let _ = balance.apply_expense(*a);
                    }
                    _ => balance.revert_expense(*a),
                }
                prop_assert_eq!(
                    balance.current_balance,
                    balance.total_paid - balance.total_expense
                );
            }
        }

        /// An accepted expense never leaves a negative cash balance
        #[test]
        fn prop_expense_never_overdraws(
            paid in amount_strategy(),
            expense in amount_strategy()
        ) {
            let mut balance = BalanceSnapshot::default();
            balance.apply_inflow(paid, Decimal::ZERO);

            match balance.apply_expense(expense) {
                Ok(()) => prop_assert!(balance.current_balance >= Decimal::ZERO),
                Err(_) => {
                    // Rejected: nothing moved
                    prop_assert_eq!(balance.current_balance, paid);
                    prop_assert_eq!(balance.total_expense, Decimal::ZERO);
                }
            }
        }

        /// Apply-then-revert is the identity for both inflows and expenses
        #[test]
        fn prop_apply_revert_roundtrip(
            paid in amount_strategy(),
            due in amount_strategy(),
            expense in amount_strategy()
        ) {
            let mut balance = BalanceSnapshot::default();
            balance.apply_inflow(paid + expense, due);

            let before = balance;

            balance.apply_inflow(paid, due);
            balance.revert_inflow(paid, due);
            prop_assert_eq!(balance, before);

            balance.apply_expense(expense).unwrap();
            balance.revert_expense(expense);
            prop_assert_eq!(balance, before);
        }
    }
}

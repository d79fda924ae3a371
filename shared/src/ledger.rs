//! Running-balance bookkeeping rules
//!
//! The balance singleton tracks four aggregates: money actually received
//! (`total_paid`), money still owed by customers (`total_unpaid`), money
//! spent (`total_expense`), and cash on hand (`current_balance`, which must
//! satisfy `current_balance = total_paid - total_expense`). The arithmetic
//! lives here, away from SQL, so the invariants can be tested directly; the
//! backend's balance service loads the row, applies these operations, and
//! writes the result back inside the caller's transaction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bookkeeping failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// An expense would drive the cash balance below zero
    #[error("insufficient balance: {available} available, {requested} requested")]
    InsufficientBalance {
        available: Decimal,
        requested: Decimal,
    },
}

/// In-memory view of the balance singleton
///
/// `Default` yields the all-zero snapshot used when no balance row exists
/// yet; applying an inflow to it produces exactly the lazily-created row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub total_paid: Decimal,
    pub total_unpaid: Decimal,
    pub total_expense: Decimal,
    pub current_balance: Decimal,
}

impl BalanceSnapshot {
    /// Record money coming in from a sale or collection.
    ///
    /// `paid` is cash received now, `due` is the amount newly owed. Either
    /// may be negative, which reverts a previous inflow; an invoice edit is
    /// a revert of the old amounts followed by an apply of the new ones.
    pub fn apply_inflow(&mut self, paid: Decimal, due: Decimal) {
        self.total_paid += paid;
        self.total_unpaid += due;
        self.current_balance += paid;
    }

    /// Revert a previously applied inflow.
    pub fn revert_inflow(&mut self, paid: Decimal, due: Decimal) {
        self.apply_inflow(-paid, -due);
    }

    /// Record money going out as an expense.
    ///
    /// Fails if the resulting cash balance would be negative; the snapshot
    /// is left untouched in that case. Expense edits pass the signed
    /// difference between the new and old amounts.
    pub fn apply_expense(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        let remaining = self.current_balance - amount;
        if remaining < Decimal::ZERO {
            return Err(LedgerError::InsufficientBalance {
                available: self.current_balance,
                requested: amount,
            });
        }
        self.total_expense += amount;
        self.current_balance = remaining;
        Ok(())
    }

    /// Revert a previously applied expense. Always legal.
    pub fn revert_expense(&mut self, amount: Decimal) {
        self.total_expense -= amount;
        self.current_balance += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn first_inflow_creates_expected_snapshot() {
        let mut balance = BalanceSnapshot::default();
        balance.apply_inflow(dec(500), dec(200));

        assert_eq!(balance.total_paid, dec(500));
        assert_eq!(balance.total_unpaid, dec(200));
        assert_eq!(balance.current_balance, dec(500));
        assert_eq!(balance.total_expense, Decimal::ZERO);
    }

    #[test]
    fn expense_rejected_when_it_would_go_negative() {
        let mut balance = BalanceSnapshot::default();
        balance.apply_inflow(dec(100), Decimal::ZERO);

        let before = balance;
        let err = balance.apply_expense(dec(150)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(balance, before);
    }

    #[test]
    fn expense_then_revert_is_identity() {
        let mut balance = BalanceSnapshot::default();
        balance.apply_inflow(dec(1000), dec(50));

        let before = balance;
        balance.apply_expense(dec(300)).unwrap();
        balance.revert_expense(dec(300));
        assert_eq!(balance, before);
    }
}

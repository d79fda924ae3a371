//! Balance ledger service owning the running-balance singleton
//!
//! The singleton row is created lazily by the first financial event and is
//! only ever touched through this service. The mutating primitives take a
//! `&mut PgConnection` so they compose into the transaction of whichever
//! lifecycle operation triggered them; the row is locked with `FOR UPDATE`
//! so concurrent operations serialize on the store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use shared::BalanceSnapshot;

use crate::error::{AppError, AppResult};

/// Balance service for reading and adjusting the running balance
#[derive(Clone)]
pub struct BalanceService {
    db: PgPool,
}

/// Balance snapshot returned by the API
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BalanceView {
    pub total_paid: Decimal,
    pub total_unpaid: Decimal,
    pub total_expense: Decimal,
    pub current_balance: Decimal,
    pub updated_at: Option<DateTime<Utc>>,
}

impl BalanceService {
    /// Create a new BalanceService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Read the current balance. Returns an all-zero snapshot when no
    /// financial event has created the row yet.
    pub async fn read(&self) -> AppResult<BalanceView> {
        let row = sqlx::query_as::<_, BalanceView>(
            r#"
            SELECT total_paid, total_unpaid, total_expense, current_balance, updated_at
            FROM balance
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.db)
        .await?;

        Ok(row.unwrap_or(BalanceView {
            total_paid: Decimal::ZERO,
            total_unpaid: Decimal::ZERO,
            total_expense: Decimal::ZERO,
            current_balance: Decimal::ZERO,
            updated_at: None,
        }))
    }

    /// Record money coming in (invoice creation, collection). Creates the
    /// singleton if this is the first financial event.
    pub async fn apply_inflow(
        conn: &mut PgConnection,
        paid: Decimal,
        due: Decimal,
    ) -> AppResult<()> {
        let existing = Self::load_for_update(conn).await?;
        let mut snapshot = existing.unwrap_or_default();
        snapshot.apply_inflow(paid, due);
        Self::store(conn, existing.is_some(), snapshot).await
    }

    /// Remove a previously recorded inflow (invoice delete).
    pub async fn revert_inflow(
        conn: &mut PgConnection,
        paid: Decimal,
        due: Decimal,
    ) -> AppResult<()> {
        Self::apply_inflow(conn, -paid, -due).await
    }

    /// Swap an invoice's old paid/due contribution for its new one within
    /// the caller's transaction (invoice edit).
    pub async fn revert_inflow_then_reapply(
        conn: &mut PgConnection,
        old_paid: Decimal,
        old_due: Decimal,
        new_paid: Decimal,
        new_due: Decimal,
    ) -> AppResult<()> {
        let existing = Self::load_for_update(conn).await?;
        let mut snapshot = existing.unwrap_or_default();
        snapshot.revert_inflow(old_paid, old_due);
        snapshot.apply_inflow(new_paid, new_due);
        Self::store(conn, existing.is_some(), snapshot).await
    }

    /// Record money going out. Fails with `InsufficientBalance` when the
    /// cash balance would go negative, which aborts the caller's
    /// transaction. Expense edits pass the signed amount difference.
    pub async fn apply_expense(conn: &mut PgConnection, amount: Decimal) -> AppResult<()> {
        let existing = Self::load_for_update(conn).await?;
        let mut snapshot = existing.unwrap_or_default();
        snapshot.apply_expense(amount)?;
        Self::store(conn, existing.is_some(), snapshot).await
    }

    /// Revert a previously recorded expense (expense delete). Always legal.
    pub async fn revert_expense(conn: &mut PgConnection, amount: Decimal) -> AppResult<()> {
        let existing = Self::load_for_update(conn).await?;
        let mut snapshot = existing.unwrap_or_default();
        snapshot.revert_expense(amount);
        Self::store(conn, existing.is_some(), snapshot).await
    }

    /// Lock and load the singleton within the caller's transaction.
    async fn load_for_update(conn: &mut PgConnection) -> AppResult<Option<BalanceSnapshot>> {
        let row = sqlx::query_as::<_, (Decimal, Decimal, Decimal, Decimal)>(
            r#"
            SELECT total_paid, total_unpaid, total_expense, current_balance
            FROM balance
            WHERE id = 1
            FOR UPDATE
            "#,
        )
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.map(
            |(total_paid, total_unpaid, total_expense, current_balance)| BalanceSnapshot {
                total_paid,
                total_unpaid,
                total_expense,
                current_balance,
            },
        ))
    }

    /// Write the snapshot back, inserting the row on first use.
    async fn store(
        conn: &mut PgConnection,
        existed: bool,
        snapshot: BalanceSnapshot,
    ) -> AppResult<()> {
        if existed {
            sqlx::query(
                r#"
                UPDATE balance
                SET total_paid = $1, total_unpaid = $2, total_expense = $3,
                    current_balance = $4, updated_at = NOW()
                WHERE id = 1
                "#,
            )
            .bind(snapshot.total_paid)
            .bind(snapshot.total_unpaid)
            .bind(snapshot.total_expense)
            .bind(snapshot.current_balance)
            .execute(&mut *conn)
            .await?;
        } else {
            sqlx::query(
                r#"
                INSERT INTO balance (id, total_paid, total_unpaid, total_expense, current_balance)
                VALUES (1, $1, $2, $3, $4)
                "#,
            )
            .bind(snapshot.total_paid)
            .bind(snapshot.total_unpaid)
            .bind(snapshot.total_expense)
            .bind(snapshot.current_balance)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                AppError::on_unique_violation(
                    e,
                    AppError::Conflict("Balance was initialized concurrently".to_string()),
                )
            })?;
        }

        Ok(())
    }
}

//! Collection service
//!
//! A collection records a payment received against a customer's outstanding
//! due. The customer's totals and the running balance move together with
//! the appended collection record; a payment larger than the outstanding
//! due is rejected before anything is written.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::{validate_positive_amount, CollectionMethod};

use crate::error::{AppError, AppResult};
use crate::services::balance::BalanceService;

/// Collection service for payments received
#[derive(Clone)]
pub struct CollectionService {
    db: PgPool,
}

/// Collection record with customer and issuer names joined
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Collection {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub amount: Decimal,
    pub method: String,
    pub description: Option<String>,
    pub issued_by: Uuid,
    pub issued_by_name: String,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a collection
#[derive(Debug, Deserialize)]
pub struct CreateCollectionInput {
    pub customer_id: Uuid,
    pub amount: Decimal,
    pub method: CollectionMethod,
    pub description: Option<String>,
}

impl CollectionService {
    /// Create a new CollectionService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a payment against a customer's due balance
    pub async fn create(
        &self,
        issued_by: Uuid,
        input: CreateCollectionInput,
    ) -> AppResult<Collection> {
        validate_positive_amount(input.amount)
            .map_err(|msg| AppError::validation("amount", msg))?;

        let mut tx = self.db.begin().await?;

        let total_due = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT total_due
            FROM customers
            WHERE id = $1 AND is_deleted = FALSE
            FOR UPDATE
            "#,
        )
        .bind(input.customer_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        if input.amount > total_due {
            return Err(AppError::ExceedsDue {
                outstanding: total_due,
                amount: input.amount,
            });
        }

        let collection_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO collections (customer_id, amount, method, description, issued_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(input.customer_id)
        .bind(input.amount)
        .bind(input.method.as_str())
        .bind(&input.description)
        .bind(issued_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE customers
            SET total_paid_amount = total_paid_amount + $1,
                total_due = total_due - $1,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(input.amount)
        .bind(input.customer_id)
        .execute(&mut *tx)
        .await?;

        // Paid in, owed down: the ledger sees a collection as an inflow of
        // `amount` paired with a reduction of the unpaid total.
        BalanceService::apply_inflow(&mut tx, input.amount, -input.amount).await?;

        tx.commit().await?;

        self.get_by_id(collection_id).await
    }

    /// All collections, newest first, with names joined
    pub async fn list(&self) -> AppResult<Vec<Collection>> {
        let collections = sqlx::query_as::<_, Collection>(
            r#"
            SELECT col.id, col.customer_id, c.name AS customer_name, col.amount, col.method,
                   col.description, col.issued_by, u.name AS issued_by_name, col.created_at
            FROM collections col
            JOIN customers c ON c.id = col.customer_id
            JOIN users u ON u.id = col.issued_by
            ORDER BY col.created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(collections)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Collection> {
        let collection = sqlx::query_as::<_, Collection>(
            r#"
            SELECT col.id, col.customer_id, c.name AS customer_name, col.amount, col.method,
                   col.description, col.issued_by, u.name AS issued_by_name, col.created_at
            FROM collections col
            JOIN customers c ON c.id = col.customer_id
            JOIN users u ON u.id = col.issued_by
            WHERE col.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Collection".to_string()))?;

        Ok(collection)
    }
}

//! Stock movement service
//!
//! Physical stock history is an append-only movement log; the live counters
//! on the product row are adjusted alongside each append. Restocking is a
//! plain two-step write with no financial effect. Fulfilment
//! (`deduct_by_invoice`) commits the reservation an invoice made: stock and
//! reserved both come down, and the whole invoice fulfils atomically or not
//! at all.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::StockDirection;

use crate::error::{AppError, AppResult};
use crate::services::invoice::Invoice;

/// Stock service for restocking and invoice fulfilment
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Product state returned after a stock adjustment
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductStock {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub stock: i32,
    pub reserved: i32,
}

/// Movement record with product and issuer names joined
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StockMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub direction: String,
    pub issued_by: Uuid,
    pub issued_by_name: String,
    pub related_invoice_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Stock history filters
#[derive(Debug, Default, Deserialize)]
pub struct StockFilter {
    pub search: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

/// Row for per-item deduction
#[derive(Debug, sqlx::FromRow)]
struct DeductionItem {
    product_id: Uuid,
    quantity: i32,
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Restock a product and append an `in` movement. No balance effect.
    pub async fn stock_in(
        &self,
        product_id: Uuid,
        quantity: i32,
        issued_by: Uuid,
    ) -> AppResult<ProductStock> {
        if quantity <= 0 {
            return Err(AppError::validation("quantity", "Quantity must be positive"));
        }

        let product = sqlx::query_as::<_, ProductStock>(
            r#"
            UPDATE products
            SET stock = stock + $1, updated_at = NOW()
            WHERE id = $2 AND is_deleted = FALSE
            RETURNING id, name, sku, stock, reserved
            "#,
        )
        .bind(quantity)
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO stock_movements (product_id, quantity, direction, issued_by)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .bind(StockDirection::In.as_str())
        .bind(issued_by)
        .execute(&self.db)
        .await?;

        Ok(product)
    }

    /// Fulfil an invoice: deduct every line item from physical stock,
    /// release the matching reservations, append `out` movements, and flag
    /// the invoice as deducted. One transaction; a failing line item rolls
    /// the whole fulfilment back.
    ///
    /// The invoice row is locked first, so a concurrent second call
    /// serializes behind this one and fails with `AlreadyDeducted`.
    pub async fn deduct_by_invoice(
        &self,
        invoice_number: &str,
        issued_by: Uuid,
    ) -> AppResult<Invoice> {
        let mut tx = self.db.begin().await?;

        let (invoice_id, is_stock_deducted) = sqlx::query_as::<_, (Uuid, bool)>(
            r#"
            SELECT id, is_stock_deducted
            FROM invoices
            WHERE invoice_number = $1 AND is_deleted = FALSE
            FOR UPDATE
            "#,
        )
        .bind(invoice_number)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice".to_string()))?;

        if is_stock_deducted {
            return Err(AppError::AlreadyDeducted);
        }

        let items = sqlx::query_as::<_, DeductionItem>(
            r#"
            SELECT product_id, quantity
            FROM invoice_items
            WHERE invoice_id = $1
            ORDER BY position
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&mut *tx)
        .await?;

        for item in &items {
            let (name, stock) = sqlx::query_as::<_, (String, i32)>(
                "SELECT name, stock FROM products WHERE id = $1 FOR UPDATE",
            )
            .bind(item.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

            if stock < item.quantity {
                return Err(AppError::InsufficientStock(name));
            }

            sqlx::query(
                r#"
                UPDATE products
                SET stock = stock - $1,
                    reserved = GREATEST(reserved - $1, 0),
                    updated_at = NOW()
                WHERE id = $2
                "#,
            )
            .bind(item.quantity)
            .bind(item.product_id)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO stock_movements (product_id, quantity, direction, issued_by,
                                             related_invoice_id)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(StockDirection::Out.as_str())
            .bind(issued_by)
            .bind(invoice_id)
            .execute(&mut *tx)
            .await?;
        }

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET is_stock_deducted = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING id, customer_id, issued_by, total_amount, paid_amount, due_amount,
                      invoice_number, is_stock_deducted, is_deleted, created_at, updated_at
            "#,
        )
        .bind(invoice_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(invoice)
    }

    /// Movement history, newest first, with product and issuer names joined
    pub async fn history(&self, filter: StockFilter) -> AppResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT s.id, s.product_id, p.name AS product_name, s.quantity, s.direction,
                   s.issued_by, u.name AS issued_by_name, s.related_invoice_id, s.created_at
            FROM stock_movements s
            JOIN products p ON p.id = s.product_id
            JOIN users u ON u.id = s.issued_by
            WHERE ($1::text IS NULL OR p.name ILIKE '%' || $1 || '%')
              AND ($2::date IS NULL OR s.created_at::date >= $2)
              AND ($3::date IS NULL OR s.created_at::date <= $3)
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(&filter.search)
        .bind(filter.from_date)
        .bind(filter.to_date)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }
}

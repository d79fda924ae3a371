//! Invoice lifecycle service
//!
//! Creating, editing and deleting a sales invoice moves three other pieces
//! of state: the customer's purchase/paid/due totals, the reserved counter
//! of every product on the invoice, and the running balance. Each operation
//! runs in a single transaction so those effects land together or not at
//! all. Edit is implemented as revert-then-reapply; delete is the revert
//! half followed by a soft delete.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use shared::{
    format_invoice_number, next_invoice_number, validate_invoice_amounts, validate_line_items,
    InvoiceLineItem,
};

use crate::error::{AppError, AppResult};
use crate::services::balance::BalanceService;

/// Invoice service driving the invoice lifecycle
#[derive(Clone)]
pub struct InvoiceService {
    db: PgPool,
}

/// Invoice record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Invoice {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub issued_by: Uuid,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub due_amount: Decimal,
    pub invoice_number: String,
    pub is_stock_deducted: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Invoice with line items and display names joined
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub products: Vec<InvoiceLineItem>,
    pub customer_name: String,
    pub issued_by_name: String,
}

/// Row for the invoice list projection
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct InvoiceListRow {
    pub id: Uuid,
    pub invoice_number: String,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub issued_by_name: String,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub due_amount: Decimal,
    pub is_stock_deducted: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an invoice
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceInput {
    pub customer_id: Uuid,
    pub products: Vec<InvoiceLineItem>,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub due_amount: Decimal,
}

/// Input for editing an invoice; absent fields keep their current value
#[derive(Debug, Deserialize)]
pub struct EditInvoiceInput {
    pub customer_id: Option<Uuid>,
    pub products: Option<Vec<InvoiceLineItem>>,
    pub total_amount: Option<Decimal>,
    pub paid_amount: Option<Decimal>,
    pub due_amount: Option<Decimal>,
}

/// Invoice list filters
#[derive(Debug, Default, Deserialize)]
pub struct InvoiceFilter {
    pub search: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub invoice_number: Option<String>,
}

impl InvoiceService {
    /// Create a new InvoiceService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an invoice: allocate the next invoice number, persist the
    /// invoice and its line items, bump the customer totals and product
    /// reservations, and record the inflow on the balance ledger.
    pub async fn create(&self, issued_by: Uuid, input: CreateInvoiceInput) -> AppResult<InvoiceDetail> {
        validate_invoice_amounts(input.total_amount, input.paid_amount, input.due_amount)
            .map_err(|msg| AppError::validation("amounts", msg))?;
        validate_line_items(&input.products)
            .map_err(|msg| AppError::validation("products", msg))?;

        let mut tx = self.db.begin().await?;

        let customer_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1 AND is_deleted = FALSE)",
        )
        .bind(input.customer_id)
        .fetch_one(&mut *tx)
        .await?;

        if !customer_exists {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        // Numbers are allocated over every invoice ever created, soft-deleted
        // ones included, and are never reused.
        let current_max = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT MAX(invoice_number::bigint) FROM invoices",
        )
        .fetch_one(&mut *tx)
        .await?;
        let invoice_number = format_invoice_number(next_invoice_number(current_max));

        let invoice_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO invoices (customer_id, issued_by, total_amount, paid_amount,
                                  due_amount, invoice_number)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(input.customer_id)
        .bind(issued_by)
        .bind(input.total_amount)
        .bind(input.paid_amount)
        .bind(input.due_amount)
        .bind(&invoice_number)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::on_unique_violation(
                e,
                AppError::Conflict("Invoice number was allocated concurrently".to_string()),
            )
        })?;

        Self::insert_line_items(&mut tx, invoice_id, &input.products).await?;
        Self::reserve_products(&mut tx, &input.products).await?;
        Self::adjust_customer_totals(
            &mut tx,
            input.customer_id,
            input.total_amount,
            input.paid_amount,
            input.due_amount,
        )
        .await?;

        BalanceService::apply_inflow(&mut tx, input.paid_amount, input.due_amount).await?;

        tx.commit().await?;

        self.get_by_id(invoice_id).await
    }

    /// Edit an invoice by reverting its current effects and reapplying the
    /// patched ones, all in one transaction.
    pub async fn edit(&self, id: Uuid, input: EditInvoiceInput) -> AppResult<InvoiceDetail> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, customer_id, issued_by, total_amount, paid_amount, due_amount,
                   invoice_number, is_stock_deducted, is_deleted, created_at, updated_at
            FROM invoices
            WHERE id = $1 AND is_deleted = FALSE
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice".to_string()))?;

        let old_items = Self::fetch_line_items(&mut tx, id).await?;

        let new_customer_id = input.customer_id.unwrap_or(existing.customer_id);
        let new_items = input.products.unwrap_or_else(|| old_items.clone());
        let new_total = input.total_amount.unwrap_or(existing.total_amount);
        let new_paid = input.paid_amount.unwrap_or(existing.paid_amount);
        let new_due = input.due_amount.unwrap_or(existing.due_amount);

        validate_invoice_amounts(new_total, new_paid, new_due)
            .map_err(|msg| AppError::validation("amounts", msg))?;
        validate_line_items(&new_items).map_err(|msg| AppError::validation("products", msg))?;

        if new_customer_id != existing.customer_id {
            let customer_exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1 AND is_deleted = FALSE)",
            )
            .bind(new_customer_id)
            .fetch_one(&mut *tx)
            .await?;

            if !customer_exists {
                return Err(AppError::NotFound("Customer".to_string()));
            }
        }

        // Revert the old reservations and customer totals
        Self::release_products(&mut tx, &old_items).await?;
        Self::adjust_customer_totals(
            &mut tx,
            existing.customer_id,
            -existing.total_amount,
            -existing.paid_amount,
            -existing.due_amount,
        )
        .await?;

        // Apply the new ones
        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::insert_line_items(&mut tx, id, &new_items).await?;
        Self::reserve_products(&mut tx, &new_items).await?;
        Self::adjust_customer_totals(&mut tx, new_customer_id, new_total, new_paid, new_due)
            .await?;

        sqlx::query(
            r#"
            UPDATE invoices
            SET customer_id = $1, total_amount = $2, paid_amount = $3, due_amount = $4,
                updated_at = NOW()
            WHERE id = $5
            "#,
        )
        .bind(new_customer_id)
        .bind(new_total)
        .bind(new_paid)
        .bind(new_due)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        BalanceService::revert_inflow_then_reapply(
            &mut tx,
            existing.paid_amount,
            existing.due_amount,
            new_paid,
            new_due,
        )
        .await?;

        tx.commit().await?;

        self.get_by_id(id).await
    }

    /// Soft-delete an invoice, reverting its reservations, customer totals
    /// and ledger contribution. The record is retained as an audit trail.
    pub async fn delete(&self, id: Uuid) -> AppResult<Invoice> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, customer_id, issued_by, total_amount, paid_amount, due_amount,
                   invoice_number, is_stock_deducted, is_deleted, created_at, updated_at
            FROM invoices
            WHERE id = $1 AND is_deleted = FALSE
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice".to_string()))?;

        let items = Self::fetch_line_items(&mut tx, id).await?;

        Self::release_products(&mut tx, &items).await?;
        Self::adjust_customer_totals(
            &mut tx,
            existing.customer_id,
            -existing.total_amount,
            -existing.paid_amount,
            -existing.due_amount,
        )
        .await?;

        BalanceService::revert_inflow(&mut tx, existing.paid_amount, existing.due_amount).await?;

        let deleted = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING id, customer_id, issued_by, total_amount, paid_amount, due_amount,
                      invoice_number, is_stock_deducted, is_deleted, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(deleted)
    }

    /// List invoices with customer and issuer names joined.
    ///
    /// An exact `invoice_number` filter bypasses everything else and yields
    /// at most one row. `search` is a case-insensitive substring match over
    /// the invoice number and the customer name.
    pub async fn list(&self, filter: InvoiceFilter) -> AppResult<Vec<InvoiceListRow>> {
        if let Some(number) = &filter.invoice_number {
            let rows = sqlx::query_as::<_, InvoiceListRow>(
                r#"
                SELECT i.id, i.invoice_number, i.customer_id, c.name AS customer_name,
                       u.name AS issued_by_name, i.total_amount, i.paid_amount, i.due_amount,
                       i.is_stock_deducted, i.created_at
                FROM invoices i
                JOIN customers c ON c.id = i.customer_id
                JOIN users u ON u.id = i.issued_by
                WHERE i.is_deleted = FALSE AND i.invoice_number = $1
                "#,
            )
            .bind(number)
            .fetch_all(&self.db)
            .await?;

            return Ok(rows);
        }

        let rows = sqlx::query_as::<_, InvoiceListRow>(
            r#"
            SELECT i.id, i.invoice_number, i.customer_id, c.name AS customer_name,
                   u.name AS issued_by_name, i.total_amount, i.paid_amount, i.due_amount,
                   i.is_stock_deducted, i.created_at
            FROM invoices i
            JOIN customers c ON c.id = i.customer_id
            JOIN users u ON u.id = i.issued_by
            WHERE i.is_deleted = FALSE
              AND ($1::text IS NULL
                   OR i.invoice_number ILIKE '%' || $1 || '%'
                   OR c.name ILIKE '%' || $1 || '%')
              AND ($2::date IS NULL OR i.created_at::date >= $2)
              AND ($3::date IS NULL OR i.created_at::date <= $3)
            ORDER BY i.created_at DESC
            "#,
        )
        .bind(&filter.search)
        .bind(filter.from_date)
        .bind(filter.to_date)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Get a single invoice with line items and display names joined
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<InvoiceDetail> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, customer_id, issued_by, total_amount, paid_amount, due_amount,
                   invoice_number, is_stock_deducted, is_deleted, created_at, updated_at
            FROM invoices
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice".to_string()))?;

        let products = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT product_id, quantity, price
            FROM invoice_items
            WHERE invoice_id = $1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(ItemRow::into_line_item)
        .collect();

        let (customer_name, issued_by_name) = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT c.name, u.name
            FROM invoices i
            JOIN customers c ON c.id = i.customer_id
            JOIN users u ON u.id = i.issued_by
            WHERE i.id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        Ok(InvoiceDetail {
            invoice,
            products,
            customer_name,
            issued_by_name,
        })
    }

    /// Insert the line items, positions preserving input order.
    async fn insert_line_items(
        tx: &mut PgConnection,
        invoice_id: Uuid,
        items: &[InvoiceLineItem],
    ) -> AppResult<()> {
        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (invoice_id, position, product_id, quantity, price)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(invoice_id)
            .bind(position as i32)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
        }

        Ok(())
    }

    /// Increment each referenced product's reserved counter.
    async fn reserve_products(tx: &mut PgConnection, items: &[InvoiceLineItem]) -> AppResult<()> {
        for item in items {
            let result = sqlx::query(
                r#"
                UPDATE products
                SET reserved = reserved + $1, updated_at = NOW()
                WHERE id = $2 AND is_deleted = FALSE
                "#,
            )
            .bind(item.quantity)
            .bind(item.product_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::NotFound("Product".to_string()));
            }
        }

        Ok(())
    }

    /// Decrement reserved counters, never below zero.
    async fn release_products(tx: &mut PgConnection, items: &[InvoiceLineItem]) -> AppResult<()> {
        for item in items {
            sqlx::query(
                r#"
                UPDATE products
                SET reserved = GREATEST(reserved - $1, 0), updated_at = NOW()
                WHERE id = $2
                "#,
            )
            .bind(item.quantity)
            .bind(item.product_id)
            .execute(&mut *tx)
            .await?;
        }

        Ok(())
    }

    /// Shift a customer's purchase/paid/due totals by signed deltas.
    async fn adjust_customer_totals(
        tx: &mut PgConnection,
        customer_id: Uuid,
        total: Decimal,
        paid: Decimal,
        due: Decimal,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE customers
            SET total_purchase_amount = total_purchase_amount + $1,
                total_paid_amount = total_paid_amount + $2,
                total_due = total_due + $3,
                updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(total)
        .bind(paid)
        .bind(due)
        .bind(customer_id)
        .execute(&mut *tx)
        .await?;

        Ok(())
    }

    /// Fetch an invoice's line items inside the caller's transaction.
    async fn fetch_line_items(
        tx: &mut PgConnection,
        invoice_id: Uuid,
    ) -> AppResult<Vec<InvoiceLineItem>> {
        let items = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT product_id, quantity, price
            FROM invoice_items
            WHERE invoice_id = $1
            ORDER BY position
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&mut *tx)
        .await?;

        Ok(items.into_iter().map(ItemRow::into_line_item).collect())
    }
}

/// Row for line item queries
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    product_id: Uuid,
    quantity: i32,
    price: Decimal,
}

impl ItemRow {
    fn into_line_item(self) -> InvoiceLineItem {
        InvoiceLineItem {
            product_id: self.product_id,
            quantity: self.quantity,
            price: self.price,
        }
    }
}

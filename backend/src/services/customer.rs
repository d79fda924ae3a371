//! Customer register service
//!
//! Plain CRUD with soft delete. The financial totals on a customer
//! (purchases, payments, outstanding due) are owned by the invoice and
//! collection services and are never set through this service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::invoice::InvoiceListRow;

/// Customer service
#[derive(Clone)]
pub struct CustomerService {
    db: PgPool,
}

/// Customer record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub shop_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub total_purchase_amount: Decimal,
    pub total_paid_amount: Decimal,
    pub total_due: Decimal,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Customer with their invoice history
#[derive(Debug, Clone, Serialize)]
pub struct CustomerWithInvoices {
    #[serde(flatten)]
    pub customer: Customer,
    pub invoices: Vec<InvoiceListRow>,
}

/// Input for creating a customer
#[derive(Debug, Deserialize)]
pub struct CreateCustomerInput {
    pub name: String,
    pub shop_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Input for updating a customer
#[derive(Debug, Deserialize)]
pub struct UpdateCustomerInput {
    pub name: Option<String>,
    pub shop_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl CustomerService {
    /// Create a new CustomerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a customer
    pub async fn create(&self, input: CreateCustomerInput) -> AppResult<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, shop_name, address, phone, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, shop_name, address, phone, email, total_purchase_amount,
                      total_paid_amount, total_due, is_deleted, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.shop_name)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(&input.email)
        .fetch_one(&self.db)
        .await?;

        Ok(customer)
    }

    /// List customers, optionally filtered by a name or shop name search
    pub async fn list(&self, search: Option<String>) -> AppResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, shop_name, address, phone, email, total_purchase_amount,
                   total_paid_amount, total_due, is_deleted, created_at, updated_at
            FROM customers
            WHERE is_deleted = FALSE
              AND ($1::text IS NULL
                   OR name ILIKE '%' || $1 || '%'
                   OR shop_name ILIKE '%' || $1 || '%')
            ORDER BY name ASC
            "#,
        )
        .bind(&search)
        .fetch_all(&self.db)
        .await?;

        Ok(customers)
    }

    /// Get a customer with their non-deleted invoices, newest first
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<CustomerWithInvoices> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, shop_name, address, phone, email, total_purchase_amount,
                   total_paid_amount, total_due, is_deleted, created_at, updated_at
            FROM customers
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        let invoices = sqlx::query_as::<_, InvoiceListRow>(
            r#"
            SELECT i.id, i.invoice_number, i.customer_id, c.name AS customer_name,
                   u.name AS issued_by_name, i.total_amount, i.paid_amount, i.due_amount,
                   i.is_stock_deducted, i.created_at
            FROM invoices i
            JOIN customers c ON c.id = i.customer_id
            JOIN users u ON u.id = i.issued_by
            WHERE i.customer_id = $1 AND i.is_deleted = FALSE
            ORDER BY i.created_at DESC
            "#,
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        Ok(CustomerWithInvoices { customer, invoices })
    }

    /// Update a customer's contact fields
    pub async fn update(&self, id: Uuid, input: UpdateCustomerInput) -> AppResult<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET name = COALESCE($1, name),
                shop_name = COALESCE($2, shop_name),
                address = COALESCE($3, address),
                phone = COALESCE($4, phone),
                email = COALESCE($5, email),
                updated_at = NOW()
            WHERE id = $6 AND is_deleted = FALSE
            RETURNING id, name, shop_name, address, phone, email, total_purchase_amount,
                      total_paid_amount, total_due, is_deleted, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.shop_name)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        Ok(customer)
    }

    /// Soft-delete a customer
    pub async fn delete(&self, id: Uuid) -> AppResult<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING id, name, shop_name, address, phone, email, total_purchase_amount,
                      total_paid_amount, total_due, is_deleted, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        Ok(customer)
    }
}

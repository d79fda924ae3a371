//! Product catalogue service
//!
//! Plain CRUD with soft delete. The stock and reserved counters on a
//! product are owned by the invoice and stock services; this service never
//! touches them after creation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Product service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Product record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub price: Decimal,
    pub stock: i32,
    pub reserved: i32,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub price: Decimal,
    pub stock: Option<i32>,
}

/// Input for updating a product
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub price: Option<Decimal>,
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a product; the SKU must be unique
    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        if input.price < Decimal::ZERO {
            return Err(AppError::validation("price", "Price cannot be negative"));
        }
        if input.stock.unwrap_or(0) < 0 {
            return Err(AppError::validation("stock", "Stock cannot be negative"));
        }

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, sku, price, stock)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, sku, price, stock, reserved, is_deleted,
                      created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.sku)
        .bind(input.price)
        .bind(input.stock.unwrap_or(0))
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::on_unique_violation(e, AppError::DuplicateEntry("sku".to_string())))?;

        Ok(product)
    }

    /// List products, optionally filtered by a name or SKU search
    pub async fn list(&self, search: Option<String>) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, sku, price, stock, reserved, is_deleted,
                   created_at, updated_at
            FROM products
            WHERE is_deleted = FALSE
              AND ($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR sku ILIKE '%' || $1 || '%')
            ORDER BY name ASC
            "#,
        )
        .bind(&search)
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Get a product by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, sku, price, stock, reserved, is_deleted,
                   created_at, updated_at
            FROM products
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product)
    }

    /// Update a product's catalogue fields
    pub async fn update(&self, id: Uuid, input: UpdateProductInput) -> AppResult<Product> {
        if let Some(price) = input.price {
            if price < Decimal::ZERO {
                return Err(AppError::validation("price", "Price cannot be negative"));
            }
        }

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = COALESCE($1, name),
                description = COALESCE($2, description),
                sku = COALESCE($3, sku),
                price = COALESCE($4, price),
                updated_at = NOW()
            WHERE id = $5 AND is_deleted = FALSE
            RETURNING id, name, description, sku, price, stock, reserved, is_deleted,
                      created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.sku)
        .bind(input.price)
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| AppError::on_unique_violation(e, AppError::DuplicateEntry("sku".to_string())))?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product)
    }

    /// Soft-delete a product
    pub async fn delete(&self, id: Uuid) -> AppResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING id, name, description, sku, price, stock, reserved, is_deleted,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product)
    }
}

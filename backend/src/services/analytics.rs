//! Analytics service for sales and expense summaries
//!
//! Read-only projections over the invoice and expense tables; nothing here
//! participates in the bookkeeping transactions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;

/// Analytics service
#[derive(Clone)]
pub struct AnalyticsService {
    db: PgPool,
}

/// One day of sales; days without invoices report zero
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DailySales {
    pub date: NaiveDate,
    pub sales: Decimal,
}

/// One month of sales and expenses
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MonthlySummary {
    pub month: NaiveDate,
    pub sales: Decimal,
    pub expenses: Decimal,
}

impl AnalyticsService {
    /// Create a new AnalyticsService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Daily sales totals for the last 14 days, zero-filled
    pub async fn daily_sales_summary(&self) -> AppResult<Vec<DailySales>> {
        let rows = sqlx::query_as::<_, DailySales>(
            r#"
            SELECT d::date AS date,
                   COALESCE(SUM(i.total_amount), 0)::numeric AS sales
            FROM generate_series(CURRENT_DATE - INTERVAL '13 days', CURRENT_DATE,
                                 INTERVAL '1 day') AS d
            LEFT JOIN invoices i
                   ON i.created_at::date = d::date AND i.is_deleted = FALSE
            GROUP BY d::date
            ORDER BY d::date
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Sales and expense totals for the last four calendar months
    pub async fn monthly_summary(&self) -> AppResult<Vec<MonthlySummary>> {
        let rows = sqlx::query_as::<_, MonthlySummary>(
            r#"
            SELECT m::date AS month,
                   COALESCE((SELECT SUM(total_amount) FROM invoices
                             WHERE is_deleted = FALSE
                               AND date_trunc('month', created_at)::date = m::date), 0)::numeric AS sales,
                   COALESCE((SELECT SUM(amount) FROM expenses
                             WHERE is_deleted = FALSE
                               AND date_trunc('month', created_at)::date = m::date), 0)::numeric AS expenses
            FROM generate_series(date_trunc('month', CURRENT_DATE) - INTERVAL '3 months',
                                 date_trunc('month', CURRENT_DATE),
                                 INTERVAL '1 month') AS m
            ORDER BY m
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record).map_err(|e| {
                crate::error::AppError::Internal(format!("CSV serialization error: {}", e))
            })?;
        }
        let csv_data = String::from_utf8(wtr.into_inner().map_err(|e| {
            crate::error::AppError::Internal(format!("CSV writer error: {}", e))
        })?)
        .map_err(|e| crate::error::AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}

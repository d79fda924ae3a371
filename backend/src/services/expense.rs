//! Expense lifecycle service
//!
//! Expenses draw the running balance down and are the only operations the
//! ledger refuses: anything that would push the cash balance negative
//! aborts the whole transaction. Salary expenses additionally tie into the
//! employee register: the amount must equal the employee's monthly salary
//! and only one salary expense per employee is accepted per calendar month.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::{salary_month_bounds, validate_positive_amount, ExpenseCategory};

use crate::error::{AppError, AppResult};
use crate::services::balance::BalanceService;

/// Expense service
#[derive(Clone)]
pub struct ExpenseService {
    db: PgPool,
}

/// Expense record with display names joined
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Expense {
    pub id: Uuid,
    pub date: NaiveDate,
    pub category: String,
    pub employee_id: Option<Uuid>,
    pub employee_name: Option<String>,
    pub issued_by: Uuid,
    pub issued_by_name: Option<String>,
    pub description: Option<String>,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Input for recording an expense
#[derive(Debug, Deserialize)]
pub struct CreateExpenseInput {
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub employee_id: Option<Uuid>,
    pub description: Option<String>,
}

/// Input for editing an expense. Only date, description and amount are
/// mutable; for salary expenses the employee link must be retained.
#[derive(Debug, Deserialize)]
pub struct EditExpenseInput {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub employee_id: Option<Uuid>,
}

/// Expense list filters
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseFilter {
    pub search: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub category: Option<ExpenseCategory>,
}

/// Row used when loading an expense for mutation
#[derive(Debug, sqlx::FromRow)]
struct ExpenseRow {
    category: String,
    amount: Decimal,
    is_deleted: bool,
}

impl ExpenseService {
    /// Create a new ExpenseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record an expense and draw it from the balance ledger
    pub async fn add(&self, issued_by: Uuid, input: CreateExpenseInput) -> AppResult<Expense> {
        validate_positive_amount(input.amount)
            .map_err(|msg| AppError::validation("amount", msg))?;

        let mut tx = self.db.begin().await?;

        let employee_id = match input.category {
            ExpenseCategory::Salary => {
                let employee_id = input.employee_id.ok_or_else(|| {
                    AppError::validation("employee_id", "Employee ID is required for salary expenses")
                })?;

                let monthly_salary = sqlx::query_scalar::<_, Decimal>(
                    "SELECT monthly_salary FROM employees WHERE id = $1 AND is_deleted = FALSE",
                )
                .bind(employee_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound("Employee".to_string()))?;

                if input.amount != monthly_salary {
                    return Err(AppError::validation(
                        "amount",
                        "Amount must match the employee's monthly salary",
                    ));
                }

                let (month_start, next_month) = salary_month_bounds(Utc::now().date_naive());
                let already_paid = sqlx::query_scalar::<_, bool>(
                    r#"
                    SELECT EXISTS(
                        SELECT 1 FROM expenses
                        WHERE employee_id = $1 AND category = 'salary' AND is_deleted = FALSE
                          AND date >= $2 AND date < $3
                    )
                    "#,
                )
                .bind(employee_id)
                .bind(month_start)
                .bind(next_month)
                .fetch_one(&mut *tx)
                .await?;

                if already_paid {
                    return Err(AppError::DuplicateSalary);
                }

                Some(employee_id)
            }
            // Non-salary expenses never link an employee
            _ => None,
        };

        let expense_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO expenses (date, category, employee_id, issued_by, description, amount)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(input.date)
        .bind(input.category.as_str())
        .bind(employee_id)
        .bind(issued_by)
        .bind(&input.description)
        .bind(input.amount)
        .fetch_one(&mut *tx)
        .await?;

        BalanceService::apply_expense(&mut tx, input.amount).await?;

        tx.commit().await?;

        self.get_by_id(expense_id).await
    }

    /// Edit an expense; the ledger absorbs the signed amount difference
    pub async fn edit(&self, id: Uuid, input: EditExpenseInput) -> AppResult<Expense> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, ExpenseRow>(
            "SELECT category, amount, is_deleted FROM expenses WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Expense".to_string()))?;

        if existing.is_deleted {
            return Err(AppError::NotFound("Expense".to_string()));
        }

        let is_salary = existing.category == ExpenseCategory::Salary.as_str();
        if is_salary && input.employee_id.is_none() {
            return Err(AppError::validation(
                "employee_id",
                "Employee ID is required for salary expenses",
            ));
        }

        let new_amount = input.amount.unwrap_or(existing.amount);
        validate_positive_amount(new_amount).map_err(|msg| AppError::validation("amount", msg))?;

        sqlx::query(
            r#"
            UPDATE expenses
            SET date = COALESCE($1, date),
                description = COALESCE($2, description),
                amount = $3,
                employee_id = CASE WHEN category = 'salary' THEN employee_id ELSE NULL END,
                updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(input.date)
        .bind(&input.description)
        .bind(new_amount)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let diff = new_amount - existing.amount;
        BalanceService::apply_expense(&mut tx, diff).await?;

        tx.commit().await?;

        self.get_by_id(id).await
    }

    /// Soft-delete an expense and hand the amount back to the ledger
    pub async fn delete(&self, id: Uuid) -> AppResult<Expense> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, ExpenseRow>(
            "SELECT category, amount, is_deleted FROM expenses WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Expense".to_string()))?;

        if existing.is_deleted {
            return Err(AppError::AlreadyDeleted);
        }

        sqlx::query("UPDATE expenses SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        BalanceService::revert_expense(&mut tx, existing.amount).await?;

        tx.commit().await?;

        self.fetch(id, true).await
    }

    /// List expenses with employee and issuer names joined.
    ///
    /// `search` matches the description as a case-insensitive substring, or
    /// the exact amount when the term parses as a number.
    pub async fn list(&self, filter: ExpenseFilter) -> AppResult<Vec<Expense>> {
        let amount_search: Option<Decimal> = filter
            .search
            .as_deref()
            .and_then(|s| s.trim().parse().ok());

        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT e.id, e.date, e.category, e.employee_id, emp.name AS employee_name,
                   e.issued_by, u.name AS issued_by_name, e.description, e.amount, e.created_at
            FROM expenses e
            LEFT JOIN employees emp ON emp.id = e.employee_id
            JOIN users u ON u.id = e.issued_by
            WHERE e.is_deleted = FALSE
              AND ($1::text IS NULL
                   OR e.description ILIKE '%' || $1 || '%'
                   OR e.amount = $2::numeric)
              AND ($3::date IS NULL OR e.created_at::date >= $3)
              AND ($4::date IS NULL OR e.created_at::date <= $4)
              AND ($5::text IS NULL OR e.category = $5)
            ORDER BY e.created_at DESC
            "#,
        )
        .bind(&filter.search)
        .bind(amount_search)
        .bind(filter.from_date)
        .bind(filter.to_date)
        .bind(filter.category.map(|c| c.as_str()))
        .fetch_all(&self.db)
        .await?;

        Ok(expenses)
    }

    /// Get a single expense; deleted expenses are reported as not found
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Expense> {
        self.fetch(id, false).await
    }

    async fn fetch(&self, id: Uuid, include_deleted: bool) -> AppResult<Expense> {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            SELECT e.id, e.date, e.category, e.employee_id, emp.name AS employee_name,
                   e.issued_by, u.name AS issued_by_name, e.description, e.amount, e.created_at
            FROM expenses e
            LEFT JOIN employees emp ON emp.id = e.employee_id
            JOIN users u ON u.id = e.issued_by
            WHERE e.id = $1 AND (e.is_deleted = FALSE OR $2)
            "#,
        )
        .bind(id)
        .bind(include_deleted)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Expense".to_string()))?;

        Ok(expense)
    }
}

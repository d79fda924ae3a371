//! Employee register service
//!
//! Plain CRUD with soft delete. The `monthly_salary` field is what the
//! expense service checks salary expenses against.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::{validate_positive_amount, EmployeePosition, Gender};

use crate::error::{AppError, AppResult};

/// Employee service
#[derive(Clone)]
pub struct EmployeeService {
    db: PgPool,
}

/// Employee record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub emergency_contact: String,
    pub position: Option<String>,
    pub gender: Option<String>,
    pub present_address: String,
    pub permanent_address: String,
    pub monthly_salary: Decimal,
    pub nid_number: String,
    pub joining_date: NaiveDate,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an employee
#[derive(Debug, Deserialize)]
pub struct CreateEmployeeInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub emergency_contact: String,
    pub position: Option<EmployeePosition>,
    pub gender: Option<Gender>,
    pub present_address: String,
    pub permanent_address: String,
    pub monthly_salary: Decimal,
    pub nid_number: String,
    pub joining_date: NaiveDate,
}

/// Input for updating an employee
#[derive(Debug, Deserialize)]
pub struct UpdateEmployeeInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub position: Option<EmployeePosition>,
    pub gender: Option<Gender>,
    pub present_address: Option<String>,
    pub permanent_address: Option<String>,
    pub monthly_salary: Option<Decimal>,
    pub nid_number: Option<String>,
    pub joining_date: Option<NaiveDate>,
}

impl EmployeeService {
    /// Create a new EmployeeService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an employee
    pub async fn create(&self, input: CreateEmployeeInput) -> AppResult<Employee> {
        validate_positive_amount(input.monthly_salary)
            .map_err(|msg| AppError::validation("monthly_salary", msg))?;

        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (name, email, phone, emergency_contact, position, gender,
                                   present_address, permanent_address, monthly_salary,
                                   nid_number, joining_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, name, email, phone, emergency_contact, position, gender,
                      present_address, permanent_address, monthly_salary, nid_number,
                      joining_date, is_deleted, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.emergency_contact)
        .bind(input.position.map(|p| p.as_str()))
        .bind(input.gender.map(|g| g.as_str()))
        .bind(&input.present_address)
        .bind(&input.permanent_address)
        .bind(input.monthly_salary)
        .bind(&input.nid_number)
        .bind(input.joining_date)
        .fetch_one(&self.db)
        .await?;

        Ok(employee)
    }

    /// List employees, optionally filtered by a name search
    pub async fn list(&self, search: Option<String>) -> AppResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, email, phone, emergency_contact, position, gender,
                   present_address, permanent_address, monthly_salary, nid_number,
                   joining_date, is_deleted, created_at, updated_at
            FROM employees
            WHERE is_deleted = FALSE
              AND ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
            ORDER BY name ASC
            "#,
        )
        .bind(&search)
        .fetch_all(&self.db)
        .await?;

        Ok(employees)
    }

    /// Get an employee by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Employee> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, email, phone, emergency_contact, position, gender,
                   present_address, permanent_address, monthly_salary, nid_number,
                   joining_date, is_deleted, created_at, updated_at
            FROM employees
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee".to_string()))?;

        Ok(employee)
    }

    /// Update an employee
    pub async fn update(&self, id: Uuid, input: UpdateEmployeeInput) -> AppResult<Employee> {
        if let Some(salary) = input.monthly_salary {
            validate_positive_amount(salary)
                .map_err(|msg| AppError::validation("monthly_salary", msg))?;
        }

        let employee = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees
            SET name = COALESCE($1, name),
                email = COALESCE($2, email),
                phone = COALESCE($3, phone),
                emergency_contact = COALESCE($4, emergency_contact),
                position = COALESCE($5, position),
                gender = COALESCE($6, gender),
                present_address = COALESCE($7, present_address),
                permanent_address = COALESCE($8, permanent_address),
                monthly_salary = COALESCE($9, monthly_salary),
                nid_number = COALESCE($10, nid_number),
                joining_date = COALESCE($11, joining_date),
                updated_at = NOW()
            WHERE id = $12 AND is_deleted = FALSE
            RETURNING id, name, email, phone, emergency_contact, position, gender,
                      present_address, permanent_address, monthly_salary, nid_number,
                      joining_date, is_deleted, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.emergency_contact)
        .bind(input.position.map(|p| p.as_str()))
        .bind(input.gender.map(|g| g.as_str()))
        .bind(&input.present_address)
        .bind(&input.permanent_address)
        .bind(input.monthly_salary)
        .bind(&input.nid_number)
        .bind(input.joining_date)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee".to_string()))?;

        Ok(employee)
    }

    /// Soft-delete an employee
    pub async fn delete(&self, id: Uuid) -> AppResult<Employee> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees
            SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING id, name, email, phone, emergency_contact, position, gender,
                      present_address, permanent_address, monthly_salary, nid_number,
                      joining_date, is_deleted, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee".to_string()))?;

        Ok(employee)
    }
}

//! HTTP handlers for the employee register

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::employee::{CreateEmployeeInput, Employee, UpdateEmployeeInput};
use crate::services::EmployeeService;
use crate::AppState;

#[derive(Deserialize)]
pub struct EmployeeQuery {
    pub search: Option<String>,
}

/// Create an employee
pub async fn create_employee(
    State(state): State<AppState>,
    Json(input): Json<CreateEmployeeInput>,
) -> AppResult<Json<Employee>> {
    let service = EmployeeService::new(state.db);
    let employee = service.create(input).await?;
    Ok(Json(employee))
}

/// List employees
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<EmployeeQuery>,
) -> AppResult<Json<Vec<Employee>>> {
    let service = EmployeeService::new(state.db);
    let employees = service.list(query.search).await?;
    Ok(Json(employees))
}

/// Get an employee
pub async fn get_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<Employee>> {
    let service = EmployeeService::new(state.db);
    let employee = service.get_by_id(employee_id).await?;
    Ok(Json(employee))
}

/// Update an employee
pub async fn update_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
    Json(input): Json<UpdateEmployeeInput>,
) -> AppResult<Json<Employee>> {
    let service = EmployeeService::new(state.db);
    let employee = service.update(employee_id, input).await?;
    Ok(Json(employee))
}

/// Soft-delete an employee
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<Employee>> {
    let service = EmployeeService::new(state.db);
    let employee = service.delete(employee_id).await?;
    Ok(Json(employee))
}

//! Common domain types used across the platform

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Staff roles for API users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    Accountant,
    StockManager,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "super_admin",
            UserRole::Admin => "admin",
            UserRole::Accountant => "accountant",
            UserRole::StockManager => "stock_manager",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "super_admin" => Some(UserRole::SuperAdmin),
            "admin" => Some(UserRole::Admin),
            "accountant" => Some(UserRole::Accountant),
            "stock_manager" => Some(UserRole::StockManager),
            _ => None,
        }
    }
}

/// Expense categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Salary,
    Material,
    Utility,
    Rent,
    Maintenance,
    Other,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Salary => "salary",
            ExpenseCategory::Material => "material",
            ExpenseCategory::Utility => "utility",
            ExpenseCategory::Rent => "rent",
            ExpenseCategory::Maintenance => "maintenance",
            ExpenseCategory::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "salary" => Some(ExpenseCategory::Salary),
            "material" => Some(ExpenseCategory::Material),
            "utility" => Some(ExpenseCategory::Utility),
            "rent" => Some(ExpenseCategory::Rent),
            "maintenance" => Some(ExpenseCategory::Maintenance),
            "other" => Some(ExpenseCategory::Other),
            _ => None,
        }
    }
}

/// Stock movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockDirection {
    In,
    Out,
}

impl StockDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockDirection::In => "in",
            StockDirection::Out => "out",
        }
    }
}

/// Payment methods accepted for collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionMethod {
    Cash,
    Cheque,
    MobileBanking,
    BankTransfer,
}

impl CollectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionMethod::Cash => "cash",
            CollectionMethod::Cheque => "cheque",
            CollectionMethod::MobileBanking => "mobile_banking",
            CollectionMethod::BankTransfer => "bank_transfer",
        }
    }
}

/// Employee positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeePosition {
    Accountant,
    JuniorSales,
    SeniorSales,
    StockManager,
    JuniorWorker,
    SeniorWorker,
    ManagingDirector,
}

impl EmployeePosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeePosition::Accountant => "accountant",
            EmployeePosition::JuniorSales => "junior_sales",
            EmployeePosition::SeniorSales => "senior_sales",
            EmployeePosition::StockManager => "stock_manager",
            EmployeePosition::JuniorWorker => "junior_worker",
            EmployeePosition::SeniorWorker => "senior_worker",
            EmployeePosition::ManagingDirector => "managing_director",
        }
    }
}

/// Gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// One invoice line: a product, how many units, and the unit price agreed
/// at sale time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
}

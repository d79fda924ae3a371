//! Validation utilities for the Trade Back-Office Platform
//!
//! Pure invariant checks re-applied by the core services regardless of what
//! the HTTP layer already validated.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::types::InvoiceLineItem;

// ============================================================================
// Money & Invoice Validations
// ============================================================================

/// Validate that an amount is strictly positive
pub fn validate_positive_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount <= Decimal::ZERO {
        return Err("Amount must be positive");
    }
    Ok(())
}

/// Validate invoice money fields: all non-negative and consistent
/// (`total = paid + due`)
pub fn validate_invoice_amounts(
    total: Decimal,
    paid: Decimal,
    due: Decimal,
) -> Result<(), &'static str> {
    if total < Decimal::ZERO || paid < Decimal::ZERO || due < Decimal::ZERO {
        return Err("Invoice amounts cannot be negative");
    }
    if paid + due != total {
        return Err("Paid and due amounts must add up to the total");
    }
    Ok(())
}

/// Validate invoice line items: at least one line, positive quantities,
/// non-negative unit prices
pub fn validate_line_items(items: &[InvoiceLineItem]) -> Result<(), &'static str> {
    if items.is_empty() {
        return Err("Invoice must contain at least one line item");
    }
    for item in items {
        if item.quantity <= 0 {
            return Err("Line item quantity must be positive");
        }
        if item.price < Decimal::ZERO {
            return Err("Line item price cannot be negative");
        }
    }
    Ok(())
}

// ============================================================================
// Invoice Numbering
// ============================================================================

/// Width invoice numbers are zero-padded to
pub const INVOICE_NUMBER_WIDTH: usize = 5;

/// Format a numeric invoice number as its zero-padded wire form
pub fn format_invoice_number(n: i64) -> String {
    format!("{:0width$}", n, width = INVOICE_NUMBER_WIDTH)
}

/// Parse the numeric value out of a stored invoice number
pub fn parse_invoice_number(s: &str) -> Option<i64> {
    s.parse::<i64>().ok()
}

/// Next invoice number given the current maximum over all invoices ever
/// created, deleted ones included. Numbering starts at 1 and is never
/// reused.
pub fn next_invoice_number(current_max: Option<i64>) -> i64 {
    current_max.unwrap_or(0) + 1
}

// ============================================================================
// Salary Expenses
// ============================================================================

/// Calendar-month window `[start of month, start of next month)` containing
/// `today`. Used to enforce the one-salary-per-employee-per-month rule.
pub fn salary_month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
        .unwrap_or(today);
    let next = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    }
    .unwrap_or(start);
    (start, next)
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate a password meets the minimum length policy
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters");
    }
    Ok(())
}

//! HTTP handlers for the Trade Back-Office Platform

pub mod analytics;
pub mod auth;
pub mod balance;
pub mod collections;
pub mod customers;
pub mod employees;
pub mod expenses;
pub mod health;
pub mod invoices;
pub mod products;
pub mod stock;
pub mod users;

pub use analytics::*;
pub use auth::*;
pub use balance::*;
pub use collections::*;
pub use customers::*;
pub use employees::*;
pub use expenses::*;
pub use health::*;
pub use invoices::*;
pub use products::*;
pub use stock::*;
pub use users::*;

//! Business logic services for the Trade Back-Office Platform

pub mod analytics;
pub mod auth;
pub mod balance;
pub mod collection;
pub mod customer;
pub mod employee;
pub mod expense;
pub mod invoice;
pub mod product;
pub mod stock;
pub mod user;

pub use analytics::AnalyticsService;
pub use auth::AuthService;
pub use balance::BalanceService;
pub use collection::CollectionService;
pub use customer::CustomerService;
pub use employee::EmployeeService;
pub use expense::ExpenseService;
pub use invoice::InvoiceService;
pub use product::ProductService;
pub use stock::StockService;
pub use user::UserService;

//! Route definitions for the Trade Back-Office Platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (login/refresh public, password change protected)
        .nest("/auth", auth_routes())
        // Protected routes - user accounts
        .nest("/users", user_routes())
        // Protected routes - product catalogue
        .nest("/products", product_routes())
        // Protected routes - customer register
        .nest("/customers", customer_routes())
        // Protected routes - employee register
        .nest("/employees", employee_routes())
        // Protected routes - invoices
        .nest("/invoices", invoice_routes())
        // Protected routes - expenses
        .nest("/expenses", expense_routes())
        // Protected routes - stock movements
        .nest("/stock", stock_routes())
        // Protected routes - collections
        .nest("/collections", collection_routes())
        // Protected routes - running balance
        .nest("/balance", balance_routes())
        // Protected routes - analytics
        .nest("/analytics", analytics_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route(
            "/change-password",
            post(handlers::change_password).route_layer(middleware::from_fn(auth_middleware)),
        )
}

/// User account routes (protected)
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/:user_id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Product catalogue routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Customer register routes (protected)
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/:customer_id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Employee register routes (protected)
fn employee_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route(
            "/:employee_id",
            get(handlers::get_employee)
                .put(handlers::update_employee)
                .delete(handlers::delete_employee),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Invoice routes (protected)
fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_invoices).post(handlers::create_invoice),
        )
        .route(
            "/:invoice_id",
            get(handlers::get_invoice)
                .put(handlers::edit_invoice)
                .delete(handlers::delete_invoice),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Expense routes (protected)
fn expense_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_expenses).post(handlers::add_expense),
        )
        .route(
            "/:expense_id",
            get(handlers::get_expense)
                .put(handlers::edit_expense)
                .delete(handlers::delete_expense),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Stock movement routes (protected)
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/in", post(handlers::stock_in))
        .route("/deduct/:invoice_number", put(handlers::deduct_stock))
        .route("/history", get(handlers::stock_history))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Collection routes (protected)
fn collection_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_collections).post(handlers::create_collection),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Balance routes (protected)
fn balance_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_balance))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Analytics routes (protected)
fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/sales/daily", get(handlers::daily_sales_summary))
        .route("/sales/monthly", get(handlers::monthly_summary))
        .route_layer(middleware::from_fn(auth_middleware))
}

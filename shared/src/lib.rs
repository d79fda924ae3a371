//! Shared types and domain rules for the Trade Back-Office Platform
//!
//! This crate contains the types, enums and pure bookkeeping rules shared
//! between the backend service and its test suites.

pub mod ledger;
pub mod types;
pub mod validation;

pub use ledger::*;
pub use types::*;
pub use validation::*;

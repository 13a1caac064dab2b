//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations here are thin: they translate between Diesel
//! row structs and domain types, and map database failures to the domain's
//! persistence error types. Row structs (`models.rs`) and table definitions
//! (`schema.rs`) stay internal to this module.

pub mod diesel_budget_repository;
pub mod diesel_expense_repository;
pub mod diesel_user_repository;
mod models;
pub mod pool;
pub mod schema;

pub use diesel_budget_repository::DieselBudgetRepository;
pub use diesel_expense_repository::DieselExpenseRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

//! Domain ports: the traits adapters implement (driven) or call (driving).

mod macros;

pub mod analytics_query;
pub mod budget_repository;
pub mod expense_repository;
pub mod user_repository;

pub(crate) use macros::define_port_error;

pub use analytics_query::AnalyticsQuery;
pub use budget_repository::{BudgetPersistenceError, BudgetRepository, FixtureBudgetRepository};
pub use expense_repository::{
    ExpenseFilter, ExpensePersistenceError, ExpenseRepository, FixtureExpenseRepository,
};
pub use user_repository::{FixtureUserRepository, UserPersistenceError, UserRepository};

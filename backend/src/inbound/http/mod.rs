//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod analytics;
pub mod auth;
pub mod budgets;
pub mod error;
pub mod expenses;
pub mod health;
pub mod state;

pub use error::ApiResult;
pub use state::HttpState;

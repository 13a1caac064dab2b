//! Domain layer: models, use-case services, and the ports adapters plug into.
//!
//! Nothing here imports Actix or Diesel; inbound and outbound adapters depend
//! on this module, never the other way around.

pub mod account_service;
pub mod analytics;
pub mod analytics_service;
pub mod auth;
pub mod budget;
pub mod error;
pub mod expense;
pub mod password;
pub mod ports;
pub mod token;
pub mod user;

pub use account_service::{AccountService, AuthenticatedAccount};
pub use analytics::{aggregate, AnalyticsSummary, CategorySummary, MonthlyTotal};
pub use analytics_service::{AnalyticsService, RETRIEVAL_CAP};
pub use auth::{CredentialValidationError, LoginCredentials, RegistrationDetails};
pub use budget::{Budget, BudgetDraft, BudgetId, BudgetValidationError};
pub use error::{Error, ErrorCode};
pub use expense::{
    Category, DateRange, Expense, ExpenseDraft, ExpenseId, ExpenseValidationError,
};
pub use token::{AuthTokenError, SigningKey, TokenSigner, TOKEN_TTL_DAYS};
pub use user::{EmailAddress, User, UserId, UserValidationError, NAME_MAX};

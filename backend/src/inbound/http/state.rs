//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle via `actix_web::web::Data`, so they depend
//! only on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AnalyticsQuery, BudgetRepository, ExpenseRepository};
use crate::domain::AccountService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<AccountService>,
    pub expenses: Arc<dyn ExpenseRepository>,
    pub budgets: Arc<dyn BudgetRepository>,
    pub analytics: Arc<dyn AnalyticsQuery>,
}

impl HttpState {
    /// Construct state from its port implementations.
    #[must_use]
    pub fn new(
        accounts: Arc<AccountService>,
        expenses: Arc<dyn ExpenseRepository>,
        budgets: Arc<dyn BudgetRepository>,
        analytics: Arc<dyn AnalyticsQuery>,
    ) -> Self {
        Self {
            accounts,
            expenses,
            budgets,
            analytics,
        }
    }
}

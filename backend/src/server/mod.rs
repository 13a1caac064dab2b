//! Server wiring: state construction and route registration.

pub mod config;

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    FixtureBudgetRepository, FixtureExpenseRepository, FixtureUserRepository,
};
use crate::domain::{AccountService, AnalyticsService, TokenSigner};
use crate::inbound::http::{accounts, analytics, budgets, expenses, HttpState};
use crate::outbound::persistence::{
    DbPool, DieselBudgetRepository, DieselExpenseRepository, DieselUserRepository,
};

pub use config::AppConfig;

/// Build handler state over in-memory fixture stores.
///
/// Used for tests and for development runs without `DATABASE_URL`; data does
/// not survive a restart.
#[must_use]
pub fn fixture_state(signer: &TokenSigner) -> HttpState {
    let users = Arc::new(FixtureUserRepository::new());
    let expenses = Arc::new(FixtureExpenseRepository::new());
    let budgets = Arc::new(FixtureBudgetRepository::new());
    HttpState::new(
        Arc::new(AccountService::new(users, signer.clone())),
        expenses.clone(),
        budgets,
        Arc::new(AnalyticsService::new(expenses)),
    )
}

/// Build handler state over Diesel-backed PostgreSQL stores.
#[must_use]
pub fn diesel_state(pool: DbPool, signer: &TokenSigner) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let expenses = Arc::new(DieselExpenseRepository::new(pool.clone()));
    let budgets = Arc::new(DieselBudgetRepository::new(pool));
    HttpState::new(
        Arc::new(AccountService::new(users, signer.clone())),
        expenses.clone(),
        budgets,
        Arc::new(AnalyticsService::new(expenses)),
    )
}

/// Register the `/api` scope and its handler state.
///
/// Shared between the binary and integration tests so both run the exact
/// routing table.
pub fn mount_api(cfg: &mut web::ServiceConfig, state: HttpState, signer: TokenSigner) {
    cfg.app_data(web::Data::new(state))
        .app_data(web::Data::new(signer))
        .service(
            web::scope("/api")
                .service(accounts::register)
                .service(accounts::login)
                .service(expenses::create_expense)
                .service(expenses::list_expenses)
                .service(expenses::get_expense)
                .service(expenses::update_expense)
                .service(expenses::delete_expense)
                .service(analytics::summary)
                .service(budgets::set_budget)
                .service(budgets::list_budgets),
        );
}

//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and are
//! never exposed to the domain; adapters translate them at the boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{budgets, expenses, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the expenses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = expenses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExpenseRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new expense records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = expenses)]
pub(crate) struct NewExpenseRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    pub category: &'a str,
    pub description: &'a str,
    pub date: String,
    pub created_at: DateTime<Utc>,
}

/// Changeset struct applied by full-record replacement.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = expenses)]
pub(crate) struct ExpenseChangeset<'a> {
    pub amount: f64,
    pub category: &'a str,
    pub description: &'a str,
    pub date: String,
}

/// Row struct for reading from the budgets table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = budgets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BudgetRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub monthly_limit: f64,
    pub month: i32,
    pub year: i32,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new budget records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = budgets)]
pub(crate) struct NewBudgetRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: &'a str,
    pub monthly_limit: f64,
    pub month: i32,
    pub year: i32,
    pub created_at: DateTime<Utc>,
}

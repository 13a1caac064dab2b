//! PostgreSQL-backed `ExpenseRepository` implementation using Diesel.
//!
//! Expense dates are stored as zero-padded ISO `YYYY-MM-DD` strings, so the
//! inclusive range filters below compare lexicographically. Rows whose date
//! no longer parses are skipped with a warning rather than failing the whole
//! query; one corrupt row must not take analytics down.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{ExpenseFilter, ExpensePersistenceError, ExpenseRepository};
use crate::domain::{Category, DateRange, Expense, ExpenseDraft, ExpenseId, UserId};

use super::models::{ExpenseChangeset, ExpenseRow, NewExpenseRow};
use super::pool::{DbPool, PoolError};
use super::schema::expenses;

/// Diesel-backed implementation of the `ExpenseRepository` port.
#[derive(Clone)]
pub struct DieselExpenseRepository {
    pool: DbPool,
}

impl DieselExpenseRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ExpensePersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ExpensePersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ExpensePersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ExpensePersistenceError::connection("database connection error")
        }
        _ => ExpensePersistenceError::query("database error"),
    }
}

/// Convert a row to a domain expense, skipping rows that fail validation.
fn row_to_expense(row: ExpenseRow) -> Option<Expense> {
    let date: NaiveDate = match row.date.parse() {
        Ok(date) => date,
        Err(_) => {
            warn!(expense_id = %row.id, date = %row.date, "skipping expense with malformed date");
            return None;
        }
    };
    let category = match Category::new(row.category) {
        Ok(category) => category,
        Err(err) => {
            warn!(expense_id = %row.id, %err, "skipping expense with invalid category");
            return None;
        }
    };
    let draft = match ExpenseDraft::new(row.amount, category, row.description, date) {
        Ok(draft) => draft,
        Err(err) => {
            warn!(expense_id = %row.id, %err, "skipping invalid expense row");
            return None;
        }
    };
    Some(Expense::from_parts(
        ExpenseId::from_uuid(row.id),
        UserId::from_uuid(row.user_id),
        draft,
        row.created_at,
    ))
}

type ExpensesQuery<'a> = expenses::BoxedQuery<'a, diesel::pg::Pg>;

fn scoped_query<'a>(owner: &UserId, range: &DateRange) -> ExpensesQuery<'a> {
    let mut query = expenses::table
        .filter(expenses::user_id.eq(*owner.as_uuid()))
        .into_boxed();
    if let Some(start) = range.start() {
        query = query.filter(expenses::date.ge(start.to_string()));
    }
    if let Some(end) = range.end() {
        query = query.filter(expenses::date.le(end.to_string()));
    }
    query
}

#[async_trait]
impl ExpenseRepository for DieselExpenseRepository {
    async fn insert(&self, expense: &Expense) -> Result<(), ExpensePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewExpenseRow {
            id: *expense.id().as_uuid(),
            user_id: *expense.owner().as_uuid(),
            amount: expense.amount(),
            category: expense.category().as_ref(),
            description: expense.description(),
            date: expense.date().to_string(),
            created_at: expense.created_at(),
        };

        diesel::insert_into(expenses::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        owner: &UserId,
        id: &ExpenseId,
    ) -> Result<Option<Expense>, ExpensePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ExpenseRow> = expenses::table
            .filter(expenses::user_id.eq(*owner.as_uuid()))
            .filter(expenses::id.eq(*id.as_uuid()))
            .select(ExpenseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.and_then(row_to_expense))
    }

    async fn list(
        &self,
        owner: &UserId,
        filter: &ExpenseFilter,
        limit: i64,
    ) -> Result<Vec<Expense>, ExpensePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = scoped_query(owner, &filter.range);
        if let Some(category) = filter.category.as_ref() {
            query = query.filter(expenses::category.eq(category.as_ref().to_owned()));
        }

        let rows: Vec<ExpenseRow> = query
            .order((expenses::date.desc(), expenses::created_at.desc()))
            .limit(limit)
            .select(ExpenseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().filter_map(row_to_expense).collect())
    }

    async fn find_in_range(
        &self,
        owner: &UserId,
        range: &DateRange,
        limit: i64,
    ) -> Result<Vec<Expense>, ExpensePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ExpenseRow> = scoped_query(owner, range)
            .order(expenses::created_at.asc())
            .limit(limit)
            .select(ExpenseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().filter_map(row_to_expense).collect())
    }

    async fn replace(
        &self,
        owner: &UserId,
        id: &ExpenseId,
        draft: ExpenseDraft,
    ) -> Result<Option<Expense>, ExpensePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = ExpenseChangeset {
            amount: draft.amount(),
            category: draft.category().as_ref(),
            description: draft.description(),
            date: draft.date().to_string(),
        };

        let row: Option<ExpenseRow> = diesel::update(
            expenses::table
                .filter(expenses::user_id.eq(*owner.as_uuid()))
                .filter(expenses::id.eq(*id.as_uuid())),
        )
        .set(&changeset)
        .returning(ExpenseRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        Ok(row.and_then(row_to_expense))
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: &ExpenseId,
    ) -> Result<bool, ExpensePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(
            expenses::table
                .filter(expenses::user_id.eq(*owner.as_uuid()))
                .filter(expenses::id.eq(*id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(removed > 0)
    }
}

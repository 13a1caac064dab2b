//! PostgreSQL-backed `BudgetRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{BudgetPersistenceError, BudgetRepository};
use crate::domain::{Budget, BudgetDraft, BudgetId, Category, UserId};

use super::models::{BudgetRow, NewBudgetRow};
use super::pool::{DbPool, PoolError};
use super::schema::budgets;

/// Diesel-backed implementation of the `BudgetRepository` port.
///
/// Upserts rely on the unique index over `(user_id, category, month, year)`;
/// a conflicting insert updates the stored limit in place.
#[derive(Clone)]
pub struct DieselBudgetRepository {
    pool: DbPool,
}

impl DieselBudgetRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BudgetPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            BudgetPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> BudgetPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            BudgetPersistenceError::connection("database connection error")
        }
        _ => BudgetPersistenceError::query("database error"),
    }
}

/// Convert a row to a domain budget, skipping rows that fail validation.
fn row_to_budget(row: BudgetRow) -> Option<Budget> {
    let category = match Category::new(row.category) {
        Ok(category) => category,
        Err(err) => {
            warn!(budget_id = %row.id, %err, "skipping budget with invalid category");
            return None;
        }
    };
    let month = u32::try_from(row.month).ok()?;
    let draft = match BudgetDraft::new(category, row.monthly_limit, month, row.year) {
        Ok(draft) => draft,
        Err(err) => {
            warn!(budget_id = %row.id, %err, "skipping invalid budget row");
            return None;
        }
    };
    Some(Budget::from_parts(
        BudgetId::from_uuid(row.id),
        UserId::from_uuid(row.user_id),
        draft,
        row.created_at,
    ))
}

#[async_trait]
impl BudgetRepository for DieselBudgetRepository {
    async fn upsert(
        &self,
        owner: &UserId,
        draft: BudgetDraft,
    ) -> Result<Budget, BudgetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let fresh = Budget::create(owner.clone(), draft);
        #[expect(
            clippy::cast_possible_wrap,
            reason = "month is validated to the range 1..=12"
        )]
        let month = fresh.month() as i32;
        let row = NewBudgetRow {
            id: *fresh.id().as_uuid(),
            user_id: *fresh.owner().as_uuid(),
            category: fresh.category().as_ref(),
            monthly_limit: fresh.monthly_limit(),
            month,
            year: fresh.year(),
            created_at: fresh.created_at(),
        };

        let stored: BudgetRow = diesel::insert_into(budgets::table)
            .values(&row)
            .on_conflict((
                budgets::user_id,
                budgets::category,
                budgets::month,
                budgets::year,
            ))
            .do_update()
            .set(budgets::monthly_limit.eq(fresh.monthly_limit()))
            .returning(BudgetRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_budget(stored)
            .ok_or_else(|| BudgetPersistenceError::query("corrupt budget row after upsert"))
    }

    async fn list(&self, owner: &UserId) -> Result<Vec<Budget>, BudgetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BudgetRow> = budgets::table
            .filter(budgets::user_id.eq(*owner.as_uuid()))
            .order(budgets::created_at.desc())
            .select(BudgetRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().filter_map(row_to_budget).collect())
    }
}

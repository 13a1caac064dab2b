//! Port abstraction for budget persistence adapters and their errors.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::budget::{Budget, BudgetDraft};
use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by budget repository adapters.
    pub enum BudgetPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "budget store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "budget store query failed: {message}",
    }
}

/// Driven port for the budget store.
#[async_trait]
pub trait BudgetRepository: Send + Sync {
    /// Insert a budget or replace the stored limit when `owner` already has
    /// one for the draft's `(category, month, year)` key. Returns the stored
    /// record.
    async fn upsert(
        &self,
        owner: &UserId,
        draft: BudgetDraft,
    ) -> Result<Budget, BudgetPersistenceError>;

    /// List all of `owner`'s budgets, newest first.
    async fn list(&self, owner: &UserId) -> Result<Vec<Budget>, BudgetPersistenceError>;
}

/// In-memory budget store for tests and database-less development runs.
#[derive(Debug, Default)]
pub struct FixtureBudgetRepository {
    budgets: Mutex<Vec<Budget>>,
}

impl FixtureBudgetRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_budgets<T>(&self, f: impl FnOnce(&mut Vec<Budget>) -> T) -> T {
        let mut guard = self
            .budgets
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

#[async_trait]
impl BudgetRepository for FixtureBudgetRepository {
    async fn upsert(
        &self,
        owner: &UserId,
        draft: BudgetDraft,
    ) -> Result<Budget, BudgetPersistenceError> {
        Ok(self.with_budgets(|budgets| {
            if let Some(slot) = budgets
                .iter_mut()
                .find(|budget| budget.owner() == owner && budget.matches_key(&draft))
            {
                *slot = slot.replaced_with(draft);
                return slot.clone();
            }
            let created = Budget::create(owner.clone(), draft);
            budgets.push(created.clone());
            created
        }))
    }

    async fn list(&self, owner: &UserId) -> Result<Vec<Budget>, BudgetPersistenceError> {
        Ok(self.with_budgets(|budgets| {
            let mut owned: Vec<Budget> = budgets
                .iter()
                .filter(|budget| budget.owner() == owner)
                .cloned()
                .collect();
            owned.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
            owned
        }))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::expense::Category;

    fn draft(category: &str, limit: f64, month: u32, year: i32) -> BudgetDraft {
        BudgetDraft::new(
            Category::new(category).expect("valid category"),
            limit,
            month,
            year,
        )
        .expect("valid draft")
    }

    #[tokio::test]
    async fn upsert_creates_then_replaces_by_key() {
        let repo = FixtureBudgetRepository::new();
        let owner = UserId::random();

        let created = repo
            .upsert(&owner, draft("Groceries", 200.0, 6, 2024))
            .await
            .expect("upsert succeeds");
        let replaced = repo
            .upsert(&owner, draft("Groceries", 350.0, 6, 2024))
            .await
            .expect("upsert succeeds");

        assert_eq!(replaced.id(), created.id());
        assert_eq!(replaced.monthly_limit(), 350.0);
        let listed = repo.list(&owner).await.expect("list succeeds");
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn distinct_keys_produce_distinct_budgets() {
        let repo = FixtureBudgetRepository::new();
        let owner = UserId::random();

        repo.upsert(&owner, draft("Groceries", 200.0, 6, 2024))
            .await
            .expect("upsert succeeds");
        repo.upsert(&owner, draft("Groceries", 200.0, 7, 2024))
            .await
            .expect("upsert succeeds");
        repo.upsert(&owner, draft("Travel", 500.0, 6, 2024))
            .await
            .expect("upsert succeeds");

        let listed = repo.list(&owner).await.expect("list succeeds");
        assert_eq!(listed.len(), 3);
    }

    #[tokio::test]
    async fn budgets_are_scoped_to_their_owner() {
        let repo = FixtureBudgetRepository::new();
        let owner = UserId::random();
        repo.upsert(&owner, draft("Groceries", 200.0, 6, 2024))
            .await
            .expect("upsert succeeds");

        let listed = repo
            .list(&UserId::random())
            .await
            .expect("list succeeds");
        assert!(listed.is_empty());
    }
}

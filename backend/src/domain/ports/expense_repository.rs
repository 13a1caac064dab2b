//! Port abstraction for expense persistence adapters and their errors.

use std::cmp::Reverse;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::expense::{Category, DateRange, Expense, ExpenseDraft, ExpenseId};
use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by expense repository adapters.
    pub enum ExpensePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "expense store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "expense store query failed: {message}",
    }
}

/// Optional filters applied when listing expenses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Exact-match category filter.
    pub category: Option<Category>,
    /// Inclusive date bounds.
    pub range: DateRange,
}

impl ExpenseFilter {
    fn matches(&self, expense: &Expense) -> bool {
        self.category
            .as_ref()
            .is_none_or(|category| expense.category() == category)
            && self.range.contains(expense.date())
    }
}

/// Driven port for the expense store.
///
/// Every method takes the acting owner; adapters must never return or touch a
/// record owned by anyone else.
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Persist a new expense record.
    async fn insert(&self, expense: &Expense) -> Result<(), ExpensePersistenceError>;

    /// Fetch one of `owner`'s expenses by id.
    async fn find_by_id(
        &self,
        owner: &UserId,
        id: &ExpenseId,
    ) -> Result<Option<Expense>, ExpensePersistenceError>;

    /// List `owner`'s expenses matching `filter`, newest date first, capped
    /// at `limit` records.
    async fn list(
        &self,
        owner: &UserId,
        filter: &ExpenseFilter,
        limit: i64,
    ) -> Result<Vec<Expense>, ExpensePersistenceError>;

    /// Fetch `owner`'s expenses dated inside `range` in insertion order
    /// (ascending creation time), capped at `limit` records. Aggregation
    /// depends on this order for its first-seen category grouping.
    async fn find_in_range(
        &self,
        owner: &UserId,
        range: &DateRange,
        limit: i64,
    ) -> Result<Vec<Expense>, ExpensePersistenceError>;

    /// Replace the mutable fields of one of `owner`'s expenses. Returns the
    /// updated record, or `None` when no such record belongs to `owner`.
    async fn replace(
        &self,
        owner: &UserId,
        id: &ExpenseId,
        draft: ExpenseDraft,
    ) -> Result<Option<Expense>, ExpensePersistenceError>;

    /// Delete one of `owner`'s expenses. Returns whether a record was removed.
    async fn delete(
        &self,
        owner: &UserId,
        id: &ExpenseId,
    ) -> Result<bool, ExpensePersistenceError>;
}

/// In-memory expense store for tests and database-less development runs.
#[derive(Debug, Default)]
pub struct FixtureExpenseRepository {
    expenses: Mutex<Vec<Expense>>,
}

impl FixtureExpenseRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_expenses<T>(&self, f: impl FnOnce(&mut Vec<Expense>) -> T) -> T {
        let mut guard = self
            .expenses
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

#[async_trait]
impl ExpenseRepository for FixtureExpenseRepository {
    async fn insert(&self, expense: &Expense) -> Result<(), ExpensePersistenceError> {
        self.with_expenses(|expenses| expenses.push(expense.clone()));
        Ok(())
    }

    async fn find_by_id(
        &self,
        owner: &UserId,
        id: &ExpenseId,
    ) -> Result<Option<Expense>, ExpensePersistenceError> {
        Ok(self.with_expenses(|expenses| {
            expenses
                .iter()
                .find(|expense| expense.owner() == owner && expense.id() == id)
                .cloned()
        }))
    }

    async fn list(
        &self,
        owner: &UserId,
        filter: &ExpenseFilter,
        limit: i64,
    ) -> Result<Vec<Expense>, ExpensePersistenceError> {
        Ok(self.with_expenses(|expenses| {
            let mut matched: Vec<Expense> = expenses
                .iter()
                .filter(|expense| expense.owner() == owner && filter.matches(expense))
                .cloned()
                .collect();
            matched.sort_by_key(|expense| Reverse((expense.date(), expense.created_at())));
            matched.truncate(usize::try_from(limit).unwrap_or(0));
            matched
        }))
    }

    async fn find_in_range(
        &self,
        owner: &UserId,
        range: &DateRange,
        limit: i64,
    ) -> Result<Vec<Expense>, ExpensePersistenceError> {
        Ok(self.with_expenses(|expenses| {
            let mut matched: Vec<Expense> = expenses
                .iter()
                .filter(|expense| expense.owner() == owner && range.contains(expense.date()))
                .cloned()
                .collect();
            matched.sort_by_key(Expense::created_at);
            matched.truncate(usize::try_from(limit).unwrap_or(0));
            matched
        }))
    }

    async fn replace(
        &self,
        owner: &UserId,
        id: &ExpenseId,
        draft: ExpenseDraft,
    ) -> Result<Option<Expense>, ExpensePersistenceError> {
        Ok(self.with_expenses(|expenses| {
            let slot = expenses
                .iter_mut()
                .find(|expense| expense.owner() == owner && expense.id() == id)?;
            *slot = slot.replaced_with(draft);
            Some(slot.clone())
        }))
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: &ExpenseId,
    ) -> Result<bool, ExpensePersistenceError> {
        Ok(self.with_expenses(|expenses| {
            let before = expenses.len();
            expenses.retain(|expense| !(expense.owner() == owner && expense.id() == id));
            expenses.len() < before
        }))
    }
}

//! Analytics use-case service wired over the expense store.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::analytics::{aggregate, AnalyticsSummary};
use crate::domain::expense::DateRange;
use crate::domain::ports::{AnalyticsQuery, ExpenseRepository};
use crate::domain::{Error, UserId};

/// Upper bound on records retrieved for one summary computation.
///
/// Aggregation is linear in record count; the cap keeps a single request from
/// pulling an unbounded working set into memory. A personal tracker stays far
/// below it in practice.
pub const RETRIEVAL_CAP: i64 = 10_000;

/// Computes spending summaries by retrieving records and aggregating them.
pub struct AnalyticsService {
    expenses: Arc<dyn ExpenseRepository>,
}

impl AnalyticsService {
    #[must_use]
    pub fn new(expenses: Arc<dyn ExpenseRepository>) -> Self {
        Self { expenses }
    }
}

#[async_trait]
impl AnalyticsQuery for AnalyticsService {
    async fn summarize(
        &self,
        owner: &UserId,
        range: &DateRange,
    ) -> Result<AnalyticsSummary, Error> {
        let records = self
            .expenses
            .find_in_range(owner, range, RETRIEVAL_CAP)
            .await
            .map_err(|error| {
                tracing::error!(%error, "expense retrieval failed during summary");
                Error::service_unavailable("expense store unavailable")
            })?;
        Ok(aggregate(&records))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::expense::{Category, Expense, ExpenseDraft, ExpenseId};
    use crate::domain::ports::{
        ExpenseFilter, ExpensePersistenceError, FixtureExpenseRepository,
    };
    use crate::domain::ErrorCode;

    fn date(raw: &str) -> NaiveDate {
        raw.parse().expect("valid ISO date")
    }

    fn draft(amount: f64, category: &str, day: &str) -> ExpenseDraft {
        ExpenseDraft::new(
            amount,
            Category::new(category).expect("valid category"),
            "",
            date(day),
        )
        .expect("valid draft")
    }

    #[tokio::test]
    async fn summarizes_only_records_inside_the_range() {
        let repo = Arc::new(FixtureExpenseRepository::new());
        let owner = UserId::random();
        for (amount, category, day) in [
            (25.50, "Food", "2024-01-15"),
            (30.00, "Food", "2024-02-03"),
            (10.00, "Transport", "2024-02-10"),
        ] {
            repo.insert(&Expense::create(owner.clone(), draft(amount, category, day)))
                .await
                .expect("insert succeeds");
        }
        let service = AnalyticsService::new(repo);

        let range =
            DateRange::new(Some(date("2024-02-01")), None).expect("valid range");
        let summary = service
            .summarize(&owner, &range)
            .await
            .expect("summary succeeds");

        assert_eq!(summary.total_expenses, 40.00);
        assert_eq!(summary.expense_count, 2);
        assert_eq!(summary.monthly_trend.len(), 1);
        assert_eq!(summary.monthly_trend[0].month, "2024-02");
    }

    #[tokio::test]
    async fn summary_for_a_stranger_is_empty() {
        let repo = Arc::new(FixtureExpenseRepository::new());
        let owner = UserId::random();
        repo.insert(&Expense::create(owner, draft(5.0, "Food", "2024-01-01")))
            .await
            .expect("insert succeeds");
        let service = AnalyticsService::new(repo);

        let summary = service
            .summarize(&UserId::random(), &DateRange::unbounded())
            .await
            .expect("summary succeeds");
        assert_eq!(summary, AnalyticsSummary::empty());
    }

    struct BrokenExpenseRepository;

    #[async_trait]
    impl ExpenseRepository for BrokenExpenseRepository {
        async fn insert(&self, _expense: &Expense) -> Result<(), ExpensePersistenceError> {
            Err(ExpensePersistenceError::connection("down"))
        }

        async fn find_by_id(
            &self,
            _owner: &UserId,
            _id: &ExpenseId,
        ) -> Result<Option<Expense>, ExpensePersistenceError> {
            Err(ExpensePersistenceError::connection("down"))
        }

        async fn list(
            &self,
            _owner: &UserId,
            _filter: &ExpenseFilter,
            _limit: i64,
        ) -> Result<Vec<Expense>, ExpensePersistenceError> {
            Err(ExpensePersistenceError::connection("down"))
        }

        async fn find_in_range(
            &self,
            _owner: &UserId,
            _range: &DateRange,
            _limit: i64,
        ) -> Result<Vec<Expense>, ExpensePersistenceError> {
            Err(ExpensePersistenceError::connection("down"))
        }

        async fn replace(
            &self,
            _owner: &UserId,
            _id: &ExpenseId,
            _draft: ExpenseDraft,
        ) -> Result<Option<Expense>, ExpensePersistenceError> {
            Err(ExpensePersistenceError::connection("down"))
        }

        async fn delete(
            &self,
            _owner: &UserId,
            _id: &ExpenseId,
        ) -> Result<bool, ExpensePersistenceError> {
            Err(ExpensePersistenceError::connection("down"))
        }
    }

    #[tokio::test]
    async fn store_failure_maps_to_service_unavailable() {
        let service = AnalyticsService::new(Arc::new(BrokenExpenseRepository));
        let err = service
            .summarize(&UserId::random(), &DateRange::unbounded())
            .await
            .expect_err("broken store must fail");
        assert_eq!(err.code, ErrorCode::ServiceUnavailable);
        assert_eq!(err.message, "expense store unavailable");
    }
}

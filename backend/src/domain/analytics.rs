//! Pure expense aggregation.
//!
//! [`aggregate`] is a pure function over an in-memory slice of expenses; it
//! performs no I/O and is deterministic for a given input order. Retrieval
//! and ordering concerns live in the analytics service.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::expense::Expense;

/// Per-category totals, ordered by first appearance in the input.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategorySummary {
    /// Category label, reported verbatim.
    pub category: String,
    /// Sum of amounts in this category.
    pub total: f64,
    /// Number of records in this category.
    pub count: u64,
}

/// Total spend for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlyTotal {
    /// Month key in `YYYY-MM` form.
    pub month: String,
    /// Sum of amounts dated in this month.
    pub amount: f64,
}

/// Aggregated view over a set of expense records.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AnalyticsSummary {
    /// Sum of all amounts.
    pub total_expenses: f64,
    /// Number of records aggregated.
    pub expense_count: u64,
    /// Per-category breakdown, first-seen order.
    pub categories: Vec<CategorySummary>,
    /// Month-by-month totals, ascending by month key.
    pub monthly_trend: Vec<MonthlyTotal>,
}

impl AnalyticsSummary {
    /// The summary of zero records.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_expenses: 0.0,
            expense_count: 0,
            categories: Vec::new(),
            monthly_trend: Vec::new(),
        }
    }
}

/// Aggregate `expenses` into totals, category groups, and a monthly trend.
///
/// Categories are grouped by exact string equality and reported in the order
/// each label first appears in the input. Months are keyed `YYYY-MM` from the
/// expense date and reported in ascending calendar order regardless of input
/// order.
#[must_use]
pub fn aggregate(expenses: &[Expense]) -> AnalyticsSummary {
    if expenses.is_empty() {
        return AnalyticsSummary::empty();
    }

    let mut total = 0.0_f64;
    let mut category_index: HashMap<String, usize> = HashMap::new();
    let mut categories: Vec<CategorySummary> = Vec::new();
    let mut months: BTreeMap<String, f64> = BTreeMap::new();

    for expense in expenses {
        total += expense.amount();

        let label = expense.category().as_ref();
        match category_index.get(label) {
            Some(&slot) => {
                let entry = &mut categories[slot];
                entry.total += expense.amount();
                entry.count += 1;
            }
            None => {
                category_index.insert(label.to_owned(), categories.len());
                categories.push(CategorySummary {
                    category: label.to_owned(),
                    total: expense.amount(),
                    count: 1,
                });
            }
        }

        let month_key = expense.date().format("%Y-%m").to_string();
        *months.entry(month_key).or_insert(0.0) += expense.amount();
    }

    AnalyticsSummary {
        total_expenses: total,
        expense_count: expenses.len() as u64,
        categories,
        monthly_trend: months
            .into_iter()
            .map(|(month, amount)| MonthlyTotal { month, amount })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::expense::{Category, ExpenseDraft};
    use crate::domain::UserId;

    fn expense(amount: f64, category: &str, date: &str) -> Expense {
        let draft = ExpenseDraft::new(
            amount,
            Category::new(category).expect("valid category"),
            "",
            date.parse::<NaiveDate>().expect("valid ISO date"),
        )
        .expect("valid draft");
        Expense::create(UserId::random(), draft)
    }

    #[test]
    fn empty_input_yields_empty_summary() {
        assert_eq!(aggregate(&[]), AnalyticsSummary::empty());
        assert_eq!(AnalyticsSummary::empty().total_expenses, 0.0);
    }

    #[test]
    fn aggregates_totals_categories_and_trend() {
        let records = vec![
            expense(25.50, "Food", "2024-01-15"),
            expense(30.00, "Food", "2024-02-03"),
            expense(10.00, "Transport", "2024-02-10"),
        ];

        let summary = aggregate(&records);

        assert_eq!(summary.total_expenses, 65.50);
        assert_eq!(summary.expense_count, 3);

        assert_eq!(summary.categories.len(), 2);
        assert_eq!(summary.categories[0].category, "Food");
        assert_eq!(summary.categories[0].total, 55.50);
        assert_eq!(summary.categories[0].count, 2);
        assert_eq!(summary.categories[1].category, "Transport");
        assert_eq!(summary.categories[1].total, 10.00);
        assert_eq!(summary.categories[1].count, 1);

        assert_eq!(summary.monthly_trend.len(), 2);
        assert_eq!(summary.monthly_trend[0].month, "2024-01");
        assert_eq!(summary.monthly_trend[0].amount, 25.50);
        assert_eq!(summary.monthly_trend[1].month, "2024-02");
        assert_eq!(summary.monthly_trend[1].amount, 40.00);
    }

    #[test]
    fn category_order_follows_first_appearance() {
        let records = vec![
            expense(1.0, "Zoo", "2024-01-01"),
            expense(1.0, "Apples", "2024-01-02"),
            expense(1.0, "Zoo", "2024-01-03"),
        ];

        let summary = aggregate(&records);
        let labels: Vec<&str> = summary
            .categories
            .iter()
            .map(|entry| entry.category.as_str())
            .collect();
        assert_eq!(labels, ["Zoo", "Apples"]);
    }

    #[test]
    fn category_labels_are_case_sensitive() {
        let records = vec![
            expense(5.0, "Food", "2024-01-01"),
            expense(7.0, "food", "2024-01-02"),
        ];

        let summary = aggregate(&records);
        assert_eq!(summary.categories.len(), 2);
        assert_eq!(summary.categories[0].category, "Food");
        assert_eq!(summary.categories[1].category, "food");
    }

    #[test]
    fn trend_is_ascending_even_for_unsorted_input() {
        let records = vec![
            expense(3.0, "Misc", "2024-12-01"),
            expense(2.0, "Misc", "2023-02-01"),
            expense(1.0, "Misc", "2024-01-31"),
        ];

        let summary = aggregate(&records);
        let months: Vec<&str> = summary
            .monthly_trend
            .iter()
            .map(|entry| entry.month.as_str())
            .collect();
        assert_eq!(months, ["2023-02", "2024-01", "2024-12"]);
    }

    #[test]
    fn aggregation_is_deterministic_for_identical_input() {
        let records = vec![
            expense(25.50, "Food", "2024-01-15"),
            expense(10.00, "Transport", "2024-02-10"),
        ];
        assert_eq!(aggregate(&records), aggregate(&records));
    }

    #[test]
    fn serializes_with_expected_field_names() {
        let summary = aggregate(&[expense(25.50, "Food", "2024-01-15")]);
        let json = serde_json::to_value(&summary).expect("summary serializes");
        assert_eq!(json["total_expenses"], 25.50);
        assert_eq!(json["expense_count"], 1);
        assert_eq!(json["categories"][0]["category"], "Food");
        assert_eq!(json["categories"][0]["total"], 25.50);
        assert_eq!(json["categories"][0]["count"], 1);
        assert_eq!(json["monthly_trend"][0]["month"], "2024-01");
        assert_eq!(json["monthly_trend"][0]["amount"], 25.50);
    }
}

//! Expense record model and query filters.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

/// Validation errors returned by expense constructors.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseValidationError {
    EmptyId,
    InvalidId,
    EmptyCategory,
    NonFiniteAmount,
    NegativeAmount { amount: f64 },
    InvertedDateRange { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "expense id must not be empty"),
            Self::InvalidId => write!(f, "expense id must be a valid UUID"),
            Self::EmptyCategory => write!(f, "category must not be empty"),
            Self::NonFiniteAmount => write!(f, "amount must be a finite number"),
            Self::NegativeAmount { amount } => {
                write!(f, "amount must not be negative (got {amount})")
            }
            Self::InvertedDateRange { start, end } => {
                write!(f, "start date {start} is after end date {end}")
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

/// Stable expense identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExpenseId(Uuid);

impl ExpenseId {
    /// Validate and construct an [`ExpenseId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ExpenseValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(ExpenseValidationError::EmptyId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| ExpenseValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`ExpenseId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct from an already-parsed UUID (persistence rows).
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ExpenseId> for String {
    fn from(value: ExpenseId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for ExpenseId {
    type Error = ExpenseValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Expense category label.
///
/// Categories are compared by exact, case-sensitive string equality with no
/// normalization; "Food" and "food" are distinct groups by design.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Validate and construct a [`Category`]. The label is stored verbatim.
    pub fn new(label: impl Into<String>) -> Result<Self, ExpenseValidationError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyCategory);
        }
        Ok(Self(label))
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

impl TryFrom<String> for Category {
    type Error = ExpenseValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated mutable fields of an expense, used for creation and replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    amount: f64,
    category: Category,
    description: String,
    date: NaiveDate,
}

impl ExpenseDraft {
    /// Validate and construct a draft.
    pub fn new(
        amount: f64,
        category: Category,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Self, ExpenseValidationError> {
        if !amount.is_finite() {
            return Err(ExpenseValidationError::NonFiniteAmount);
        }
        if amount < 0.0 {
            return Err(ExpenseValidationError::NegativeAmount { amount });
        }
        Ok(Self {
            amount,
            category,
            description: description.into(),
            date,
        })
    }

    /// Spent amount.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Category label.
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Free-form description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Calendar date the expense occurred.
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

/// A single expense record owned by exactly one identity.
///
/// Immutable except for full-record replacement by its owner; replacement
/// keeps the id, owner, and creation timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    id: ExpenseId,
    owner: UserId,
    amount: f64,
    category: Category,
    description: String,
    date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense from a validated draft.
    #[must_use]
    pub fn create(owner: UserId, draft: ExpenseDraft) -> Self {
        Self::from_parts(ExpenseId::random(), owner, draft, Utc::now())
    }

    /// Rebuild an expense from persisted components.
    #[must_use]
    pub fn from_parts(
        id: ExpenseId,
        owner: UserId,
        draft: ExpenseDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        let ExpenseDraft {
            amount,
            category,
            description,
            date,
        } = draft;
        Self {
            id,
            owner,
            amount,
            category,
            description,
            date,
            created_at,
        }
    }

    /// Produce the replacement record for a full-record update.
    #[must_use]
    pub fn replaced_with(&self, draft: ExpenseDraft) -> Self {
        Self::from_parts(self.id.clone(), self.owner.clone(), draft, self.created_at)
    }

    /// Stable expense identifier.
    pub fn id(&self) -> &ExpenseId {
        &self.id
    }

    /// Owning identity.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Spent amount.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Category label.
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Free-form description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Calendar date the expense occurred.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Record creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Optional inclusive date bounds applied when retrieving expenses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateRange {
    /// Construct a range, rejecting inverted bounds.
    pub fn new(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, ExpenseValidationError> {
        if let (Some(start_date), Some(end_date)) = (start, end) {
            if start_date > end_date {
                return Err(ExpenseValidationError::InvertedDateRange {
                    start: start_date,
                    end: end_date,
                });
            }
        }
        Ok(Self { start, end })
    }

    /// Range with no bounds; matches every record.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Inclusive lower bound, if any.
    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    /// Inclusive upper bound, if any.
    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// Whether `date` falls inside the range. Both bounds are inclusive.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start)
            && self.end.is_none_or(|end| date <= end)
    }
}

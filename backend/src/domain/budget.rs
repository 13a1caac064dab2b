//! Monthly category budget model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::expense::Category;
use crate::domain::UserId;

/// Validation errors returned by budget constructors.
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetValidationError {
    NonFiniteLimit,
    NegativeLimit { limit: f64 },
    MonthOutOfRange { month: u32 },
    YearOutOfRange { year: i32 },
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteLimit => write!(f, "monthly limit must be a finite number"),
            Self::NegativeLimit { limit } => {
                write!(f, "monthly limit must not be negative (got {limit})")
            }
            Self::MonthOutOfRange { month } => {
                write!(f, "month must be between 1 and 12 (got {month})")
            }
            Self::YearOutOfRange { year } => {
                write!(f, "year must be between 1970 and 9999 (got {year})")
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}

/// Stable budget identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BudgetId(Uuid);

impl BudgetId {
    /// Generate a new random [`BudgetId`].
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

impl fmt::Display for BudgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<BudgetId> for String {
    fn from(value: BudgetId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for BudgetId {
    type Error = uuid::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Uuid::parse_str(&value).map(Self)
    }
}

/// Validated spending target for one category in one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetDraft {
    category: Category,
    monthly_limit: f64,
    month: u32,
    year: i32,
}

impl BudgetDraft {
    /// Validate and construct a draft.
    pub fn new(
        category: Category,
        monthly_limit: f64,
        month: u32,
        year: i32,
    ) -> Result<Self, BudgetValidationError> {
        if !monthly_limit.is_finite() {
            return Err(BudgetValidationError::NonFiniteLimit);
        }
        if monthly_limit < 0.0 {
            return Err(BudgetValidationError::NegativeLimit {
                limit: monthly_limit,
            });
        }
        if !(1..=12).contains(&month) {
            return Err(BudgetValidationError::MonthOutOfRange { month });
        }
        if !(1970..=9999).contains(&year) {
            return Err(BudgetValidationError::YearOutOfRange { year });
        }
        Ok(Self {
            category,
            monthly_limit,
            month,
            year,
        })
    }

    /// Budgeted category.
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Spending ceiling for the month.
    pub fn monthly_limit(&self) -> f64 {
        self.monthly_limit
    }

    /// Calendar month, 1 through 12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }
}

/// A stored budget owned by exactly one identity.
///
/// At most one budget exists per `(owner, category, month, year)`; setting a
/// budget for an existing key replaces the stored limit.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    id: BudgetId,
    owner: UserId,
    category: Category,
    monthly_limit: f64,
    month: u32,
    year: i32,
    created_at: DateTime<Utc>,
}

impl Budget {
    /// Create a new budget from a validated draft.
    #[must_use]
    pub fn create(owner: UserId, draft: BudgetDraft) -> Self {
        Self::from_parts(BudgetId::random(), owner, draft, Utc::now())
    }

    /// Rebuild a budget from persisted components.
    #[must_use]
    pub fn from_parts(
        id: BudgetId,
        owner: UserId,
        draft: BudgetDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        let BudgetDraft {
            category,
            monthly_limit,
            month,
            year,
        } = draft;
        Self {
            id,
            owner,
            category,
            monthly_limit,
            month,
            year,
            created_at,
        }
    }

    /// Replacement record applied when a budget key is set again; keeps the
    /// id and creation time of the row being replaced.
    #[must_use]
    pub fn replaced_with(&self, draft: BudgetDraft) -> Self {
        Self::from_parts(self.id.clone(), self.owner.clone(), draft, self.created_at)
    }

    /// Whether `draft` addresses the same `(category, month, year)` key.
    #[must_use]
    pub fn matches_key(&self, draft: &BudgetDraft) -> bool {
        self.category == draft.category && self.month == draft.month && self.year == draft.year
    }

    /// Stable budget identifier.
    pub fn id(&self) -> &BudgetId {
        &self.id
    }

    /// Owning identity.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Budgeted category.
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Spending ceiling for the month.
    pub fn monthly_limit(&self) -> f64 {
        self.monthly_limit
    }

    /// Calendar month, 1 through 12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Record creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

//! Driving port for analytics use-cases.
//!
//! Inbound adapters call this to compute a spending summary without knowing
//! how records are retrieved, which keeps handler tests deterministic: they
//! substitute a test double instead of wiring a store.

use async_trait::async_trait;

use crate::domain::analytics::AnalyticsSummary;
use crate::domain::expense::DateRange;
use crate::domain::{Error, UserId};

/// Domain use-case port for spending analytics.
#[async_trait]
pub trait AnalyticsQuery: Send + Sync {
    /// Compute the spending summary for `owner`'s records dated in `range`.
    async fn summarize(
        &self,
        owner: &UserId,
        range: &DateRange,
    ) -> Result<AnalyticsSummary, Error>;
}

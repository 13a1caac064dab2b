//! Spending analytics API handler.
//!
//! ```text
//! GET /api/analytics/summary?start_date=2024-01-01&end_date=2024-12-31
//! ```

use actix_web::{get, web};
use serde::Deserialize;

use crate::domain::{AnalyticsSummary, Error};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::expenses::parse_range;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Query string accepted by the summary endpoint.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct SummaryQuery {
    /// Inclusive lower date bound, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Inclusive upper date bound, `YYYY-MM-DD`.
    pub end_date: Option<String>,
}

/// Aggregate the acting user's spending into a summary.
#[utoipa::path(
    get,
    path = "/api/analytics/summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Spending summary", body = AnalyticsSummary),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Expense store unavailable", body = Error)
    ),
    tags = ["analytics"],
    operation_id = "analyticsSummary"
)]
#[get("/analytics/summary")]
pub async fn summary(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<SummaryQuery>,
) -> ApiResult<web::Json<AnalyticsSummary>> {
    let query = query.into_inner();
    let range = parse_range(query.start_date.as_deref(), query.end_date.as_deref())?;
    let summary = state.analytics.summarize(user.id(), &range).await?;
    Ok(web::Json(summary))
}

//! Expense CRUD API handlers.
//!
//! ```text
//! POST /api/expenses {"amount":25.5,"category":"Food","description":"lunch","date":"2024-01-15"}
//! GET /api/expenses?category=Food&start_date=2024-01-01&end_date=2024-12-31
//! GET /api/expenses/{id}
//! PUT /api/expenses/{id}
//! DELETE /api/expenses/{id}
//! ```

use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::{ExpenseFilter, ExpensePersistenceError};
use crate::domain::{
    Category, DateRange, Error, Expense, ExpenseDraft, ExpenseId, ExpenseValidationError,
};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Maximum number of records returned by one list request.
pub const LIST_CAP: i64 = 1_000;

/// Expense create/replace request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ExpenseRequest {
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Calendar date in `YYYY-MM-DD` form.
    pub date: String,
}

/// Public view of an expense record.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExpenseResponse {
    pub id: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: String,
    pub created_at: String,
}

impl From<&Expense> for ExpenseResponse {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id().to_string(),
            amount: expense.amount(),
            category: expense.category().to_string(),
            description: expense.description().to_owned(),
            date: expense.date().to_string(),
            created_at: expense.created_at().to_rfc3339(),
        }
    }
}

/// Query string accepted by the list endpoint.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    /// Exact-match category filter.
    pub category: Option<String>,
    /// Inclusive lower date bound, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Inclusive upper date bound, `YYYY-MM-DD`.
    pub end_date: Option<String>,
}

pub(super) fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, Error> {
    raw.parse().map_err(|_| {
        Error::invalid_request(format!("{field} must be a date in YYYY-MM-DD format"))
            .with_details(json!({ "field": field }))
    })
}

pub(super) fn parse_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<DateRange, Error> {
    let start = start.map(|raw| parse_date("start_date", raw)).transpose()?;
    let end = end.map(|raw| parse_date("end_date", raw)).transpose()?;
    DateRange::new(start, end).map_err(map_validation_error)
}

fn map_validation_error(err: ExpenseValidationError) -> Error {
    let field = match err {
        ExpenseValidationError::EmptyId | ExpenseValidationError::InvalidId => "id",
        ExpenseValidationError::EmptyCategory => "category",
        ExpenseValidationError::NonFiniteAmount
        | ExpenseValidationError::NegativeAmount { .. } => "amount",
        ExpenseValidationError::InvertedDateRange { .. } => "start_date",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn store_unavailable(error: ExpensePersistenceError) -> Error {
    tracing::error!(%error, "expense store operation failed");
    Error::service_unavailable("expense store unavailable")
}

fn draft_from(body: ExpenseRequest) -> Result<ExpenseDraft, Error> {
    let category = Category::new(body.category).map_err(map_validation_error)?;
    let date = parse_date("date", &body.date)?;
    ExpenseDraft::new(body.amount, category, body.description, date).map_err(map_validation_error)
}

fn expense_id(raw: &str) -> Result<ExpenseId, Error> {
    ExpenseId::new(raw).map_err(map_validation_error)
}

fn expense_not_found() -> Error {
    Error::not_found("expense not found")
}

/// Record a new expense for the acting user.
#[utoipa::path(
    post,
    path = "/api/expenses",
    request_body = ExpenseRequest,
    responses(
        (status = 201, description = "Expense recorded", body = ExpenseResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Expense store unavailable", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "createExpense"
)]
#[post("/expenses")]
pub async fn create_expense(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<ExpenseRequest>,
) -> ApiResult<HttpResponse> {
    let draft = draft_from(payload.into_inner())?;
    let expense = Expense::create(user.into_id(), draft);
    state
        .expenses
        .insert(&expense)
        .await
        .map_err(store_unavailable)?;
    Ok(HttpResponse::Created().json(ExpenseResponse::from(&expense)))
}

/// List the acting user's expenses, newest date first.
#[utoipa::path(
    get,
    path = "/api/expenses",
    params(ListQuery),
    responses(
        (status = 200, description = "Expenses", body = [ExpenseResponse]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Expense store unavailable", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "listExpenses"
)]
#[get("/expenses")]
pub async fn list_expenses(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Vec<ExpenseResponse>>> {
    let query = query.into_inner();
    let category = query
        .category
        .map(Category::new)
        .transpose()
        .map_err(map_validation_error)?;
    let range = parse_range(query.start_date.as_deref(), query.end_date.as_deref())?;
    let filter = ExpenseFilter { category, range };

    let expenses = state
        .expenses
        .list(user.id(), &filter, LIST_CAP)
        .await
        .map_err(store_unavailable)?;
    Ok(web::Json(
        expenses.iter().map(ExpenseResponse::from).collect(),
    ))
}

/// Fetch a single expense by id.
#[utoipa::path(
    get,
    path = "/api/expenses/{id}",
    params(("id" = String, Path, description = "Expense identifier")),
    responses(
        (status = 200, description = "Expense", body = ExpenseResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "getExpense"
)]
#[get("/expenses/{id}")]
pub async fn get_expense(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ExpenseResponse>> {
    let id = expense_id(&path)?;
    let expense = state
        .expenses
        .find_by_id(user.id(), &id)
        .await
        .map_err(store_unavailable)?
        .ok_or_else(expense_not_found)?;
    Ok(web::Json(ExpenseResponse::from(&expense)))
}

/// Replace an expense's mutable fields.
#[utoipa::path(
    put,
    path = "/api/expenses/{id}",
    params(("id" = String, Path, description = "Expense identifier")),
    request_body = ExpenseRequest,
    responses(
        (status = 200, description = "Expense updated", body = ExpenseResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 503, description = "Expense store unavailable", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "updateExpense"
)]
#[put("/expenses/{id}")]
pub async fn update_expense(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ExpenseRequest>,
) -> ApiResult<web::Json<ExpenseResponse>> {
    let id = expense_id(&path)?;
    let draft = draft_from(payload.into_inner())?;
    let updated = state
        .expenses
        .replace(user.id(), &id, draft)
        .await
        .map_err(store_unavailable)?
        .ok_or_else(expense_not_found)?;
    Ok(web::Json(ExpenseResponse::from(&updated)))
}

/// Delete an expense.
#[utoipa::path(
    delete,
    path = "/api/expenses/{id}",
    params(("id" = String, Path, description = "Expense identifier")),
    responses(
        (status = 200, description = "Expense deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 503, description = "Expense store unavailable", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "deleteExpense"
)]
#[delete("/expenses/{id}")]
pub async fn delete_expense(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = expense_id(&path)?;
    let removed = state
        .expenses
        .delete(user.id(), &id)
        .await
        .map_err(store_unavailable)?;
    if !removed {
        return Err(expense_not_found());
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "expense deleted" })))
}

//! Defines the endpoint for listing a user's budgets.

use axum::{
    Extension,
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    Error,
    database_id::CategoryId,
    pagination::{PaginationParams, page_count},
    response::data_response,
    user::UserId,
};

use super::{
    BudgetState,
    core::{count_budgets, list_budgets},
};

/// Query parameters for the budget list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetListParams {
    /// The 1-based page number to fetch.
    pub page: Option<u64>,
    /// The number of rows per page.
    pub limit: Option<u64>,
    /// A substring to match against budget names.
    pub keyword: Option<String>,
    /// Only return budgets covering this category.
    pub category_id: Option<CategoryId>,
}

impl BudgetListParams {
    fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// A route handler for listing a user's budgets, optionally filtered by a
/// name keyword and a category.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn list_budgets_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserId>,
    Query(params): Query<BudgetListParams>,
) -> Result<Response, Error> {
    let pagination = params.pagination();
    let keyword = params
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty());

    let connection = state.db_connection.lock().unwrap();

    let budgets = list_budgets(
        user_id,
        keyword,
        params.category_id,
        pagination.limit(),
        pagination.offset(),
        &connection,
    )?;
    let total_count = count_budgets(user_id, keyword, params.category_id, &connection)?;

    Ok(data_response(
        StatusCode::OK,
        "Budgets retrieved successfully",
        json!({
            "budgets": budgets,
            "total_count": total_count,
            "total_pages": page_count(total_count, pagination.limit()),
            "current_page": pagination.page(),
        }),
    ))
}

//! The route handlers for creating, listing, updating and deleting
//! categories.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;

use crate::{
    Error,
    database_id::CategoryId,
    response::{data_response, message_response},
    transaction::{TransactionType, count_transactions_for_category},
    user::UserId,
};

use super::{
    CategoryState,
    core::{
        category_name_exists, create_category, delete_category, get_category, list_categories,
        update_category,
    },
    form::CategoryForm,
};

/// A route handler for creating a new category.
///
/// Category names are unique per user within each type, so 'Other' can exist
/// as both an income and an expense category.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserId>,
    Json(form): Json<CategoryForm>,
) -> Result<Response, Error> {
    let new_category = form.validate()?;

    let connection = state.db_connection.lock().unwrap();
    let tx = connection.unchecked_transaction()?;

    if category_name_exists(
        &new_category.name,
        new_category.category_type,
        None,
        user_id,
        &tx,
    )? {
        return Err(Error::DuplicateCategoryName(new_category.name));
    }

    let category = create_category(&new_category, user_id, &tx)?;
    tx.commit()?;

    Ok(data_response(
        StatusCode::CREATED,
        "Category created successfully",
        category,
    ))
}

/// Query parameters for the category list endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CategoryListParams {
    /// Only return categories of this type.
    #[serde(rename = "type")]
    pub category_type: Option<TransactionType>,
}

/// A route handler for listing a user's categories, ordered by name.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn list_categories_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserId>,
    Query(params): Query<CategoryListParams>,
) -> Result<Response, Error> {
    let connection = state.db_connection.lock().unwrap();
    let categories = list_categories(user_id, params.category_type, &connection)?;

    Ok(data_response(
        StatusCode::OK,
        "Categories retrieved successfully",
        categories,
    ))
}

/// A route handler for updating a category.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn update_category_endpoint(
    State(state): State<CategoryState>,
    Path(category_id): Path<CategoryId>,
    Extension(user_id): Extension<UserId>,
    Json(form): Json<CategoryForm>,
) -> Result<Response, Error> {
    let new_category = form.validate()?;

    let connection = state.db_connection.lock().unwrap();
    let tx = connection.unchecked_transaction()?;

    if category_name_exists(
        &new_category.name,
        new_category.category_type,
        Some(category_id),
        user_id,
        &tx,
    )? {
        return Err(Error::DuplicateCategoryName(new_category.name));
    }

    update_category(category_id, user_id, &new_category, &tx)?;
    let category = get_category(category_id, user_id, &tx)?;
    tx.commit()?;

    Ok(data_response(
        StatusCode::OK,
        "Category updated successfully",
        category,
    ))
}

/// A route handler for deleting a category.
///
/// A category that is still referenced by transactions cannot be deleted.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn delete_category_endpoint(
    State(state): State<CategoryState>,
    Path(category_id): Path<CategoryId>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = state.db_connection.lock().unwrap();
    let tx = connection.unchecked_transaction()?;

    get_category(category_id, user_id, &tx)?;
    if count_transactions_for_category(category_id, user_id, &tx)? > 0 {
        return Err(Error::CategoryInUse);
    }

    delete_category(category_id, user_id, &tx)?;
    tx.commit()?;

    Ok(message_response(
        StatusCode::OK,
        "Category deleted successfully",
    ))
}

//! The route handlers for reading and updating a user's settings.

use axum::{Extension, Json, extract::State, http::StatusCode, response::Response};
use serde::Deserialize;

use crate::{
    Error,
    response::{FieldError, data_response},
    user::UserId,
};

use super::{
    SettingsState,
    core::{get_or_create_settings, update_settings},
};

/// The longest currency string a client may save.
const MAX_CURRENCY_LENGTH: usize = 32;

/// A route handler for fetching a user's settings. Users who have never
/// saved settings get the defaults.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn get_settings_endpoint(
    State(state): State<SettingsState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = state.db_connection.lock().unwrap();
    let settings = get_or_create_settings(user_id, &connection)?;

    Ok(data_response(
        StatusCode::OK,
        "Settings retrieved successfully",
        settings,
    ))
}

/// The request body for updating a user's settings.
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    /// The currency code amounts are displayed in.
    pub currency: String,
}

/// A route handler for updating a user's settings.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn update_settings_endpoint(
    State(state): State<SettingsState>,
    Extension(user_id): Extension<UserId>,
    Json(form): Json<SettingsForm>,
) -> Result<Response, Error> {
    let currency = form.currency.trim();
    if currency.is_empty() || currency.len() > MAX_CURRENCY_LENGTH {
        return Err(Error::Validation(vec![FieldError::new(
            "currency",
            "Please enter a valid currency",
        )]));
    }

    let connection = state.db_connection.lock().unwrap();
    let settings = update_settings(user_id, currency, &connection)?;

    Ok(data_response(
        StatusCode::OK,
        "Settings updated successfully",
        settings,
    ))
}

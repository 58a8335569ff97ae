//! Defines the endpoint for registering a new user.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::Response,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    response::{FieldError, data_response},
    user::create_user,
};

/// The state needed to register a user.
#[derive(Debug, Clone)]
pub struct RegisterUserState {
    /// The database connection for creating users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegisterUserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for registering a user.
#[derive(Debug, Deserialize)]
pub struct RegisterUserForm {
    /// The email address to register.
    pub email: String,
}

/// A route handler for registering a new user by email address.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn register_user_endpoint(
    State(state): State<RegisterUserState>,
    Json(form): Json<RegisterUserForm>,
) -> Result<Response, Error> {
    let email = form.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::Validation(vec![FieldError::new(
            "email",
            "Please enter a valid email address",
        )]));
    }

    let connection = state.db_connection.lock().unwrap();
    let user = create_user(email, &connection)?;

    Ok(data_response(
        StatusCode::OK,
        "User registered successfully",
        user,
    ))
}

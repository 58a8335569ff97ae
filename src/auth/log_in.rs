//! Defines the endpoint that issues a session cookie for a registered user.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::cookie::set_auth_cookie,
    response::{FieldError, message_response},
    user::get_user_by_email,
};

/// The state needed to log in a user.
#[derive(Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which session cookies are valid.
    pub cookie_duration: Duration,
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The request body for logging in.
#[derive(Debug, Deserialize)]
pub struct LogInForm {
    /// The email address of the user to log in as.
    pub email: String,
}

/// A route handler that issues a session cookie for the user with the given
/// email address.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn log_in_endpoint(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Json(form): Json<LogInForm>,
) -> Result<Response, Error> {
    if form.email.trim().is_empty() {
        return Err(Error::Validation(vec![FieldError::new(
            "email",
            "Please enter an email address",
        )]));
    }

    let user = {
        let connection = state.db_connection.lock().unwrap();
        get_user_by_email(&form.email, &connection)?
    };

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration);

    Ok((jar, message_response(StatusCode::OK, "Logged in successfully")).into_response())
}

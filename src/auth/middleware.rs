//! Middleware that validates the session cookie and scopes requests to a user.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use time::Duration;

use crate::{
    AppState,
    auth::cookie::{get_user_id_from_cookies, set_auth_cookie},
    response::error_response,
};

/// The state needed for the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which session cookies are valid.
    pub cookie_duration: Duration,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that checks for a valid session cookie.
///
/// The user ID is placed into the request and then the request is executed
/// normally if the cookie is valid, otherwise a 401 JSON error is returned.
/// Valid cookies are re-issued on each request so active sessions do not
/// expire.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(user_id): Extension<UserId>` to receive the user ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}.");
            return error_response(StatusCode::UNAUTHORIZED, "Unauthorized", None);
        }
    };

    let user_id = match get_user_id_from_cookies(&jar) {
        Some(user_id) => user_id,
        None => return error_response(StatusCode::UNAUTHORIZED, "Unauthorized", None),
    };

    let jar = set_auth_cookie(jar, user_id, state.cookie_duration);

    parts.extensions.insert(user_id);
    let request = Request::from_parts(parts, body);

    (jar, next.run(request).await).into_response()
}

//! A minimal identity shim that scopes every request to a user.
//!
//! Authentication proper (passwords, email verification) is not part of this
//! service. Sessions are an encrypted private cookie holding the user's ID:
//! [log_in_endpoint] mints the cookie, [auth_guard] validates it and makes
//! the [crate::UserId] available to handlers as a request extension.

mod cookie;
mod log_in;
mod middleware;
mod register;

pub use cookie::{COOKIE_USER_ID, DEFAULT_COOKIE_DURATION, set_auth_cookie};
pub use log_in::log_in_endpoint;
pub use middleware::{AuthState, auth_guard};
pub use register::register_user_endpoint;

//! Creating and reading the session cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::user::UserId;

/// The name of the cookie holding the session user ID.
pub const COOKIE_USER_ID: &str = "user_id";

/// How long a session cookie stays valid after being issued.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::days(7);

/// Add a session cookie for `user_id` to the cookie jar.
///
/// The cookie is encrypted and signed by the private jar, so its contents
/// cannot be read or forged by the client.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserId,
    duration: Duration,
) -> PrivateCookieJar {
    let mut cookie = Cookie::new(COOKIE_USER_ID, user_id.as_i64().to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_expires(OffsetDateTime::now_utc() + duration);

    jar.add(cookie)
}

/// Read the session user ID from the cookie jar.
///
/// Returns `None` if the cookie is missing or does not hold a valid ID.
pub fn get_user_id_from_cookies(jar: &PrivateCookieJar) -> Option<UserId> {
    jar.get(COOKIE_USER_ID)?
        .value()
        .parse()
        .ok()
        .map(UserId::new)
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};

    use crate::user::UserId;

    use super::{DEFAULT_COOKIE_DURATION, get_user_id_from_cookies, set_auth_cookie};

    #[test]
    fn round_trips_user_id() {
        let jar = PrivateCookieJar::new(Key::generate());

        let jar = set_auth_cookie(jar, UserId::new(42), DEFAULT_COOKIE_DURATION);

        assert_eq!(get_user_id_from_cookies(&jar), Some(UserId::new(42)));
    }

    #[test]
    fn returns_none_without_cookie() {
        let jar = PrivateCookieJar::new(Key::generate());

        assert_eq!(get_user_id_from_cookies(&jar), None);
    }
}

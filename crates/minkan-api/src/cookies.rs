//! Session, CSRF, and login-state cookies.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::OffsetDateTime;

/// HttpOnly cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_id";
/// Script-readable cookie carrying the CSRF token.
pub const CSRF_COOKIE: &str = "csrf_token";
/// HttpOnly cookie binding an authorization `state` to the browser.
pub const STATE_COOKIE: &str = "oidc_state";

/// Value of a cookie, treating an empty value as absent.
pub fn value<'a>(jar: &'a CookieJar, name: &str) -> Option<&'a str> {
    jar.get(name).map(|c| c.value()).filter(|v| !v.is_empty())
}

fn to_time(d: chrono::Duration) -> time::Duration {
    time::Duration::seconds(d.num_seconds())
}

pub fn session_cookie(token: String, max_age: chrono::Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(to_time(max_age))
        .build()
}

pub fn csrf_cookie(token: String, max_age: chrono::Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((CSRF_COOKIE, token))
        .path("/")
        .http_only(false)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(to_time(max_age))
        .build()
}

pub fn state_cookie(state: String, max_age: chrono::Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((STATE_COOKIE, state))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(to_time(max_age))
        .build()
}

/// Empty value, zero max-age, expiry in the past: the browser drops it now.
fn expired(name: &'static str, http_only: bool, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(http_only)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// Add both session cookies to the jar.
pub fn with_session(
    jar: CookieJar,
    session_token: String,
    csrf_token: String,
    max_age: chrono::Duration,
    secure: bool,
) -> CookieJar {
    jar.add(session_cookie(session_token, max_age, secure))
        .add(csrf_cookie(csrf_token, max_age, secure))
}

/// Expire both session cookies.
pub fn without_session(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(expired(SESSION_COOKIE, true, secure))
        .add(expired(CSRF_COOKIE, false, secure))
}

pub fn without_state(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(expired(STATE_COOKIE, true, secure))
}

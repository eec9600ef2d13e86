//! The `auth_token` session cookie.

use axum::http::{header, HeaderMap, HeaderValue};
use axum::http::header::InvalidHeaderValue;

use super::token::TOKEN_TTL_SECS;

pub const AUTH_COOKIE: &str = "auth_token";
pub const COOKIE_MAX_AGE_SECS: i64 = TOKEN_TTL_SECS;

const CLEAR_COOKIE: &str = "auth_token=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax";

/// `Set-Cookie` value carrying `token`: HttpOnly, whole-site path, SameSite=Lax.
pub fn encode(token: &str) -> String {
    format!("{AUTH_COOKIE}={token}; HttpOnly; Path=/; Max-Age={COOKIE_MAX_AGE_SECS}; SameSite=Lax")
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn clear() -> String {
    CLEAR_COOKIE.to_string()
}

/// Pull the session token out of a raw `Cookie` header. Anything unparsable is treated as absent.
pub fn decode(cookie_header: Option<&str>) -> Option<String> {
    let raw = cookie_header?;
    for part in raw.split(';') {
        let Some((name, value)) = part.trim().split_once('=') else { continue };
        if name.trim() != AUTH_COOKIE {
            continue;
        }
        let value = value.trim();
        return if value.is_empty() { None } else { Some(value.to_string()) };
    }
    None
}

/// Token from the first `Cookie` header that carries one. Non-ASCII header values are skipped.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|s| decode(Some(s)))
}

pub fn set_cookie_value(token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&encode(token))
}

pub fn clear_cookie_value() -> HeaderValue {
    HeaderValue::from_static(CLEAR_COOKIE)
}

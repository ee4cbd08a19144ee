use axum::http::{header, HeaderMap, HeaderValue};
use cookie::{time::Duration, Cookie, SameSite};

pub const SESSION_COOKIE: &str = "session_token";
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

const OAUTH_STATE_MAX_AGE_MINUTES: i64 = 10;

/// Read a cookie value from the request headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| Cookie::parse(pair.trim()).ok())
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

/// Session token from the session cookie, or from a bearer Authorization header.
pub fn read_session_token(headers: &HeaderMap) -> Option<String> {
    read_cookie(headers, SESSION_COOKIE).or_else(|| {
        headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")
            .map(|token| token.trim().to_string())
    })
}

pub fn session_cookie(token: &str, max_age_days: i64, secure: bool) -> Option<HeaderValue> {
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::days(max_age_days))
        .build();

    HeaderValue::from_str(&cookie.to_string()).ok()
}

/// Holds the OAuth `state` and the post-login destination as `state|callback`.
pub fn oauth_state_cookie(state: &str, callback_url: &str, secure: bool) -> Option<HeaderValue> {
    let value = format!("{}|{}", state, urlencoding::encode(callback_url));
    let cookie = Cookie::build((OAUTH_STATE_COOKIE, value))
        .path("/api/auth")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::minutes(OAUTH_STATE_MAX_AGE_MINUTES))
        .build();

    HeaderValue::from_str(&cookie.to_string()).ok()
}

/// Split an OAuth state cookie into `(state, callback_url)`.
pub fn parse_oauth_state(value: &str) -> Option<(String, String)> {
    let (state, callback) = value.split_once('|')?;
    let callback = urlencoding::decode(callback).ok()?.into_owned();
    Some((state.to_string(), callback))
}

pub fn expired_cookie(name: &'static str, path: &'static str) -> Option<HeaderValue> {
    let cookie = Cookie::build((name, ""))
        .path(path)
        .http_only(true)
        .max_age(Duration::ZERO)
        .build();

    HeaderValue::from_str(&cookie.to_string()).ok()
}

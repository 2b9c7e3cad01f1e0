// Session cookie construction and extraction.
//
// The token rides an http-only cookie so browser script can never read
// it. Non-browser clients and tests may send an Authorization: Bearer
// header instead; the cookie wins when both are present.

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use cookie::time::Duration;
use cookie::{Cookie, SameSite};

use crate::config;

/// Build the session cookie carrying a freshly signed token.
pub fn session_cookie(token: &str) -> Cookie<'static> {
    let security = &config::config().security;
    build(token.to_string(), Duration::days(security.session_days as i64))
}

/// Build an expired session cookie. Setting it overwrites and clears the
/// browser's copy; the token itself stays valid until its exp.
pub fn clear_session_cookie() -> Cookie<'static> {
    build(String::new(), Duration::ZERO)
}

fn build(value: String, max_age: Duration) -> Cookie<'static> {
    let security = &config::config().security;
    let builder = Cookie::build((security.session_cookie.clone(), value))
        .http_only(true)
        .path("/")
        .max_age(max_age);

    let builder = if security.cookie_secure {
        builder.secure(true).same_site(SameSite::None)
    } else {
        builder.same_site(SameSite::Lax)
    };

    builder.build()
}

/// Pull the session token out of a request.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    token_from_cookies(headers).or_else(|| token_from_bearer(headers))
}

fn token_from_cookies(headers: &HeaderMap) -> Option<String> {
    let name = &config::config().security.session_cookie;
    let raw = headers.get(COOKIE)?.to_str().ok()?;

    Cookie::split_parse(raw)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

fn token_from_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn session_cookie_is_http_only_and_scoped_to_root() {
        let cookie = session_cookie("token-value");
        assert_eq!(cookie.name(), "ss_session");
        assert_eq!(cookie.value(), "token-value");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert!(cookie.max_age().unwrap().whole_days() >= 1);
    }

    #[test]
    fn clearing_cookie_expires_immediately() {
        let cookie = clear_session_cookie();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }

    #[test]
    fn token_is_found_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; ss_session=abc123; lang=pt"),
        );

        assert_eq!(extract_session_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn bearer_header_is_a_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer xyz789"));

        assert_eq!(extract_session_token(&headers).as_deref(), Some("xyz789"));
    }

    #[test]
    fn cookie_takes_precedence_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("ss_session=from-cookie"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));

        assert_eq!(extract_session_token(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn missing_token_yields_none() {
        let headers = HeaderMap::new();
        assert_eq!(extract_session_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert_eq!(extract_session_token(&headers), None);
    }
}

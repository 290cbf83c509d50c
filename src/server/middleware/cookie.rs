//! Session cookie parsing and `Set-Cookie` values.

use axum::http::{header::COOKIE, HeaderMap};

use crate::server::model::session::{SESSION_COOKIE, TOKEN_LIFETIME_SECS};

/// Returns the value of cookie `name`, searching every `Cookie` header.
pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for part in value.split(';') {
            if let Some((key, val)) = part.trim().split_once('=') {
                if key == name {
                    return Some(val.to_string());
                }
            }
        }
    }
    None
}

/// `Set-Cookie` value carrying a fresh session token.
///
/// `Secure` is only added when the deployment serves HTTPS; browsers drop secure
/// cookies received over plain HTTP.
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly",
        SESSION_COOKIE, token, TOKEN_LIFETIME_SECS
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!("{}=; Path=/; Max-Age=0; HttpOnly", SESSION_COOKIE);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

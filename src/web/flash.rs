//! One-shot flash messages carried in a signed cookie.
//!
//! A message pushed while handling one request is shown by the next page
//! render and then removed. The cookie holds a JSON list of messages,
//! percent-encoded so it survives as a cookie value.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};

/// Queue a message for the next page render.
///
/// Messages already waiting in the jar are kept ahead of the new one.
pub fn push(
    jar: SignedCookieJar,
    cookie_name: &str,
    message: impl Into<String>,
) -> SignedCookieJar {
    let mut messages = jar
        .get(cookie_name)
        .map(|c| decode(c.value()))
        .unwrap_or_default();
    messages.push(message.into());

    let cookie = Cookie::build((cookie_name.to_owned(), encode(&messages)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    jar.add(cookie)
}

/// Take all pending messages, clearing the cookie.
///
/// A missing cookie, or one whose signature doesn't verify, yields no messages.
pub fn take(jar: SignedCookieJar, cookie_name: &str) -> (SignedCookieJar, Vec<String>) {
    match jar.get(cookie_name) {
        Some(cookie) => {
            let messages = decode(cookie.value());
            let jar = jar.remove(Cookie::build((cookie_name.to_owned(), "")).path("/"));
            (jar, messages)
        }
        None => (jar, Vec::new()),
    }
}

fn encode(messages: &[String]) -> String {
    let json = serde_json::to_string(messages).unwrap_or_else(|_| "[]".to_string());
    urlencoding::encode(&json).into_owned()
}

fn decode(value: &str) -> Vec<String> {
    urlencoding::decode(value)
        .ok()
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

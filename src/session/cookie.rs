//! `sid` cookie parsing and serialization.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use std::collections::HashMap;

use super::token;

pub const SESSION_COOKIE_NAME: &str = "sid";

/// Split a `Cookie` header into name/value pairs. The first occurrence of a name wins.
pub fn parse_cookie_header(value: &str) -> HashMap<&str, &str> {
    let mut cookies = HashMap::new();
    for pair in value.split(';') {
        let Some((name, value)) = pair.trim().split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|inner| inner.strip_suffix('"'))
            .unwrap_or(value);
        cookies.entry(name).or_insert(value);
    }
    cookies
}

/// Extract the session identifier presented by the client, if any.
///
/// Values that could not have been issued by this server are ignored, which
/// makes the request look like it carried no session at all.
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .find_map(|header| {
            parse_cookie_header(header)
                .get(SESSION_COOKIE_NAME)
                .map(|value| (*value).to_string())
        })
        .filter(|value| token::is_well_formed(value))
}

/// Build the `Set-Cookie` value announcing a session identifier.
///
/// The bare `sid=<token>` form is used unless `secure` asks for the attributes
/// a deployment behind HTTPS should carry.
pub fn session_cookie(token: &str, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}={token}");
    if secure {
        cookie.push_str("; Path=/; HttpOnly; SameSite=Lax; Secure");
    }
    HeaderValue::from_str(&cookie)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_token() -> String {
        token::generate().unwrap()
    }

    #[test]
    fn parses_semicolon_separated_pairs() {
        let cookies = parse_cookie_header("theme=dark; sid=abc ;lang=en");
        assert_eq!(cookies.get("theme"), Some(&"dark"));
        assert_eq!(cookies.get("sid"), Some(&"abc"));
        assert_eq!(cookies.get("lang"), Some(&"en"));
    }

    #[test]
    fn skips_garbage_segments() {
        let cookies = parse_cookie_header("; novalue; =orphan; sid=\"quoted\"");
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies.get("sid"), Some(&"quoted"));
    }

    #[test]
    fn first_occurrence_wins() {
        let cookies = parse_cookie_header("sid=first; sid=second");
        assert_eq!(cookies.get("sid"), Some(&"first"));
    }

    #[test]
    fn session_id_reads_any_cookie_header() {
        let token = valid_token();
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_str(&format!("sid={token}")).unwrap());
        assert_eq!(session_id(&headers), Some(token));
    }

    #[test]
    fn session_id_ignores_missing_and_malformed_values() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_id(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("sid=attacker-chosen"));
        assert_eq!(session_id(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("sid="));
        assert_eq!(session_id(&headers), None);
    }

    #[test]
    fn serializes_bare_cookie_by_default() {
        let cookie = session_cookie("abc", false).unwrap();
        assert_eq!(cookie, "sid=abc");
    }

    #[test]
    fn serializes_hardened_cookie() {
        let cookie = session_cookie("abc", true).unwrap();
        assert_eq!(cookie, "sid=abc; Path=/; HttpOnly; SameSite=Lax; Secure");
    }
}

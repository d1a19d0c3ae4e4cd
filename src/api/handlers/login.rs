//! Login and logout form submissions.
//!
//! Both paths share one handler: what happens is decided by the form fields,
//! not by the URL. In order of priority:
//!
//! 1. `logout=true` clears the session and rotates its identifier.
//! 2. `user`/`pass` matching the configured account stores `username` and
//!    rotates the identifier.
//! 3. Anything else, including missing fields, re-renders the form with
//!    "Wrong credentials." and leaves the session untouched.

use axum::{
    body::Bytes,
    extract::Extension,
    http::{
        header::{CONTENT_TYPE, LOCATION, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use std::{collections::HashMap, sync::Arc};
use tracing::info;
use url::form_urlencoded;

use super::{
    html_response, internal_error, rotate_session,
    state::{AppState, Credentials},
    templates, HTML_CONTENT_TYPE,
};
use crate::session::{cookie, Session, USERNAME};

type Form = HashMap<String, Vec<String>>;

#[derive(Debug, PartialEq, Eq)]
enum Submission {
    Logout,
    Login(String),
    Rejected { malformed: bool },
}

impl Submission {
    fn classify(form: &Form, credentials: &Credentials) -> Self {
        if first(form, "logout") == Some("true") {
            return Self::Logout;
        }

        match (first(form, "user"), first(form, "pass")) {
            (Some(user), Some(pass)) if credentials.matches(user, pass) => {
                Self::Login(user.to_string())
            }
            (Some(_), Some(_)) => Self::Rejected { malformed: false },
            _ => Self::Rejected { malformed: true },
        }
    }
}

/// Decode an `application/x-www-form-urlencoded` body into name -> values.
/// Undecodable input yields whatever pairs could be recovered.
fn parse_form(body: &[u8]) -> Form {
    let mut form = Form::new();
    for (name, value) in form_urlencoded::parse(body).into_owned() {
        form.entry(name).or_default().push(value);
    }
    form
}

fn first<'a>(form: &'a Form, name: &str) -> Option<&'a str> {
    form.get(name)
        .and_then(|values| values.first())
        .map(String::as_str)
}

#[utoipa::path(
    post,
    path = "/login",
    request_body(
        content = String,
        content_type = "application/x-www-form-urlencoded",
        description = "`user` and `pass`, or `logout=true`"
    ),
    responses(
        (status = 303, description = "Session changed and its identifier rotated, redirect to /"),
        (status = 200, description = "Wrong credentials, login form shown again", body = String, content_type = "text/html"),
    ),
    tag = "session"
)]
pub async fn login(
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
    body: Bytes,
) -> Response {
    submit(&headers, &state, &body)
}

#[utoipa::path(
    post,
    path = "/logout",
    request_body(
        content = String,
        content_type = "application/x-www-form-urlencoded",
        description = "`logout=true`, or `user` and `pass`"
    ),
    responses(
        (status = 303, description = "Session changed and its identifier rotated, redirect to /"),
        (status = 200, description = "Wrong credentials, login form shown again", body = String, content_type = "text/html"),
    ),
    tag = "session"
)]
pub async fn logout(
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
    body: Bytes,
) -> Response {
    submit(&headers, &state, &body)
}

pub(crate) fn submit(headers: &HeaderMap, state: &AppState, body: &[u8]) -> Response {
    let form = parse_form(body);
    let presented = cookie::session_id(headers);

    match Submission::classify(&form, state.credentials()) {
        Submission::Logout => {
            info!("Logout accepted");
            transition(state, presented.as_deref(), Session::clear)
        }
        Submission::Login(username) => {
            info!(username = %username, "Login accepted");
            transition(state, presented.as_deref(), |session: &mut Session| {
                session.set(USERNAME, username.as_str());
            })
        }
        Submission::Rejected { malformed } => {
            info!(malformed, "Login rejected");
            html_response(
                StatusCode::OK,
                None,
                templates::login_form(
                    templates::WRONG_CREDENTIALS,
                    state.credentials().is_demo(),
                ),
            )
        }
    }
}

/// Rotate before building the response, so the cookie sent is the new identifier.
fn transition<F>(state: &AppState, presented: Option<&str>, update: F) -> Response
where
    F: Fn(&mut Session),
{
    let sid = match rotate_session(state.store(), presented, update) {
        Ok(sid) => sid,
        Err(err) => return internal_error(&err),
    };

    match cookie::session_cookie(&sid, state.secure_cookie()) {
        Ok(cookie) => (
            StatusCode::SEE_OTHER,
            [
                (CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE)),
                (LOCATION, HeaderValue::from_static("/")),
                (SET_COOKIE, cookie),
            ],
        )
            .into_response(),
        Err(err) => internal_error(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(body: &str) -> Submission {
        Submission::classify(&parse_form(body.as_bytes()), &Credentials::default())
    }

    #[test]
    fn parse_form_collects_repeated_fields() {
        let form = parse_form(b"user=alice&user=mallory&pass=b%6Fb&note=a+b");
        assert_eq!(
            form.get("user"),
            Some(&vec!["alice".to_string(), "mallory".to_string()])
        );
        assert_eq!(first(&form, "pass"), Some("bob"));
        assert_eq!(first(&form, "note"), Some("a b"));
        assert_eq!(first(&form, "missing"), None);
    }

    #[test]
    fn parse_form_tolerates_garbage() {
        let form = parse_form(&[0xff, b'=', b'&', b'&', 0x00]);
        assert_eq!(first(&form, "user"), None);
        assert!(parse_form(b"").is_empty());
    }

    #[test]
    fn logout_has_priority() {
        assert_eq!(classify("logout=true"), Submission::Logout);
        assert_eq!(classify("user=alice&pass=bob&logout=true"), Submission::Logout);
    }

    #[test]
    fn logout_requires_true() {
        assert_eq!(
            classify("logout=false"),
            Submission::Rejected { malformed: true }
        );
        assert_eq!(
            classify("logout=false&user=alice&pass=bob"),
            Submission::Login("alice".to_string())
        );
    }

    #[test]
    fn correct_credentials_log_in() {
        assert_eq!(
            classify("user=alice&pass=bob"),
            Submission::Login("alice".to_string())
        );
    }

    #[test]
    fn wrong_credentials_are_rejected() {
        assert_eq!(
            classify("user=alice&pass=wrong"),
            Submission::Rejected { malformed: false }
        );
        assert_eq!(
            classify("user=mallory&pass=bob"),
            Submission::Rejected { malformed: false }
        );
    }

    #[test]
    fn missing_fields_are_rejected() {
        assert_eq!(classify(""), Submission::Rejected { malformed: true });
        assert_eq!(
            classify("user=alice"),
            Submission::Rejected { malformed: true }
        );
        assert_eq!(classify("pass=bob"), Submission::Rejected { malformed: true });
    }
}

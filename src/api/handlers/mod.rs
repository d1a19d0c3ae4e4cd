//! Route handlers and the session plumbing they share.
//!
//! Handlers only ever hold a session identifier. Each request resolves the `sid`
//! cookie through the store, and identity changes go through
//! [`SessionStore::update_and_rotate`] so the response can only announce an
//! identifier that is already live while the presented one is already gone.

pub mod health;
pub mod login;
pub mod state;
pub mod templates;
pub mod view;


pub use state::{AppState, Credentials};

use axum::{
    http::{
        header::{CONTENT_TYPE, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use std::fmt::Display;
use tracing::{debug, error};

use crate::session::{token, Session, SessionError, SessionStore};

pub const HTML_CONTENT_TYPE: &str = "text/html;charset=utf-8";

/// Session state read for the current request.
#[derive(Debug)]
pub struct Resolved {
    pub sid: String,
    /// The client does not know `sid` yet and must be sent a cookie.
    pub created: bool,
    pub session: Session,
}

/// Resolve the presented identifier and read its state.
///
/// A concurrent rotation can retire the identifier between the two steps; in
/// that case the request resolves once more and ends up with a fresh session.
pub(crate) fn load_session(
    store: &SessionStore,
    presented: Option<&str>,
) -> Result<Resolved, SessionError> {
    let (sid, _) = store.resolve(presented)?;
    let (sid, session) = match store.get(&sid) {
        Ok(session) => (sid, session),
        Err(SessionError::NotFound) => {
            debug!(
                sid_prefix = token::prefix(&sid),
                "session retired during read, resolving again"
            );
            let (sid, _) = store.resolve(presented)?;
            let session = store.get(&sid)?;
            (sid, session)
        }
        Err(err) => return Err(err),
    };

    let created = presented != Some(sid.as_str());
    Ok(Resolved {
        sid,
        created,
        session,
    })
}

/// Apply `update` to the request's session and rotate its identifier, retrying
/// once when another request rotated it first.
pub(crate) fn rotate_session<F>(
    store: &SessionStore,
    presented: Option<&str>,
    update: F,
) -> Result<String, SessionError>
where
    F: Fn(&mut Session),
{
    let (sid, _) = store.resolve(presented)?;
    match store.update_and_rotate(&sid, &update) {
        Err(SessionError::NotFound) => {
            debug!(
                sid_prefix = token::prefix(&sid),
                "session rotated concurrently, retrying"
            );
            let (sid, _) = store.resolve(presented)?;
            store.update_and_rotate(&sid, &update)
        }
        result => result,
    }
}

pub(crate) fn html_response(
    status: StatusCode,
    cookie: Option<HeaderValue>,
    body: String,
) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE));
    if let Some(cookie) = cookie {
        headers.insert(SET_COOKIE, cookie);
    }
    (status, headers, body).into_response()
}

pub(crate) fn internal_error(err: &impl Display) -> Response {
    error!("Failed to handle session request: {err}");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

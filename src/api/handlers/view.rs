use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use std::sync::Arc;

use super::{html_response, internal_error, load_session, state::AppState, templates};
use crate::session::cookie;

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Login form for anonymous sessions, welcome page otherwise", body = String, content_type = "text/html"),
    ),
    tag = "session"
)]
/// Render the page for the current session.
///
/// `Set-Cookie` is only sent when the request did not carry a live identifier;
/// reloading the page with a valid cookie never changes it.
pub async fn view(headers: HeaderMap, state: Extension<Arc<AppState>>) -> Response {
    let presented = cookie::session_id(&headers);
    let resolved = match load_session(state.store(), presented.as_deref()) {
        Ok(resolved) => resolved,
        Err(err) => return internal_error(&err),
    };

    let body = match resolved.session.username() {
        Some(username) => templates::logged_in(username),
        None => templates::login_form(templates::NOT_LOGGED_IN, state.credentials().is_demo()),
    };

    if !resolved.created {
        return html_response(StatusCode::OK, None, body);
    }

    match cookie::session_cookie(&resolved.sid, state.secure_cookie()) {
        Ok(cookie) => html_response(StatusCode::OK, Some(cookie), body),
        Err(err) => internal_error(&err),
    }
}

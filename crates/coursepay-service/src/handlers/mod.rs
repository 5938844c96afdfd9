//! HTTP handlers.
//!
//! Handlers stay thin: extract, call into [`crate::services`], and shape the
//! response. Page handlers also write the session back, since reading flashes
//! consumes them.

pub mod accounts;
pub mod health;
pub mod orders;
pub mod pages;
pub mod payments;

use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect, Response};

use crate::error::ApiError;
use crate::session::Session;
use crate::state::AppState;

/// Attach the (possibly modified) session cookie to a response.
pub(crate) fn with_session(
    state: &AppState,
    session: &Session,
    response: impl IntoResponse,
) -> Result<Response, ApiError> {
    let cookie = state.sessions.set_cookie(session)?;
    Ok(([(SET_COOKIE, cookie)], response).into_response())
}

/// Queue a flash message and redirect.
pub(crate) fn flash_redirect(
    state: &AppState,
    mut session: Session,
    message: impl Into<String>,
    to: &str,
) -> Result<Response, ApiError> {
    session.flash(message);
    with_session(state, &session, Redirect::to(to))
}

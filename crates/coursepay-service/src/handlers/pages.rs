//! Landing page and dashboard.

use std::sync::Arc;

use askama::Template;
use axum::extract::State;
use axum::response::{Html, Response};

use crate::error::ApiError;
use crate::handlers::{flash_redirect, with_session};
use crate::session::Session;
use crate::state::AppState;
use crate::templates::{DashboardTemplate, IndexTemplate, PaymentView};

const LOGIN_REQUIRED: &str = "You need to be logged in to view this page.";

/// `GET /`.
pub async fn index(
    State(state): State<Arc<AppState>>,
    mut session: Session,
) -> Result<Response, ApiError> {
    let page = IndexTemplate {
        session_user: session.username().map(str::to_owned),
        flashes: session.take_flashes(),
        courses: state.catalog.iter().cloned().collect(),
    };
    let html = Html(page.render()?);

    with_session(&state, &session, html)
}

/// `GET /dashboard`.
///
/// Anonymous visitors are sent to the login page. So is a session whose user
/// no longer exists, which is cleared first.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    mut session: Session,
) -> Result<Response, ApiError> {
    let Some(user_id) = session.user_id() else {
        return flash_redirect(&state, session, LOGIN_REQUIRED, "/login");
    };

    let Some(user) = state.store.find_user_by_id(&user_id).await? else {
        tracing::warn!(user_id = %user_id, "Session refers to a missing user");
        session.clear();
        return flash_redirect(&state, session, LOGIN_REQUIRED, "/login");
    };

    let payments = state
        .store
        .list_payments_by_user(&user.id)
        .await?
        .iter()
        .map(|p| PaymentView::new(p, &state.catalog))
        .collect();

    let page = DashboardTemplate {
        session_user: Some(user.username.clone()),
        flashes: session.take_flashes(),
        username: user.username,
        payments,
    };
    let html = Html(page.render()?);

    with_session(&state, &session, html)
}

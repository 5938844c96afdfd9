//! Registration, login and logout.

use std::sync::Arc;

use askama::Template;
use axum::extract::State;
use axum::response::{Html, Response};
use axum::Form;

use crate::error::ApiError;
use crate::handlers::{flash_redirect, with_session};
use crate::services::accounts::{self, AuthError, LoginForm, RegisterForm};
use crate::session::Session;
use crate::state::AppState;
use crate::templates::{LoginTemplate, RegisterTemplate};

/// `GET /register`.
pub async fn register_page(
    State(state): State<Arc<AppState>>,
    mut session: Session,
) -> Result<Response, ApiError> {
    let page = RegisterTemplate {
        session_user: session.username().map(str::to_owned),
        flashes: session.take_flashes(),
    };
    let html = Html(page.render()?);

    with_session(&state, &session, html)
}

/// `POST /register`.
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, ApiError> {
    match accounts::register(state.store.as_ref(), form, state.password_cost).await {
        Ok(_) => flash_redirect(
            &state,
            session,
            "Registration successful! Please log in.",
            "/login",
        ),
        Err(e) if e.is_user_facing() => flash_redirect(&state, session, e.to_string(), "/register"),
        Err(e) => Err(internal(&e)),
    }
}

/// `GET /login`.
pub async fn login_page(
    State(state): State<Arc<AppState>>,
    mut session: Session,
) -> Result<Response, ApiError> {
    let page = LoginTemplate {
        session_user: session.username().map(str::to_owned),
        flashes: session.take_flashes(),
    };
    let html = Html(page.render()?);

    with_session(&state, &session, html)
}

/// `POST /login`.
///
/// A failed login re-renders the form directly with the error message.
pub async fn login(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    match accounts::login(state.store.as_ref(), form).await {
        Ok(user) => {
            session.log_in(&user);
            flash_redirect(&state, session, "Logged in successfully!", "/dashboard")
        }
        Err(e) if e.is_user_facing() => {
            let mut flashes = session.take_flashes();
            flashes.push(e.to_string());

            let page = LoginTemplate {
                session_user: session.username().map(str::to_owned),
                flashes,
            };
            let html = Html(page.render()?);

            with_session(&state, &session, html)
        }
        Err(e) => Err(internal(&e)),
    }
}

/// `GET /logout`.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    mut session: Session,
) -> Result<Response, ApiError> {
    if let Some(user_id) = session.user_id() {
        tracing::info!(user_id = %user_id, "User logged out");
    }
    session.clear();

    flash_redirect(&state, session, "You have been logged out.", "/")
}

fn internal(err: &AuthError) -> ApiError {
    ApiError::Internal(err.to_string())
}

//! Registration and login.
//!
//! The `Display` strings of [`AuthError`]'s user-facing variants are exactly
//! the flash messages shown on the forms.

use serde::Deserialize;

use coursepay_core::{CoreError, User};
use coursepay_store::{Store, StoreError};

/// Registration form fields.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Login form fields.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Errors from registration and login.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Username taken.
    #[error("Username already exists.")]
    DuplicateUsername,

    /// Email taken.
    #[error("Email already registered.")]
    DuplicateEmail,

    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// Storage failure.
    #[error(transparent)]
    Store(StoreError),

    /// Password hashing failure.
    #[error(transparent)]
    Hash(#[from] CoreError),

    /// The hashing task panicked or was cancelled.
    #[error("password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AuthError {
    /// Whether this error should be shown to the user as a flash message.
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::DuplicateUsername | Self::DuplicateEmail | Self::InvalidCredentials
        )
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername => Self::DuplicateUsername,
            StoreError::DuplicateEmail => Self::DuplicateEmail,
            other => Self::Store(other),
        }
    }
}

/// Register a new user.
///
/// Username is checked before email. A concurrent registration that slips
/// past the checks is caught by the store's uniqueness enforcement and
/// reported the same way.
pub async fn register(store: &dyn Store, form: RegisterForm, cost: u32) -> Result<User, AuthError> {
    if store.find_user_by_username(&form.username).await?.is_some() {
        return Err(AuthError::DuplicateUsername);
    }
    if store.find_user_by_email(&form.email).await?.is_some() {
        return Err(AuthError::DuplicateEmail);
    }

    let RegisterForm {
        username,
        email,
        password,
    } = form;
    let user =
        tokio::task::spawn_blocking(move || User::with_cost(username, email, &password, cost))
            .await??;

    store.insert_user(&user).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");
    Ok(user)
}

/// Check credentials and return the matching user.
pub async fn login(store: &dyn Store, form: LoginForm) -> Result<User, AuthError> {
    let Some(user) = store.find_user_by_email(&form.email).await? else {
        tracing::debug!("Login attempt for unknown email");
        return Err(AuthError::InvalidCredentials);
    };

    let (user, matches) = tokio::task::spawn_blocking(move || {
        let matches = user.check_password(&form.password);
        (user, matches)
    })
    .await?;

    if matches {
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(user)
    } else {
        tracing::debug!(user_id = %user.id, "Login attempt with wrong password");
        Err(AuthError::InvalidCredentials)
    }
}

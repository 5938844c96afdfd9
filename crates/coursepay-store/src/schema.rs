//! Table and constraint names.
//!
//! These must match `migrations/`; the PostgreSQL backend maps unique
//! violations back to domain errors by constraint name.

/// Table names.
pub mod table {
    /// Registered users, keyed by `id`.
    pub const USERS: &str = "users";

    /// Payment attempts, keyed by `id`.
    pub const PAYMENTS: &str = "payments";
}

/// Unique constraint names.
pub mod constraint {
    /// `users.username` uniqueness.
    pub const USERS_USERNAME: &str = "users_username_key";

    /// `users.email` uniqueness.
    pub const USERS_EMAIL: &str = "users_email_key";

    /// `payments.gateway_order_id` uniqueness.
    pub const PAYMENTS_ORDER_ID: &str = "payments_gateway_order_id_key";

    /// `payments.gateway_payment_id` uniqueness.
    pub const PAYMENTS_PAYMENT_ID: &str = "payments_gateway_payment_id_key";
}

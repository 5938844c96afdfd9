//! Request-independent business logic.
//!
//! Handlers translate HTTP into calls on these functions; everything they need
//! (store, catalog, gateway, current user) is passed in explicitly.

pub mod accounts;
pub mod orders;
pub mod payments;

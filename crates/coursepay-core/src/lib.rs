//! Core types and utilities for coursepay.
//!
//! This crate provides the foundational types used throughout the service:
//!
//! - **Identifiers**: `UserId`, `PaymentId`
//! - **Catalog**: `Course`, `Catalog`
//! - **Users**: `User` with bcrypt password hashing
//! - **Payments**: `Payment`, `PaymentStatus`
//!
//! # Amounts
//!
//! Catalog prices are in major currency units (rupees). Everything that talks
//! to the gateway or the store uses minor units (paise): `price * 100`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod error;
pub mod ids;
pub mod payment;
pub mod user;

pub use catalog::{Catalog, Course, CURRENCY, ORDER_DESCRIPTION};
pub use error::{CoreError, Result};
pub use ids::{IdError, PaymentId, UserId};
pub use payment::{Payment, PaymentStatus, UNKNOWN_COURSE};
pub use user::{User, DEFAULT_PASSWORD_COST};

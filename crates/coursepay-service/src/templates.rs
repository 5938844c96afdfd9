//! Server-rendered pages.
//!
//! Every page extends `base.html`, which needs the navbar user and the
//! pending flash messages.

#![allow(missing_docs)] // Fields are the template variables.

use askama::Template;

use coursepay_core::{Catalog, Course, Payment};

/// Landing page with the course cards and checkout script.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub session_user: Option<String>,
    pub flashes: Vec<String>,
    pub courses: Vec<Course>,
}

/// Login form.
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub session_user: Option<String>,
    pub flashes: Vec<String>,
}

/// Registration form.
#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub session_user: Option<String>,
    pub flashes: Vec<String>,
}

/// Payment history for the logged-in user.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub session_user: Option<String>,
    pub flashes: Vec<String>,
    pub username: String,
    pub payments: Vec<PaymentView>,
}

/// One dashboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentView {
    pub course_name: String,
    pub amount: String,
    pub status: String,
    pub order_id: String,
    pub date: String,
}

impl PaymentView {
    /// Render a payment, naming the course from the catalog when possible.
    #[must_use]
    pub fn new(payment: &Payment, catalog: &Catalog) -> Self {
        Self {
            course_name: catalog.course_name(&payment.course_id).to_string(),
            amount: payment.amount_display(),
            status: payment.status.to_string(),
            order_id: payment.gateway_order_id.clone(),
            date: payment.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

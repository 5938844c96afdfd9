//! Course catalog.
//!
//! The catalog is a fixed set of courses built once at startup and shared
//! read-only by every request. Prices are whole rupees; the gateway and the
//! payment records use paise.

use std::collections::BTreeMap;

use serde::Serialize;

/// Currency every order is created in.
pub const CURRENCY: &str = "INR";

/// Description shown in the gateway's checkout widget.
pub const ORDER_DESCRIPTION: &str = "AITOOLS - Online Course";

/// A purchasable course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    /// Catalog key (e.g. `"python"`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Price in major currency units.
    pub price: i64,
}

impl Course {
    /// Create a course entry.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }

    /// Price in minor currency units (paise).
    #[must_use]
    pub const fn amount_minor(&self) -> i64 {
        self.price * 100
    }
}

/// Immutable mapping of course id to course.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: BTreeMap<String, Course>,
}

impl Catalog {
    /// Build a catalog from a list of courses. Later duplicates win.
    #[must_use]
    pub fn new(courses: impl IntoIterator<Item = Course>) -> Self {
        Self {
            courses: courses.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    /// The courses sold on the site.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new([
            Course::new("master", "All-in-One AI Master Course", 999),
            Course::new("python", "Python for AI & ML", 499),
            Course::new("ml", "Machine Learning in Depth", 799),
            Course::new("nlp-dl", "NLP & Deep Learning", 999),
            Course::new("gen-ai", "Generative AI Mastery", 1499),
        ])
    }

    /// Look up a course by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Course> {
        self.courses.get(id)
    }

    /// Display name for a course id, falling back to the id itself.
    ///
    /// Payment rows may carry ids the catalog no longer (or never) knew about.
    #[must_use]
    pub fn course_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.courses.get(id).map_or(id, |c| c.name.as_str())
    }

    /// All courses, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    /// Number of courses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

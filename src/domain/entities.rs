//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of the page-tracker domain.
//! They have no external dependencies and contain only business logic.

/// Body returned when the counter store cannot be reached.
pub const APOLOGY_MESSAGE: &str = "Sorry, something went wrong \u{1F614}";

/// The view count produced by one atomic increment.
///
/// The value is exactly what the store returned; it is never adjusted
/// locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageViews(i64);

impl PageViews {
    pub fn new(count: i64) -> Self {
        Self(count)
    }

    pub fn count(&self) -> i64 {
        self.0
    }

    /// Render the message shown to the visitor.
    pub fn message(&self) -> String {
        format!("This page has been seen {} times.", self.0)
    }
}

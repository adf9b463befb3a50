//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use std::fmt;

/// Name of the key the page-view counter lives under.
///
/// The counter itself is owned by the key-value store; this type only
/// carries the key so the service never builds key strings ad hoc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterKey(String);

impl CounterKey {
    /// Key used when nothing else is configured.
    pub const DEFAULT: &'static str = "page_views";

    /// Create a counter key from a name.
    ///
    /// # Examples
    /// ```
    /// use page_tracker::domain::value_objects::CounterKey;
    ///
    /// assert_eq!(CounterKey::new("hits").as_str(), "hits");
    /// assert_eq!(CounterKey::default().as_str(), "page_views");
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the raw key name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CounterKey {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl fmt::Display for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Store errors
//!
//! The only failures the counter use case recovers from. Anything else
//! (a panic, a bug in rendering) is left to propagate.

/// A failure that originated at the key-value store boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The connection string could not be parsed.
    #[error("invalid store url: {0}")]
    InvalidUrl(String),

    /// The store refused, dropped or never accepted the connection.
    #[error("store connection error: {0}")]
    Connection(String),

    /// The store did not answer in time.
    #[error("store timeout: {0}")]
    Timeout(String),

    /// The store answered with an error reply.
    #[error("store responded with an error: {0}")]
    Response(String),

    /// The reply could not be converted into the expected type.
    #[error("unexpected store reply: {0}")]
    Type(String),
}

impl StoreError {
    /// Whether the store was never reached (refused, dropped, timed out).
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout(_))
    }
}

//! Conversion identifiers.

use std::fmt;
use uuid::Uuid;

/// Unique identifier for a single upload-and-convert request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversionId(Uuid);

impl ConversionId {
    /// Create a new random ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Short form (first 8 hex digits) for file names and log lines.
    #[must_use]
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl fmt::Display for ConversionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

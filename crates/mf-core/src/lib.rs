//! mf-core: shared types, ids, errors, configuration and download naming.
//!
//! This crate is the foundational dependency for the other mf-* crates.

pub mod config;
pub mod error;
pub mod ids;
pub mod naming;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::ConversionId;
pub use naming::{content_disposition, download_name};

//! Error types for Vellum rendering operations.
//!
//! Failures are scoped: a configuration error aborts the offending item's
//! drawable synchronously before that item draws anything, and an image
//! decode failure is reported and skipped without disturbing the rest of
//! the item sequence. Nothing here is fatal to the engine itself.

use thiserror::Error;

use crate::image::ImageError;

/// The main error type for Vellum operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A malformed item descriptor, caught before any drawing occurs for
    /// the item. Names the offending field.
    #[error("invalid item configuration: {field}: {reason}")]
    Configuration {
        field: &'static str,
        reason: String,
    },

    /// An image backend failure.
    #[error(transparent)]
    Image(#[from] ImageError),
}

impl Error {
    /// Create a new `Configuration` error naming the offending field.
    pub fn configuration(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field,
            reason: reason.into(),
        }
    }
}

//! Error types for remodel.
//!
//! Only the ambient, fallible operations report errors: loading layout
//! configuration, parsing address literals and reading process module maps.
//! Unsupported field or signature types are rejected at compile time and
//! module lookups that find nothing return `None`, so neither appears here.

use thiserror::Error;

/// Main error type for remodel operations.
#[derive(Debug, Error)]
pub enum RemodelError {
    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed layout configuration
    #[error("Invalid layout configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A layout name that the configuration does not describe
    #[error("Unknown layout: {0}")]
    UnknownLayout(String),

    /// A field name missing from a described layout
    #[error("Unknown field `{field}` in layout `{layout}`")]
    UnknownField { layout: String, field: String },

    /// An offset field that cannot lie inside its declared layout
    #[error("Field `{field}` at offset {offset:#x} lies outside `{layout}` ({size:#x} bytes)")]
    FieldOutOfBounds {
        layout: String,
        field: String,
        offset: isize,
        size: usize,
    },

    /// Text that does not parse as an address
    #[error("Invalid address literal: {0:?}")]
    InvalidAddress(String),

    /// A line of a module map that does not follow the expected format
    #[error("Malformed module map entry: {0}")]
    MalformedMapping(String),
}

/// Result type alias for remodel operations
pub type Result<T> = std::result::Result<T, RemodelError>;

//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error)]
pub enum WaymarkTypesError {
    /// Property value cannot be converted into the requested type.
    #[error("invalid property value: {0}")]
    Conversion(String),
}

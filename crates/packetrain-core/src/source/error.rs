use thiserror::Error;

use crate::capture::FormatError;

/// Errors returned when loading a capture from disk.
///
/// # Examples
/// ```
/// use packetrain_core::{FormatError, SourceError};
///
/// let err = SourceError::from(FormatError::TooShort { needed: 24, actual: 3 });
/// assert!(err.to_string().contains("need 24 bytes"));
/// ```
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture parse error: {0}")]
    Format(#[from] FormatError),
}

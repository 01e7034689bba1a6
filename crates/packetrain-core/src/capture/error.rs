use thiserror::Error;

/// Fatal decode errors: the buffer is not a recognizable capture.
///
/// # Examples
/// ```
/// use packetrain_core::FormatError;
///
/// let err = FormatError::UnrecognizedMagic { magic: 0xdeadbeef };
/// assert!(err.to_string().contains("0xdeadbeef"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("capture too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("not a recognized capture format (magic 0x{magic:08x})")]
    UnrecognizedMagic { magic: u32 },
}

//! Classic libpcap container decoding.
//!
//! The global header fixes the byte order and timestamp resolution for the
//! whole buffer; records are then scanned linearly and each frame is handed to
//! the protocol decoders. Only header problems are fatal, see [`FormatError`].

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::FormatError;
pub use parser::decode;

//! Capture loading from the filesystem.
//!
//! Two origins exist: a well-known example capture that is loaded on a
//! best-effort basis, and captures the user names explicitly. Both are read
//! fully into memory and handed to [`decode`]; the decoder itself never does
//! I/O.

mod error;

pub use error::SourceError;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::CaptureFile;
use crate::capture::decode;
use crate::ids::IdGenerator;

/// Well-known location of the example capture, relative to the working
/// directory.
pub const DEFAULT_EXAMPLE_PATH: &str = "pcaps/sample.pcap";
/// Packet cap for the example capture.
pub const EXAMPLE_MAX_PACKETS: usize = 1000;
/// Packet cap for user-supplied captures.
pub const UPLOAD_MAX_PACKETS: usize = 2000;

/// Where a capture came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureOrigin {
    /// The well-known example capture.
    Example,
    /// A capture named by the user.
    Upload,
}

impl CaptureOrigin {
    pub fn max_packets(self) -> usize {
        match self {
            CaptureOrigin::Example => EXAMPLE_MAX_PACKETS,
            CaptureOrigin::Upload => UPLOAD_MAX_PACKETS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CaptureOrigin::Example => "example",
            CaptureOrigin::Upload => "upload",
        }
    }
}

/// A decoded capture together with its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedCapture {
    pub origin: CaptureOrigin,
    pub capture: CaptureFile,
}

/// Read and decode a capture using the origin's packet cap.
///
/// # Errors
/// Returns `SourceError::Io` when the file cannot be read and
/// `SourceError::Format` when it is not a recognizable capture.
pub fn load_capture<G: IdGenerator + ?Sized>(
    path: &Path,
    origin: CaptureOrigin,
    ids: &mut G,
) -> Result<LoadedCapture, SourceError> {
    load_capture_limited(path, origin, origin.max_packets(), ids)
}

/// Read and decode a capture with an explicit packet cap.
///
/// # Errors
/// Same as [`load_capture`].
pub fn load_capture_limited<G: IdGenerator + ?Sized>(
    path: &Path,
    origin: CaptureOrigin,
    max_packets: usize,
    ids: &mut G,
) -> Result<LoadedCapture, SourceError> {
    let bytes = fs::read(path)?;
    debug!(
        path = %path.display(),
        bytes = bytes.len(),
        origin = origin.label(),
        "capture read"
    );
    let capture = decode(&bytes, max_packets, ids)?;
    Ok(LoadedCapture { origin, capture })
}

/// Best-effort load of the example capture.
///
/// A missing or undecodable example is not an error: it is logged at debug
/// level and `None` is returned.
pub fn load_example<G: IdGenerator + ?Sized>(path: &Path, ids: &mut G) -> Option<LoadedCapture> {
    match load_capture(path, CaptureOrigin::Example, ids) {
        Ok(loaded) => Some(loaded),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "example capture unavailable");
            None
        }
    }
}

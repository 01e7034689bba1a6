//! Packetrain core library: classic libpcap decoding for packet visualization.
//!
//! The crate turns an in-memory capture buffer into a [`CaptureFile`]: the
//! global header metadata plus an ordered list of [`Packet`] descriptors with
//! Ethernet, network and transport layers decoded into closed sum types.
//! Decoding follows the same layered structure everywhere:
//! - `layout`: byte offsets and ranges (source of truth)
//! - `reader`: bounds-checked byte access and byte-order conventions
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Decoding is best-effort: only an unrecognized or truncated global header is
//! fatal. Truncated trailing records end the scan, undersized frames are
//! skipped, and unsupported header combinations are labelled `Unknown` or
//! `Other` so that whatever was parseable can still be rendered.
//!
//! Invariants:
//! - Packets appear in the exact order of their records in the buffer.
//! - The input buffer is only borrowed, never mutated.
//! - Every decoded packet receives a fresh id from the injected [`IdGenerator`].
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use packetrain_core::{CaptureOrigin, RandomIds, load_capture};
//!
//! let mut ids = RandomIds::new();
//! let loaded = load_capture(Path::new("capture.pcap"), CaptureOrigin::Upload, &mut ids)?;
//! println!("{} packets", loaded.capture.packets.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

mod capture;
mod ids;
mod protocols;
mod source;
mod summary;
mod synth;

pub use capture::{FormatError, decode};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use source::{
    CaptureOrigin, DEFAULT_EXAMPLE_PATH, EXAMPLE_MAX_PACKETS, LoadedCapture, SourceError,
    UPLOAD_MAX_PACKETS, load_capture, load_capture_limited, load_example,
};
pub use summary::{CaptureSummary, NetworkCounts, TransportCounts, summarize};
pub use synth::{DEFAULT_SYNTH_PACKETS, synthesize};

/// Byte order of the capture headers, detected once from the magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    Little,
    Big,
}

/// Resolution announced by the magic number. Reported as metadata only;
/// packet timestamps always treat the fraction as microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampResolution {
    Microsecond,
    Nanosecond,
}

/// Capture format version from the global header.
///
/// # Examples
/// ```
/// use packetrain_core::Version;
///
/// let version = Version { major: 2, minor: 4 };
/// assert_eq!(version.to_string(), "2.4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Result of one decode call.
///
/// A new value is produced for every decode; nothing is cached or updated
/// incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureFile {
    /// Format version (major.minor).
    pub version: Version,
    /// Maximum captured bytes per frame, passed through unvalidated.
    pub snapshot_length: u32,
    /// Link-layer type identifier, passed through unvalidated.
    pub link_type: u32,
    /// Byte order detected from the magic number.
    pub endianness: Endianness,
    /// Timestamp resolution detected from the magic number.
    pub resolution: TimestampResolution,
    /// Decoded packets in capture order.
    pub packets: Vec<Packet>,
}

/// One decoded frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    /// Caller-generated unique identifier for animation/selection tracking.
    pub id: String,
    /// Capture timestamp in milliseconds since the Unix epoch.
    pub timestamp_millis: u64,
    pub ethernet: EthernetInfo,
    pub network: NetworkLayer,
    /// Transport layer, absent for non-IP frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportLayer>,
    /// Bytes captured for this frame.
    pub captured_size: u32,
    /// Bytes on the wire; falls back to the captured size when the record
    /// header reports zero.
    pub original_size: u32,
    /// Protocol payload bytes after all decoded headers, clamped at zero.
    pub payload_length: u32,
}

/// Ethernet header fields.
///
/// # Examples
/// ```
/// use packetrain_core::EthernetInfo;
///
/// let eth = EthernetInfo {
///     source_mac: "aa:bb:cc:dd:ee:ff".to_string(),
///     dest_mac: "11:22:33:44:55:66".to_string(),
///     ether_type: 0x0800,
///     vlan: None,
/// };
/// assert_eq!(eth.ether_type, 0x0800);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthernetInfo {
    /// Source MAC as lowercase colon-separated hex.
    pub source_mac: String,
    /// Destination MAC as lowercase colon-separated hex.
    pub dest_mac: String,
    /// Effective ether type (the inner one for VLAN-tagged frames).
    pub ether_type: u16,
    /// 802.1Q VLAN id when a single tag was unwrapped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,
}

/// Network layer of a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NetworkLayer {
    Ipv4 {
        source: String,
        destination: String,
        ttl: u8,
        protocol: u8,
    },
    Ipv6 {
        source: String,
        destination: String,
        next_header: u8,
    },
    Arp,
    /// Unsupported ether type, or an IP frame too short for its fixed header.
    Unknown {
        #[serde(with = "ether_type_hex")]
        ether_type: u16,
    },
}

impl fmt::Display for NetworkLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkLayer::Ipv4 { .. } => f.write_str("IPv4"),
            NetworkLayer::Ipv6 { .. } => f.write_str("IPv6"),
            NetworkLayer::Arp => f.write_str("ARP"),
            NetworkLayer::Unknown { ether_type } => write!(f, "ETH(0x{ether_type:x})"),
        }
    }
}

/// Transport layer of an IP frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportLayer {
    Tcp {
        source_port: u16,
        destination_port: u16,
        flags: TcpFlags,
    },
    Udp {
        source_port: u16,
        destination_port: u16,
    },
    Icmp,
    /// Any other protocol number, or a TCP/UDP header that did not fit.
    Other { protocol: u8 },
}

impl TransportLayer {
    /// Source and destination ports for TCP/UDP.
    pub fn ports(&self) -> Option<(u16, u16)> {
        match self {
            TransportLayer::Tcp {
                source_port,
                destination_port,
                ..
            }
            | TransportLayer::Udp {
                source_port,
                destination_port,
            } => Some((*source_port, *destination_port)),
            TransportLayer::Icmp | TransportLayer::Other { .. } => None,
        }
    }
}

impl fmt::Display for TransportLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportLayer::Tcp { .. } => f.write_str("TCP"),
            TransportLayer::Udp { .. } => f.write_str("UDP"),
            TransportLayer::Icmp => f.write_str("ICMP"),
            TransportLayer::Other { protocol } => write!(f, "OTHER({protocol})"),
        }
    }
}

/// The six classic TCP control bits.
///
/// # Examples
/// ```
/// use packetrain_core::TcpFlags;
///
/// let flags = TcpFlags::new(TcpFlags::SYN | TcpFlags::ACK);
/// assert!(flags.contains(TcpFlags::SYN));
/// assert_eq!(flags.to_string(), "AS");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TcpFlags(u8);

impl TcpFlags {
    pub const FIN: u8 = 0x01;
    pub const SYN: u8 = 0x02;
    pub const RST: u8 = 0x04;
    pub const PSH: u8 = 0x08;
    pub const ACK: u8 = 0x10;
    pub const URG: u8 = 0x20;
    pub const MASK: u8 = 0x3f;

    const LABELS: [(char, u8); 6] = [
        ('U', Self::URG),
        ('A', Self::ACK),
        ('P', Self::PSH),
        ('R', Self::RST),
        ('S', Self::SYN),
        ('F', Self::FIN),
    ];

    /// Build from a raw flags byte; bits above URG are discarded.
    pub fn new(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, flag: u8) -> bool {
        self.0 & flag == flag
    }
}

impl fmt::Display for TcpFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, bit) in Self::LABELS {
            if self.contains(bit) {
                write!(f, "{label}")?;
            }
        }
        Ok(())
    }
}

mod ether_type_hex {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &u16, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{value:x}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
        let text = String::deserialize(deserializer)?;
        let digits = text
            .strip_prefix("0x")
            .ok_or_else(|| D::Error::custom(format!("ether type must start with 0x: {text}")))?;
        u16::from_str_radix(digits, 16).map_err(D::Error::custom)
    }
}

//! Overlay summary of a decoded capture.

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{CaptureFile, NetworkLayer, TransportLayer};

/// Header metadata, time bounds and protocol mix of a capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSummary {
    pub packets_total: u64,
    /// Format version as `major.minor`.
    pub version: String,
    pub snapshot_length: u32,
    pub link_type: u32,
    /// RFC3339 timestamp of the earliest packet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 timestamp of the latest packet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
    pub network: NetworkCounts,
    pub transport: TransportCounts,
    /// Sum of per-packet payload lengths.
    pub payload_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkCounts {
    pub ipv4: u64,
    pub ipv6: u64,
    pub arp: u64,
    pub unknown: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportCounts {
    pub tcp: u64,
    pub udp: u64,
    pub icmp: u64,
    pub other: u64,
}

/// Summarize a decoded capture.
///
/// # Examples
/// ```
/// use packetrain_core::{CaptureFile, Endianness, TimestampResolution, Version, summarize};
///
/// let capture = CaptureFile {
///     version: Version { major: 2, minor: 4 },
///     snapshot_length: 65535,
///     link_type: 1,
///     endianness: Endianness::Little,
///     resolution: TimestampResolution::Microsecond,
///     packets: Vec::new(),
/// };
/// let summary = summarize(&capture);
/// assert_eq!(summary.packets_total, 0);
/// assert!(summary.time_start.is_none());
/// ```
pub fn summarize(capture: &CaptureFile) -> CaptureSummary {
    let mut network = NetworkCounts::default();
    let mut transport = TransportCounts::default();
    let mut payload_bytes = 0u64;
    let mut first_ts: Option<u64> = None;
    let mut last_ts: Option<u64> = None;

    for packet in &capture.packets {
        match packet.network {
            NetworkLayer::Ipv4 { .. } => network.ipv4 += 1,
            NetworkLayer::Ipv6 { .. } => network.ipv6 += 1,
            NetworkLayer::Arp => network.arp += 1,
            NetworkLayer::Unknown { .. } => network.unknown += 1,
        }
        match packet.transport {
            Some(TransportLayer::Tcp { .. }) => transport.tcp += 1,
            Some(TransportLayer::Udp { .. }) => transport.udp += 1,
            Some(TransportLayer::Icmp) => transport.icmp += 1,
            Some(TransportLayer::Other { .. }) => transport.other += 1,
            None => {}
        }
        payload_bytes += u64::from(packet.payload_length);
        first_ts = Some(first_ts.map_or(packet.timestamp_millis, |ts| {
            ts.min(packet.timestamp_millis)
        }));
        last_ts = Some(last_ts.map_or(packet.timestamp_millis, |ts| {
            ts.max(packet.timestamp_millis)
        }));
    }

    CaptureSummary {
        packets_total: capture.packets.len() as u64,
        version: capture.version.to_string(),
        snapshot_length: capture.snapshot_length,
        link_type: capture.link_type,
        time_start: first_ts.and_then(format_millis),
        time_end: last_ts.and_then(format_millis),
        network,
        transport,
        payload_bytes,
    }
}

fn format_millis(millis: u64) -> Option<String> {
    let nanos = i128::from(millis) * 1_000_000;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()?
        .format(&Rfc3339)
        .ok()
}

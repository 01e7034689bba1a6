//! Frame decoding, from the Ethernet header down to the transport layer.
//!
//! Each protocol follows a layered structure:
//! - `layout`: byte offsets and ranges (source of truth)
//! - `parser`: domain-level decoding through [`FrameReader`]
//!
//! Protocol parsers never fail: a header that does not fit makes the caller
//! fall back to a less specific classification. All multi-byte frame fields
//! are network byte order regardless of the capture's header byte order.

pub mod common;
pub mod ethernet;
pub mod ipv4;
pub mod ipv6;
pub mod transport;

use common::FrameReader;
use ethernet::layout::{ETHER_TYPE_ARP, ETHER_TYPE_IPV4, ETHER_TYPE_IPV6};

use crate::{EthernetInfo, NetworkLayer, TransportLayer};

/// Network and transport classification of one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDecode {
    pub network: NetworkLayer,
    pub transport: Option<TransportLayer>,
    pub payload_length: u32,
}

impl NetworkDecode {
    fn without_transport(network: NetworkLayer) -> Self {
        Self {
            network,
            transport: None,
            payload_length: 0,
        }
    }
}

/// Fully decoded frame, ready to be wrapped into a packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    pub ethernet: EthernetInfo,
    pub layers: NetworkDecode,
}

/// Decode a raw Ethernet frame.
///
/// Returns `None` only when the frame is shorter than an Ethernet header.
/// IPv4/IPv6 frames too short for their fixed header are reported as
/// `Unknown` with the original ether type.
pub fn decode_frame(frame: &[u8]) -> Option<DecodedFrame> {
    let reader = FrameReader::new(frame);
    let header = ethernet::parse_ethernet(&reader)?;
    let ether_type = header.info.ether_type;
    let offset = header.network_offset;

    let layers = match ether_type {
        ETHER_TYPE_IPV4 => ipv4::parse_ipv4(&reader, offset),
        ETHER_TYPE_IPV6 => ipv6::parse_ipv6(&reader, offset),
        ETHER_TYPE_ARP => Some(NetworkDecode::without_transport(NetworkLayer::Arp)),
        _ => None,
    }
    .unwrap_or_else(|| NetworkDecode::without_transport(NetworkLayer::Unknown { ether_type }));

    Some(DecodedFrame {
        ethernet: header.info,
        layers,
    })
}

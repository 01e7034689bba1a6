use super::layout;
use crate::protocols::NetworkDecode;
use crate::protocols::common::{FrameReader, format_ipv6};
use crate::protocols::transport::{self, parse_tcp, parse_udp};
use crate::{NetworkLayer, TransportLayer};

/// Decode a fixed IPv6 header at `offset` and the transport header behind it.
///
/// Extension headers are not walked: the next-header value is taken as the
/// transport protocol. Anything other than a complete TCP or UDP header is
/// reported as `Other` with no payload.
pub fn parse_ipv6(reader: &FrameReader<'_>, offset: usize) -> Option<NetworkDecode> {
    if !reader.has(offset, layout::HEADER_LEN) {
        return None;
    }

    let payload_field = u32::from(reader.read_u16_be(offset + layout::PAYLOAD_LENGTH_OFFSET)?);
    let next_header = reader.read_u8(offset + layout::NEXT_HEADER_OFFSET)?;
    let source = reader.read_array::<16>(offset + layout::SOURCE_OFFSET)?;
    let destination = reader.read_array::<16>(offset + layout::DESTINATION_OFFSET)?;

    let transport_offset = offset + layout::HEADER_LEN;
    let decoded: Option<(TransportLayer, u32)> = match next_header {
        transport::layout::PROTOCOL_TCP => parse_tcp(reader, transport_offset)
            .map(|segment| (segment.into(), payload_field.saturating_sub(segment.header_len))),
        transport::layout::PROTOCOL_UDP => parse_udp(reader, transport_offset)
            .map(|datagram| (datagram.into(), datagram.payload_length())),
        _ => None,
    };
    let (transport, payload_length) = decoded.unwrap_or((
        TransportLayer::Other {
            protocol: next_header,
        },
        0,
    ));

    Some(NetworkDecode {
        network: NetworkLayer::Ipv6 {
            source: format_ipv6(&source),
            destination: format_ipv6(&destination),
            next_header,
        },
        transport: Some(transport),
        payload_length,
    })
}

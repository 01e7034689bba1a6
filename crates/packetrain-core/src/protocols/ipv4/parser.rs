use super::layout;
use crate::protocols::NetworkDecode;
use crate::protocols::common::{FrameReader, format_ipv4};
use crate::protocols::transport::{self, parse_tcp, parse_udp};
use crate::{NetworkLayer, TransportLayer};

/// Decode an IPv4 header at `offset` and the transport header behind it.
///
/// Returns `None` when fewer than 20 bytes are available. The header length
/// field is trusted as-is; TCP or UDP headers that do not fit are reported as
/// `Other` with the generic 8-byte header assumption.
pub fn parse_ipv4(reader: &FrameReader<'_>, offset: usize) -> Option<NetworkDecode> {
    if !reader.has(offset, layout::MIN_HEADER_LEN) {
        return None;
    }

    let version_ihl = reader.read_u8(offset + layout::VERSION_IHL_OFFSET)?;
    let header_len = u32::from(version_ihl & layout::IHL_MASK) * 4;
    let total_length = u32::from(reader.read_u16_be(offset + layout::TOTAL_LENGTH_OFFSET)?);
    let ttl = reader.read_u8(offset + layout::TTL_OFFSET)?;
    let protocol = reader.read_u8(offset + layout::PROTOCOL_OFFSET)?;
    let source = reader.read_array::<4>(offset + layout::SOURCE_OFFSET)?;
    let destination = reader.read_array::<4>(offset + layout::DESTINATION_OFFSET)?;

    let transport_offset = offset + header_len as usize;
    let ip_payload = total_length.saturating_sub(header_len);
    let decoded: Option<(TransportLayer, u32)> = match protocol {
        transport::layout::PROTOCOL_TCP => parse_tcp(reader, transport_offset)
            .map(|segment| (segment.into(), ip_payload.saturating_sub(segment.header_len))),
        transport::layout::PROTOCOL_UDP => parse_udp(reader, transport_offset)
            .map(|datagram| (datagram.into(), datagram.payload_length())),
        transport::layout::PROTOCOL_ICMP => Some((
            TransportLayer::Icmp,
            ip_payload.saturating_sub(transport::layout::GENERIC_HEADER_LEN),
        )),
        _ => None,
    };
    let (transport, payload_length) = decoded.unwrap_or((
        TransportLayer::Other { protocol },
        ip_payload.saturating_sub(transport::layout::GENERIC_HEADER_LEN),
    ));

    Some(NetworkDecode {
        network: NetworkLayer::Ipv4 {
            source: format_ipv4(&source),
            destination: format_ipv4(&destination),
            ttl,
            protocol,
        },
        transport: Some(transport),
        payload_length,
    })
}

#[cfg(test)]
mod tests {
    use super::parse_ipv4;
    use crate::protocols::common::FrameReader;
    use crate::{NetworkLayer, TcpFlags, TransportLayer};

    fn header(total_length: u16, protocol: u8) -> Vec<u8> {
        let mut bytes = vec![0x45, 0x00];
        bytes.extend_from_slice(&total_length.to_be_bytes());
        bytes.extend_from_slice(&[0, 0, 0, 0, 64, protocol, 0, 0]);
        bytes.extend_from_slice(&[10, 0, 0, 1, 10, 0, 0, 2]);
        bytes
    }

    #[test]
    fn parse_tcp_without_payload() {
        let mut bytes = header(40, 6);
        bytes.extend_from_slice(&[0x04, 0xd2, 0x00, 0x50, 0, 0, 0, 0, 0, 0, 0, 0, 0x50, 0x12]);
        bytes.extend_from_slice(&[0; 6]);

        let decoded = parse_ipv4(&FrameReader::new(&bytes), 0).unwrap();
        assert_eq!(
            decoded.network,
            NetworkLayer::Ipv4 {
                source: "10.0.0.1".to_string(),
                destination: "10.0.0.2".to_string(),
                ttl: 64,
                protocol: 6,
            }
        );
        assert_eq!(
            decoded.transport,
            Some(TransportLayer::Tcp {
                source_port: 1234,
                destination_port: 80,
                flags: TcpFlags::new(TcpFlags::SYN | TcpFlags::ACK),
            })
        );
        assert_eq!(decoded.payload_length, 0);
    }

    #[test]
    fn parse_icmp_payload() {
        let mut bytes = header(84, 1);
        bytes.extend_from_slice(&[8, 0, 0, 0, 0, 0, 0, 0]);
        let decoded = parse_ipv4(&FrameReader::new(&bytes), 0).unwrap();
        assert_eq!(decoded.transport, Some(TransportLayer::Icmp));
        assert_eq!(decoded.payload_length, 56);
    }

    #[test]
    fn truncated_tcp_becomes_other() {
        let mut bytes = header(60, 6);
        bytes.extend_from_slice(&[0; 10]);
        let decoded = parse_ipv4(&FrameReader::new(&bytes), 0).unwrap();
        assert_eq!(decoded.transport, Some(TransportLayer::Other { protocol: 6 }));
        assert_eq!(decoded.payload_length, 32);
    }

    #[test]
    fn unknown_protocol_uses_generic_header() {
        let bytes = header(30, 47);
        let decoded = parse_ipv4(&FrameReader::new(&bytes), 0).unwrap();
        assert_eq!(decoded.transport, Some(TransportLayer::Other { protocol: 47 }));
        assert_eq!(decoded.payload_length, 2);
    }

    #[test]
    fn bogus_total_length_clamps_to_zero() {
        let bytes = header(4, 47);
        let decoded = parse_ipv4(&FrameReader::new(&bytes), 0).unwrap();
        assert_eq!(decoded.payload_length, 0);
    }

    #[test]
    fn short_header() {
        let bytes = header(20, 6);
        assert!(parse_ipv4(&FrameReader::new(&bytes[..19]), 0).is_none());
    }
}

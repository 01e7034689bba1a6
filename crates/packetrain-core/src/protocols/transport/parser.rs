use super::layout;
use crate::protocols::common::FrameReader;
use crate::{TcpFlags, TransportLayer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpSegment {
    pub source_port: u16,
    pub destination_port: u16,
    /// Header length in bytes (data offset nibble × 4).
    pub header_len: u32,
    pub flags: TcpFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpDatagram {
    pub source_port: u16,
    pub destination_port: u16,
    /// Length field: header plus payload.
    pub length: u16,
}

impl UdpDatagram {
    pub fn payload_length(&self) -> u32 {
        u32::from(self.length).saturating_sub(layout::UDP_HEADER_LEN as u32)
    }
}

impl From<TcpSegment> for TransportLayer {
    fn from(segment: TcpSegment) -> Self {
        TransportLayer::Tcp {
            source_port: segment.source_port,
            destination_port: segment.destination_port,
            flags: segment.flags,
        }
    }
}

impl From<UdpDatagram> for TransportLayer {
    fn from(datagram: UdpDatagram) -> Self {
        TransportLayer::Udp {
            source_port: datagram.source_port,
            destination_port: datagram.destination_port,
        }
    }
}

/// Parse a TCP header at `offset`; `None` unless a full 20-byte header fits.
pub fn parse_tcp(reader: &FrameReader<'_>, offset: usize) -> Option<TcpSegment> {
    if !reader.has(offset, layout::TCP_MIN_HEADER_LEN) {
        return None;
    }
    let data_offset = reader.read_u8(offset + layout::TCP_DATA_OFFSET_OFFSET)?;
    let flags = reader.read_u8(offset + layout::TCP_FLAGS_OFFSET)?;
    Some(TcpSegment {
        source_port: reader.read_u16_be(offset + layout::SOURCE_PORT_OFFSET)?,
        destination_port: reader.read_u16_be(offset + layout::DEST_PORT_OFFSET)?,
        header_len: u32::from(data_offset >> 4) * 4,
        flags: TcpFlags::new(flags),
    })
}

/// Parse a UDP header at `offset`; `None` unless the 8-byte header fits.
pub fn parse_udp(reader: &FrameReader<'_>, offset: usize) -> Option<UdpDatagram> {
    if !reader.has(offset, layout::UDP_HEADER_LEN) {
        return None;
    }
    Some(UdpDatagram {
        source_port: reader.read_u16_be(offset + layout::SOURCE_PORT_OFFSET)?,
        destination_port: reader.read_u16_be(offset + layout::DEST_PORT_OFFSET)?,
        length: reader.read_u16_be(offset + layout::UDP_LENGTH_OFFSET)?,
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_tcp, parse_udp};
    use crate::TcpFlags;
    use crate::protocols::common::FrameReader;

    #[test]
    fn parse_tcp_header() {
        let mut bytes = vec![0xff; 2];
        bytes.extend_from_slice(&[
            0xc6, 0xb7, // source port 50871
            0x00, 0x50, // destination port 80
            0, 0, 0, 1, // sequence
            0, 0, 0, 2, // acknowledgement
            0x80, // data offset 8 words
            0xd2, // reserved bits + ACK|SYN
            0, 0, 0, 0, 0, 0,
        ]);
        let segment = parse_tcp(&FrameReader::new(&bytes), 2).unwrap();
        assert_eq!(segment.source_port, 50871);
        assert_eq!(segment.destination_port, 80);
        assert_eq!(segment.header_len, 32);
        assert_eq!(segment.flags, TcpFlags::new(TcpFlags::ACK | TcpFlags::SYN));
    }

    #[test]
    fn parse_tcp_needs_full_header() {
        let bytes = [0u8; 19];
        assert!(parse_tcp(&FrameReader::new(&bytes), 0).is_none());
    }

    #[test]
    fn parse_udp_header() {
        let bytes = [0x17, 0x70, 0x00, 0x35, 0x00, 0x10, 0x00, 0x00];
        let datagram = parse_udp(&FrameReader::new(&bytes), 0).unwrap();
        assert_eq!(datagram.source_port, 6000);
        assert_eq!(datagram.destination_port, 53);
        assert_eq!(datagram.payload_length(), 8);
    }

    #[test]
    fn udp_payload_length_floors_at_zero() {
        let bytes = [0, 1, 0, 2, 0x00, 0x04, 0, 0];
        let datagram = parse_udp(&FrameReader::new(&bytes), 0).unwrap();
        assert_eq!(datagram.payload_length(), 0);
    }

    #[test]
    fn parse_udp_needs_full_header() {
        let bytes = [0u8; 7];
        assert!(parse_udp(&FrameReader::new(&bytes), 0).is_none());
    }
}

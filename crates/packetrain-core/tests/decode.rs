use etherparse::PacketBuilder;
use packetrain_core::{
    Endianness, FormatError, NetworkLayer, SequentialIds, TcpFlags, TransportLayer, decode,
};

const SRC_MAC: [u8; 6] = [0x00, 0x1b, 0x21, 0x3a, 0x4f, 0x5e];
const DST_MAC: [u8; 6] = [0xf0, 0x9f, 0xc2, 0x10, 0x0a, 0x01];

struct Record<'a> {
    seconds: u32,
    micros: u32,
    frame: &'a [u8],
}

fn global_header(little_endian: bool) -> Vec<u8> {
    let fields: [(u32, usize); 6] = [
        (0xa1b2_c3d4, 4),
        (2, 2),
        (4, 2),
        (0, 4),
        (0, 4),
        (65535, 4),
    ];
    let mut bytes = Vec::new();
    for (value, width) in fields {
        push(&mut bytes, value, width, little_endian);
    }
    push(&mut bytes, 1, 4, little_endian);
    bytes
}

fn push(bytes: &mut Vec<u8>, value: u32, width: usize, little_endian: bool) {
    let encoded = if little_endian {
        value.to_le_bytes()
    } else {
        value.to_be_bytes()
    };
    if little_endian {
        bytes.extend_from_slice(&encoded[..width]);
    } else {
        bytes.extend_from_slice(&encoded[4 - width..]);
    }
}

fn capture(records: &[Record<'_>], little_endian: bool) -> Vec<u8> {
    let mut bytes = global_header(little_endian);
    for record in records {
        push(&mut bytes, record.seconds, 4, little_endian);
        push(&mut bytes, record.micros, 4, little_endian);
        push(&mut bytes, record.frame.len() as u32, 4, little_endian);
        push(&mut bytes, record.frame.len() as u32, 4, little_endian);
        bytes.extend_from_slice(record.frame);
    }
    bytes
}

fn tcp_frame(payload: &[u8]) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2(SRC_MAC, DST_MAC)
        .ipv4([192, 168, 1, 10], [93, 184, 216, 34], 57)
        .tcp(50871, 443, 1, 64240)
        .syn()
        .ack(7);
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut frame, payload).unwrap();
    frame
}

fn udp_frame(payload: &[u8]) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2(SRC_MAC, DST_MAC)
        .ipv4([10, 0, 0, 1], [10, 0, 0, 2], 64)
        .udp(6454, 53);
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut frame, payload).unwrap();
    frame
}

fn ipv6_udp_frame(payload: &[u8]) -> Vec<u8> {
    let mut source = [0u8; 16];
    source[..4].copy_from_slice(&[0x20, 0x01, 0x0d, 0xb8]);
    source[15] = 0x01;
    let mut destination = [0u8; 16];
    destination[..2].copy_from_slice(&[0xff, 0x02]);
    destination[15] = 0xfb;
    let builder = PacketBuilder::ethernet2(SRC_MAC, DST_MAC)
        .ipv6(source, destination, 255)
        .udp(5353, 5353);
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut frame, payload).unwrap();
    frame
}

fn vlan_tagged(frame: &[u8], vlan_id: u16) -> Vec<u8> {
    let mut tagged = frame[..12].to_vec();
    tagged.extend_from_slice(&0x8100u16.to_be_bytes());
    tagged.extend_from_slice(&vlan_id.to_be_bytes());
    tagged.extend_from_slice(&frame[12..]);
    tagged
}

#[test]
fn tcp_fields_round_trip() {
    let frame = tcp_frame(&[]);
    let buffer = capture(
        &[Record {
            seconds: 1_700_000_000,
            micros: 123_456,
            frame: &frame,
        }],
        true,
    );

    let capture = decode(&buffer, 100, &mut SequentialIds::new("t")).unwrap();
    assert_eq!(capture.endianness, Endianness::Little);
    let packet = &capture.packets[0];
    assert_eq!(packet.id, "t0");
    assert_eq!(packet.timestamp_millis, 1_700_000_000_123);
    assert_eq!(packet.ethernet.source_mac, "00:1b:21:3a:4f:5e");
    assert_eq!(packet.ethernet.dest_mac, "f0:9f:c2:10:0a:01");
    assert_eq!(packet.ethernet.ether_type, 0x0800);
    assert_eq!(
        packet.network,
        NetworkLayer::Ipv4 {
            source: "192.168.1.10".to_string(),
            destination: "93.184.216.34".to_string(),
            ttl: 57,
            protocol: 6,
        }
    );
    assert_eq!(
        packet.transport,
        Some(TransportLayer::Tcp {
            source_port: 50871,
            destination_port: 443,
            flags: TcpFlags::new(TcpFlags::SYN | TcpFlags::ACK),
        })
    );
    assert_eq!(packet.payload_length, 0);
    assert_eq!(packet.captured_size, 54);
    assert_eq!(packet.original_size, 54);
}

#[test]
fn tcp_payload_length_counts_data_bytes() {
    let frame = tcp_frame(&[0xab; 100]);
    let buffer = capture(
        &[Record {
            seconds: 1,
            micros: 0,
            frame: &frame,
        }],
        false,
    );
    let capture = decode(&buffer, 100, &mut SequentialIds::new("t")).unwrap();
    assert_eq!(capture.endianness, Endianness::Big);
    assert_eq!(capture.packets[0].payload_length, 100);
}

#[test]
fn udp_payload_lengths() {
    let empty = udp_frame(&[]);
    let eight = udp_frame(&[1, 2, 3, 4, 5, 6, 7, 8]);
    let buffer = capture(
        &[
            Record {
                seconds: 1,
                micros: 0,
                frame: &empty,
            },
            Record {
                seconds: 2,
                micros: 0,
                frame: &eight,
            },
        ],
        true,
    );

    let capture = decode(&buffer, 100, &mut SequentialIds::new("u")).unwrap();
    assert_eq!(capture.packets.len(), 2);
    assert_eq!(capture.packets[0].payload_length, 0);
    assert_eq!(capture.packets[1].payload_length, 8);
    assert_eq!(
        capture.packets[1].transport,
        Some(TransportLayer::Udp {
            source_port: 6454,
            destination_port: 53,
        })
    );
}

#[test]
fn ipv6_addresses_are_compressed() {
    let frame = ipv6_udp_frame(&[0; 12]);
    let buffer = capture(
        &[Record {
            seconds: 1,
            micros: 0,
            frame: &frame,
        }],
        true,
    );
    let capture = decode(&buffer, 100, &mut SequentialIds::new("v")).unwrap();
    let packet = &capture.packets[0];
    assert_eq!(
        packet.network,
        NetworkLayer::Ipv6 {
            source: "2001:db8::1".to_string(),
            destination: "ff02::fb".to_string(),
            next_header: 17,
        }
    );
    assert_eq!(packet.payload_length, 12);
}

#[test]
fn vlan_tag_is_unwrapped() {
    let frame = vlan_tagged(&udp_frame(&[0; 4]), 42);
    let buffer = capture(
        &[Record {
            seconds: 1,
            micros: 0,
            frame: &frame,
        }],
        true,
    );
    let capture = decode(&buffer, 100, &mut SequentialIds::new("q")).unwrap();
    let packet = &capture.packets[0];
    assert_eq!(packet.ethernet.ether_type, 0x0800);
    assert_eq!(packet.ethernet.vlan, Some(42));
    assert!(matches!(
        packet.network,
        NetworkLayer::Ipv4 { ref source, .. } if source == "10.0.0.1"
    ));
    assert_eq!(packet.transport.as_ref().and_then(|t| t.ports()), Some((6454, 53)));
    assert_eq!(packet.payload_length, 4);
}

#[test]
fn records_beyond_cap_are_ignored() {
    let frame = udp_frame(&[]);
    let records: Vec<Record<'_>> = (0..10)
        .map(|seconds| Record {
            seconds,
            micros: 0,
            frame: &frame,
        })
        .collect();
    let buffer = capture(&records, true);

    let all = decode(&buffer, 100, &mut SequentialIds::new("a")).unwrap();
    assert_eq!(all.packets.len(), 10);
    let timestamps: Vec<u64> = all.packets.iter().map(|p| p.timestamp_millis).collect();
    assert_eq!(timestamps, (0..10).map(|s| s * 1000).collect::<Vec<u64>>());

    let capped = decode(&buffer, 4, &mut SequentialIds::new("c")).unwrap();
    assert_eq!(capped.packets.len(), 4);
    for (capped, full) in capped.packets.iter().zip(&all.packets) {
        assert_eq!(capped.timestamp_millis, full.timestamp_millis);
        assert_eq!(capped.network, full.network);
    }
}

#[test]
fn truncated_tail_keeps_earlier_packets() {
    let frame = tcp_frame(&[1, 2, 3]);
    let mut buffer = capture(
        &[
            Record {
                seconds: 1,
                micros: 0,
                frame: &frame,
            },
            Record {
                seconds: 2,
                micros: 0,
                frame: &frame,
            },
        ],
        true,
    );
    buffer.truncate(buffer.len() - 1);

    let capture = decode(&buffer, 100, &mut SequentialIds::new("t")).unwrap();
    assert_eq!(capture.packets.len(), 1);
    assert_eq!(capture.packets[0].payload_length, 3);
}

#[test]
fn decode_leaves_buffer_untouched() {
    let frame = udp_frame(&[9; 3]);
    let buffer = capture(
        &[Record {
            seconds: 1,
            micros: 0,
            frame: &frame,
        }],
        true,
    );
    let before = buffer.clone();
    let _ = decode(&buffer, 100, &mut SequentialIds::new("x")).unwrap();
    assert_eq!(buffer, before);
}

#[test]
fn rejects_non_capture_input() {
    let err = decode(&[0u8; 10], 100, &mut SequentialIds::new("e")).unwrap_err();
    assert!(matches!(err, FormatError::TooShort { .. }));

    let mut pcapng = vec![0x0a, 0x0d, 0x0d, 0x0a];
    pcapng.extend_from_slice(&[0; 28]);
    let err = decode(&pcapng, 100, &mut SequentialIds::new("e")).unwrap_err();
    assert!(matches!(err, FormatError::UnrecognizedMagic { magic: 0x0a0d0d0a }));
}

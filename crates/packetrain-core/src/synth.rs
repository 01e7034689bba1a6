//! Synthetic packets for when no capture is available.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::ids::IdGenerator;
use crate::{EthernetInfo, NetworkLayer, Packet, TcpFlags, TransportLayer};

/// Number of synthetic packets used as a fallback display set.
pub const DEFAULT_SYNTH_PACKETS: usize = 20;

const SOURCE_MAC: &str = "aa:bb:cc:dd:ee:ff";
const DEST_MAC: &str = "11:22:33:44:55:66";
const IPV4_SHARE: f64 = 0.7;
const TCP_PORTS: [u16; 5] = [80, 443, 22, 53, 8080];
const UDP_PORTS: [u16; 4] = [80, 443, 53, 123];
/// Ethernet + IPv4 + TCP header bytes assumed by the payload estimate.
const HEADER_OVERHEAD: u32 = 54;

/// Generate `count` plausible packets stamped with `timestamp_millis`.
///
/// Roughly 70% are IPv4 and the rest IPv6; transports are split between TCP
/// (random flags) and UDP with well-known destination ports.
///
/// # Examples
/// ```
/// use packetrain_core::{SequentialIds, synthesize};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let packets = synthesize(5, 0, &mut rng, &mut SequentialIds::new("s"));
/// assert_eq!(packets.len(), 5);
/// assert!(packets.iter().all(|p| p.transport.is_some()));
/// ```
pub fn synthesize<R, G>(
    count: usize,
    timestamp_millis: u64,
    rng: &mut R,
    ids: &mut G,
) -> Vec<Packet>
where
    R: Rng + ?Sized,
    G: IdGenerator + ?Sized,
{
    (0..count)
        .map(|_| synthesize_one(timestamp_millis, rng, ids))
        .collect()
}

fn synthesize_one<R, G>(timestamp_millis: u64, rng: &mut R, ids: &mut G) -> Packet
where
    R: Rng + ?Sized,
    G: IdGenerator + ?Sized,
{
    let ipv4 = rng.gen_bool(IPV4_SHARE);
    let size = rng.gen_range(64..=900u32);
    let source_port = rng.gen_range(1000..=65535u16);

    let (protocol, transport) = if rng.gen_bool(0.5) {
        (
            6,
            TransportLayer::Tcp {
                source_port,
                destination_port: pick(rng, &TCP_PORTS),
                flags: TcpFlags::new(rng.gen_range(0..=TcpFlags::MASK)),
            },
        )
    } else {
        (
            17,
            TransportLayer::Udp {
                source_port,
                destination_port: pick(rng, &UDP_PORTS),
            },
        )
    };

    let (ether_type, network) = if ipv4 {
        let source = format!("10.0.{}.{}", rng.gen_range(0..=255u8), rng.gen_range(1..=254u8));
        let destination = format!(
            "192.168.{}.{}",
            rng.gen_range(0..=255u8),
            rng.gen_range(1..=254u8)
        );
        (
            0x0800,
            NetworkLayer::Ipv4 {
                source,
                destination,
                ttl: 64,
                protocol,
            },
        )
    } else {
        (
            0x86dd,
            NetworkLayer::Ipv6 {
                source: "2001:db8::1".to_string(),
                destination: "2001:db8::2".to_string(),
                next_header: protocol,
            },
        )
    };

    Packet {
        id: ids.next_id(),
        timestamp_millis,
        ethernet: EthernetInfo {
            source_mac: SOURCE_MAC.to_string(),
            dest_mac: DEST_MAC.to_string(),
            ether_type,
            vlan: None,
        },
        network,
        transport: Some(transport),
        captured_size: size,
        original_size: size,
        payload_length: size.saturating_sub(HEADER_OVERHEAD),
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, ports: &[u16]) -> u16 {
    ports.choose(rng).copied().unwrap_or_default()
}

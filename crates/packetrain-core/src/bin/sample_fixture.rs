use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const PCAP_MAGIC: u32 = 0xa1b2_c3d4;
const PCAP_VERSION_MAJOR: u16 = 2;
const PCAP_VERSION_MINOR: u16 = 4;
const PCAP_SNAPLEN: u32 = 65535;
const LINKTYPE_ETHERNET: u32 = 1;

const ETHERTYPE_IPV4: u16 = 0x0800;
const ETHERTYPE_ARP: u16 = 0x0806;
const ETHERTYPE_VLAN: u16 = 0x8100;
const ETHERTYPE_IPV6: u16 = 0x86dd;
const ETHERTYPE_LLDP: u16 = 0x88cc;
const PROTO_ICMP: u8 = 1;
const PROTO_TCP: u8 = 6;
const PROTO_UDP: u8 = 17;

const TCP_SYN: u8 = 0x02;
const TCP_ACK: u8 = 0x10;
const TCP_PSH: u8 = 0x08;
const TCP_FIN: u8 = 0x01;

const BASE_TS_SECONDS: u32 = 1_700_000_000;

fn main() -> ExitCode {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("pcaps").join("sample.pcap"));
    if let Err(err) = write_sample(&path) {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn write_sample(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create {}: {}", parent.display(), err))?;
        }
    }

    let frames = vec![
        build_tcp_v4("10.0.0.1", "93.184.216.34", 50871, 443, TCP_SYN, &[]),
        build_tcp_v4("93.184.216.34", "10.0.0.1", 443, 50871, TCP_SYN | TCP_ACK, &[]),
        build_tcp_v4("10.0.0.1", "93.184.216.34", 50871, 443, TCP_ACK | TCP_PSH, &[0x16; 64]),
        build_udp_v4("10.0.0.1", "8.8.8.8", 53124, 53, &[0xab; 32]),
        build_icmp_v4("10.0.0.1", "1.1.1.1", &[0x42; 56]),
        build_udp_v6(5353, 5353, &[0x00; 24]),
        build_arp(),
        vlan_tag(&build_udp_v4("172.16.0.5", "172.16.0.1", 6454, 6454, &[0x01; 18]), 100),
        build_ethernet(ETHERTYPE_LLDP, &[0x02; 32]),
        build_tcp_v4("10.0.0.1", "93.184.216.34", 50871, 443, TCP_FIN | TCP_ACK, &[]),
    ];

    let mut output = Vec::new();
    write_global_header(&mut output);
    for (idx, frame) in frames.iter().enumerate() {
        let micros = (idx as u32) * 125_000;
        write_record(&mut output, BASE_TS_SECONDS, micros, frame);
    }

    fs::write(path, output).map_err(|err| format!("failed to write {}: {}", path.display(), err))?;
    eprintln!("OK: sample written -> {}", path.display());
    Ok(())
}

fn write_global_header(output: &mut Vec<u8>) {
    output.extend_from_slice(&PCAP_MAGIC.to_le_bytes());
    output.extend_from_slice(&PCAP_VERSION_MAJOR.to_le_bytes());
    output.extend_from_slice(&PCAP_VERSION_MINOR.to_le_bytes());
    output.extend_from_slice(&0i32.to_le_bytes());
    output.extend_from_slice(&0u32.to_le_bytes());
    output.extend_from_slice(&PCAP_SNAPLEN.to_le_bytes());
    output.extend_from_slice(&LINKTYPE_ETHERNET.to_le_bytes());
}

fn write_record(output: &mut Vec<u8>, seconds: u32, micros: u32, frame: &[u8]) {
    let len = frame.len() as u32;
    output.extend_from_slice(&seconds.to_le_bytes());
    output.extend_from_slice(&micros.to_le_bytes());
    output.extend_from_slice(&len.to_le_bytes());
    output.extend_from_slice(&len.to_le_bytes());
    output.extend_from_slice(frame);
}

fn build_ethernet(ether_type: u16, body: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(14 + body.len());
    frame.extend_from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
    frame.extend_from_slice(&[0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f]);
    frame.extend_from_slice(&ether_type.to_be_bytes());
    frame.extend_from_slice(body);
    frame
}

fn vlan_tag(frame: &[u8], vlan_id: u16) -> Vec<u8> {
    let mut tagged = frame[..12].to_vec();
    tagged.extend_from_slice(&ETHERTYPE_VLAN.to_be_bytes());
    tagged.extend_from_slice(&vlan_id.to_be_bytes());
    tagged.extend_from_slice(&frame[12..]);
    tagged
}

fn build_arp() -> Vec<u8> {
    let mut body = vec![0x00, 0x01, 0x08, 0x00, 6, 4, 0x00, 0x01];
    body.extend_from_slice(&[0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f]);
    body.extend_from_slice(&parse_ipv4("10.0.0.1"));
    body.extend_from_slice(&[0; 6]);
    body.extend_from_slice(&parse_ipv4("10.0.0.254"));
    build_ethernet(ETHERTYPE_ARP, &body)
}

fn build_ipv4(src_ip: &str, dst_ip: &str, protocol: u8, transport: &[u8]) -> Vec<u8> {
    let total_len = 20u16 + transport.len() as u16;
    let mut ip_header = [0u8; 20];
    ip_header[0] = 0x45;
    ip_header[2..4].copy_from_slice(&total_len.to_be_bytes());
    ip_header[8] = 64;
    ip_header[9] = protocol;
    ip_header[12..16].copy_from_slice(&parse_ipv4(src_ip));
    ip_header[16..20].copy_from_slice(&parse_ipv4(dst_ip));
    let checksum = ipv4_checksum(&ip_header);
    ip_header[10..12].copy_from_slice(&checksum.to_be_bytes());

    let mut body = ip_header.to_vec();
    body.extend_from_slice(transport);
    build_ethernet(ETHERTYPE_IPV4, &body)
}

fn tcp_segment(src_port: u16, dst_port: u16, flags: u8, payload: &[u8]) -> Vec<u8> {
    let mut segment = Vec::with_capacity(20 + payload.len());
    segment.extend_from_slice(&src_port.to_be_bytes());
    segment.extend_from_slice(&dst_port.to_be_bytes());
    segment.extend_from_slice(&1u32.to_be_bytes());
    segment.extend_from_slice(&0u32.to_be_bytes());
    segment.push(0x50);
    segment.push(flags);
    segment.extend_from_slice(&64240u16.to_be_bytes());
    segment.extend_from_slice(&[0; 4]);
    segment.extend_from_slice(payload);
    segment
}

fn udp_datagram(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let udp_len = 8u16 + payload.len() as u16;
    let mut datagram = Vec::with_capacity(udp_len as usize);
    datagram.extend_from_slice(&src_port.to_be_bytes());
    datagram.extend_from_slice(&dst_port.to_be_bytes());
    datagram.extend_from_slice(&udp_len.to_be_bytes());
    datagram.extend_from_slice(&0u16.to_be_bytes());
    datagram.extend_from_slice(payload);
    datagram
}

fn build_tcp_v4(
    src_ip: &str,
    dst_ip: &str,
    src_port: u16,
    dst_port: u16,
    flags: u8,
    payload: &[u8],
) -> Vec<u8> {
    build_ipv4(src_ip, dst_ip, PROTO_TCP, &tcp_segment(src_port, dst_port, flags, payload))
}

fn build_udp_v4(src_ip: &str, dst_ip: &str, src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    build_ipv4(src_ip, dst_ip, PROTO_UDP, &udp_datagram(src_port, dst_port, payload))
}

fn build_icmp_v4(src_ip: &str, dst_ip: &str, payload: &[u8]) -> Vec<u8> {
    let mut message = vec![8, 0, 0, 0, 0, 1, 0, 1];
    message.extend_from_slice(payload);
    build_ipv4(src_ip, dst_ip, PROTO_ICMP, &message)
}

fn build_udp_v6(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let datagram = udp_datagram(src_port, dst_port, payload);
    let mut header = vec![0x60, 0, 0, 0];
    header.extend_from_slice(&(datagram.len() as u16).to_be_bytes());
    header.push(PROTO_UDP);
    header.push(255);
    header.extend_from_slice(&[0xfe, 0x80, 0, 0, 0, 0, 0, 0, 0x02, 0x1a, 0x2b, 0xff, 0xfe, 0x3c, 0x4d, 0x5e]);
    header.extend_from_slice(&[0xff, 0x02, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xfb]);
    header.extend_from_slice(&datagram);
    build_ethernet(ETHERTYPE_IPV6, &header)
}

fn parse_ipv4(ip: &str) -> [u8; 4] {
    let mut out = [0u8; 4];
    for (idx, part) in ip.split('.').enumerate().take(4) {
        out[idx] = part.parse::<u8>().unwrap_or(0);
    }
    out
}

fn ipv4_checksum(header: &[u8; 20]) -> u16 {
    let mut sum = 0u32;
    for chunk in header.chunks(2) {
        let part = u16::from_be_bytes([chunk[0], chunk[1]]) as u32;
        sum = sum.wrapping_add(part);
    }
    while (sum >> 16) != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    !(sum as u16)
}

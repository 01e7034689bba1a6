//! TCP and UDP header decoding shared by the IPv4 and IPv6 paths.

pub mod layout;
pub mod parser;

pub use parser::{TcpSegment, UdpDatagram, parse_tcp, parse_udp};

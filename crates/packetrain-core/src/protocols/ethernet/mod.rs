//! Ethernet II framing with single 802.1Q tag unwrapping.

pub mod layout;
pub mod parser;

pub use parser::{EthernetHeader, parse_ethernet};

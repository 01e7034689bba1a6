pub const PROTOCOL_ICMP: u8 = 1;
pub const PROTOCOL_TCP: u8 = 6;
pub const PROTOCOL_UDP: u8 = 17;

pub const SOURCE_PORT_OFFSET: usize = 0;
pub const DEST_PORT_OFFSET: usize = 2;

pub const TCP_MIN_HEADER_LEN: usize = 20;
pub const TCP_DATA_OFFSET_OFFSET: usize = 12;
pub const TCP_FLAGS_OFFSET: usize = 13;

pub const UDP_HEADER_LEN: usize = 8;
pub const UDP_LENGTH_OFFSET: usize = 4;

/// Header size assumed for ICMP and unrecognized protocols.
pub const GENERIC_HEADER_LEN: u32 = 8;

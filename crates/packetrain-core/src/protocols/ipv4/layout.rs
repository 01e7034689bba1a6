pub const MIN_HEADER_LEN: usize = 20;
pub const VERSION_IHL_OFFSET: usize = 0;
pub const IHL_MASK: u8 = 0x0f;
pub const TOTAL_LENGTH_OFFSET: usize = 2;
pub const TTL_OFFSET: usize = 8;
pub const PROTOCOL_OFFSET: usize = 9;
pub const SOURCE_OFFSET: usize = 12;
pub const DESTINATION_OFFSET: usize = 16;

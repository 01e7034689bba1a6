pub const HEADER_LEN: usize = 40;
pub const PAYLOAD_LENGTH_OFFSET: usize = 4;
pub const NEXT_HEADER_OFFSET: usize = 6;
pub const SOURCE_OFFSET: usize = 8;
pub const DESTINATION_OFFSET: usize = 24;

use std::ops::Range;

pub const MAGIC_MICROSECONDS: u32 = 0xa1b2_c3d4;
pub const MAGIC_NANOSECONDS: u32 = 0xa1b2_3c4d;

pub const GLOBAL_HEADER_LEN: usize = 24;
pub const MAGIC_RANGE: Range<usize> = 0..4;

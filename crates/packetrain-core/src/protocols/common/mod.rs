pub mod format;
pub mod reader;

pub use format::{format_ipv4, format_ipv6, format_mac};
pub use reader::FrameReader;

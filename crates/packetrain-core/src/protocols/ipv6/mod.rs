pub mod layout;
pub mod parser;

pub use parser::parse_ipv6;

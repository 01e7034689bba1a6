use std::fmt::Write;

/// Format a MAC address as lowercase colon-separated hex.
///
/// # Examples
/// This helper is part of an internal module, so the example is marked as
/// text example.
/// ```text
/// assert_eq!(format_mac(&[0xaa, 0xbb, 0xcc, 0x00, 0x01, 0x02]), "aa:bb:cc:00:01:02");
/// ```
pub fn format_mac(bytes: &[u8; 6]) -> String {
    let mut out = String::with_capacity(17);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(':');
        }
        let _ = write!(out, "{byte:02x}");
    }
    out
}

pub fn format_ipv4(bytes: &[u8; 4]) -> String {
    format!("{}.{}.{}.{}", bytes[0], bytes[1], bytes[2], bytes[3])
}

/// Format an IPv6 address as eight unpadded lowercase hex groups.
///
/// Only the leftmost run of two or more zero groups is collapsed to `::`; a
/// lone zero group stays as `0` and later, longer runs are left expanded.
///
/// # Examples
/// This helper is part of an internal module, so the example is marked as
/// text example.
/// ```text
/// let mut addr = [0u8; 16];
/// addr[0] = 0x20;
/// addr[1] = 0x01;
/// addr[15] = 0x01;
/// assert_eq!(format_ipv6(&addr), "2001::1");
/// ```
pub fn format_ipv6(bytes: &[u8; 16]) -> String {
    let groups: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();

    let hex = |groups: &[u16]| {
        groups
            .iter()
            .map(|group| format!("{group:x}"))
            .collect::<Vec<_>>()
            .join(":")
    };

    match leftmost_zero_run(&groups) {
        Some((start, end)) => format!("{}::{}", hex(&groups[..start]), hex(&groups[end..])),
        None => hex(&groups),
    }
}

/// Half-open range of the first run of at least two zero groups.
fn leftmost_zero_run(groups: &[u16]) -> Option<(usize, usize)> {
    let mut start = 0;
    while start < groups.len() {
        if groups[start] != 0 {
            start += 1;
            continue;
        }
        let end = groups[start..]
            .iter()
            .position(|group| *group != 0)
            .map_or(groups.len(), |len| start + len);
        if end - start >= 2 {
            return Some((start, end));
        }
        start = end;
    }
    None
}

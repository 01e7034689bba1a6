use pcap_parser::pcap::parse_pcap_header;

use super::error::FormatError;
use super::layout;
use crate::{Endianness, TimestampResolution, Version};

/// Global header fields, in the capture's own byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalHeader {
    pub version: Version,
    pub snapshot_length: u32,
    pub link_type: u32,
    pub endianness: Endianness,
    pub resolution: TimestampResolution,
}

/// Accept only the standard and nanosecond magics, in either byte order.
///
/// `pcap_parser` also understands the modified (Kuznetzov) format; that
/// variant has a different record layout and is rejected here.
///
/// # Errors
/// Returns `FormatError::TooShort` when fewer than four bytes are available and
/// `FormatError::UnrecognizedMagic` when neither byte order yields a known
/// magic number.
pub fn check_magic(bytes: &[u8]) -> Result<(), FormatError> {
    let magic: [u8; 4] = bytes
        .get(layout::MAGIC_RANGE)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(FormatError::TooShort {
            needed: layout::MAGIC_RANGE.end,
            actual: bytes.len(),
        })?;

    let known = |value: u32| {
        value == layout::MAGIC_MICROSECONDS || value == layout::MAGIC_NANOSECONDS
    };
    if known(u32::from_le_bytes(magic)) || known(u32::from_be_bytes(magic)) {
        Ok(())
    } else {
        Err(FormatError::UnrecognizedMagic {
            magic: u32::from_be_bytes(magic),
        })
    }
}

/// Read the 24-byte global header.
///
/// # Examples
/// This helper is part of an internal module, so the example is marked as
/// text example.
/// ```text
/// let mut bytes = vec![0xd4, 0xc3, 0xb2, 0xa1, 2, 0, 4, 0];
/// bytes.extend_from_slice(&[0; 8]);
/// bytes.extend_from_slice(&65535u32.to_le_bytes());
/// bytes.extend_from_slice(&1u32.to_le_bytes());
/// let header = read_global_header(&bytes).unwrap();
/// assert_eq!(header.endianness, Endianness::Little);
/// ```
///
/// # Errors
/// Same as [`check_magic`], plus `FormatError::TooShort` when the header is
/// incomplete.
pub fn read_global_header(bytes: &[u8]) -> Result<GlobalHeader, FormatError> {
    if bytes.len() < layout::GLOBAL_HEADER_LEN {
        return Err(FormatError::TooShort {
            needed: layout::GLOBAL_HEADER_LEN,
            actual: bytes.len(),
        });
    }
    check_magic(bytes)?;

    let (_, header) = parse_pcap_header(bytes).map_err(|_| FormatError::UnrecognizedMagic {
        magic: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
    })?;

    Ok(GlobalHeader {
        version: Version {
            major: header.version_major,
            minor: header.version_minor,
        },
        snapshot_length: header.snaplen,
        link_type: header.network.0 as u32,
        endianness: if header.is_bigendian() {
            Endianness::Big
        } else {
            Endianness::Little
        },
        resolution: if header.is_nanosecond_precision() {
            TimestampResolution::Nanosecond
        } else {
            TimestampResolution::Microsecond
        },
    })
}

#[cfg(test)]
mod tests {
    use super::{check_magic, read_global_header};
    use crate::capture::error::FormatError;
    use crate::{Endianness, TimestampResolution};

    fn header_with_magic(magic: [u8; 4], big_endian: bool) -> Vec<u8> {
        let mut bytes = magic.to_vec();
        let (major, minor, snaplen, link) = if big_endian {
            (2u16.to_be_bytes(), 4u16.to_be_bytes(), 1555u32.to_be_bytes(), 1u32.to_be_bytes())
        } else {
            (2u16.to_le_bytes(), 4u16.to_le_bytes(), 1555u32.to_le_bytes(), 1u32.to_le_bytes())
        };
        bytes.extend_from_slice(&major);
        bytes.extend_from_slice(&minor);
        bytes.extend_from_slice(&[0; 8]);
        bytes.extend_from_slice(&snaplen);
        bytes.extend_from_slice(&link);
        bytes
    }

    #[test]
    fn reads_little_endian_microseconds() {
        let header = read_global_header(&header_with_magic([0xd4, 0xc3, 0xb2, 0xa1], false)).unwrap();
        assert_eq!(header.endianness, Endianness::Little);
        assert_eq!(header.resolution, TimestampResolution::Microsecond);
        assert_eq!(header.version.to_string(), "2.4");
        assert_eq!(header.snapshot_length, 1555);
        assert_eq!(header.link_type, 1);
    }

    #[test]
    fn reads_big_endian_nanoseconds() {
        let header = read_global_header(&header_with_magic([0xa1, 0xb2, 0x3c, 0x4d], true)).unwrap();
        assert_eq!(header.endianness, Endianness::Big);
        assert_eq!(header.resolution, TimestampResolution::Nanosecond);
        assert_eq!(header.snapshot_length, 1555);
    }

    #[test]
    fn rejects_unknown_magic() {
        let err = check_magic(&[0x0a, 0x0d, 0x0d, 0x0a]).unwrap_err();
        assert_eq!(err, FormatError::UnrecognizedMagic { magic: 0x0a0d0d0a });
    }

    #[test]
    fn rejects_modified_pcap_magic() {
        let bytes = header_with_magic([0x34, 0xcd, 0xb2, 0xa1], false);
        let err = read_global_header(&bytes).unwrap_err();
        assert_eq!(err, FormatError::UnrecognizedMagic { magic: 0x34cdb2a1 });
    }

    #[test]
    fn rejects_short_input() {
        let err = check_magic(&[0xd4, 0xc3]).unwrap_err();
        assert!(matches!(err, FormatError::TooShort { needed: 4, actual: 2 }));
        let err = read_global_header(&[0xd4, 0xc3, 0xb2, 0xa1]).unwrap_err();
        assert!(matches!(err, FormatError::TooShort { needed: 24, actual: 4 }));
    }
}

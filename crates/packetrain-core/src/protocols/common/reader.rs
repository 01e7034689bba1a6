/// Bounds-checked, network byte order access to frame bytes.
///
/// Every read returns `None` instead of panicking so that protocol parsers can
/// fall back to a less specific classification on short frames.
#[derive(Debug, Clone, Copy)]
pub struct FrameReader<'a> {
    bytes: &'a [u8],
}

impl<'a> FrameReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Whether `needed` bytes are available starting at `offset`.
    pub fn has(&self, offset: usize, needed: usize) -> bool {
        offset
            .checked_add(needed)
            .is_some_and(|end| end <= self.bytes.len())
    }

    pub fn read_u8(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    pub fn read_u16_be(&self, offset: usize) -> Option<u16> {
        self.read_array::<2>(offset).map(u16::from_be_bytes)
    }

    pub fn read_array<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        let end = offset.checked_add(N)?;
        self.bytes.get(offset..end)?.try_into().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::FrameReader;

    #[test]
    fn reads_big_endian() {
        let bytes = [0x86, 0xdd, 0x01];
        let reader = FrameReader::new(&bytes);
        assert_eq!(reader.read_u16_be(0), Some(0x86dd));
        assert_eq!(reader.read_u8(2), Some(0x01));
    }

    #[test]
    fn has_checks_bounds() {
        let bytes = [0u8; 14];
        let reader = FrameReader::new(&bytes);
        assert!(reader.has(0, 14));
        assert!(reader.has(10, 4));
        assert!(!reader.has(10, 5));
        assert!(!reader.has(usize::MAX, 1));
    }

    #[test]
    fn short_reads_are_none() {
        let bytes = [1u8, 2, 3];
        let reader = FrameReader::new(&bytes);
        assert_eq!(reader.read_u16_be(2), None);
        assert_eq!(reader.read_array::<4>(0), None);
        assert_eq!(reader.read_u8(3), None);
    }
}

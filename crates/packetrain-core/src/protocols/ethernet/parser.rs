use super::layout;
use crate::EthernetInfo;
use crate::protocols::common::{FrameReader, format_mac};

/// Decoded Ethernet header plus where the network layer starts.
#[derive(Debug)]
pub struct EthernetHeader {
    pub info: EthernetInfo,
    pub network_offset: usize,
}

/// Parse the Ethernet header of a frame.
///
/// Returns `None` for frames shorter than the 14-byte header. A single 802.1Q
/// tag is unwrapped when the frame is long enough to hold it; a tag on a frame
/// shorter than 18 bytes is reported as-is. Nested tags are not followed.
pub fn parse_ethernet(reader: &FrameReader<'_>) -> Option<EthernetHeader> {
    if !reader.has(0, layout::HEADER_LEN) {
        return None;
    }

    let dest_mac = reader.read_array::<6>(layout::DEST_MAC_OFFSET)?;
    let source_mac = reader.read_array::<6>(layout::SOURCE_MAC_OFFSET)?;
    let mut ether_type = reader.read_u16_be(layout::ETHER_TYPE_OFFSET)?;
    let mut network_offset = layout::HEADER_LEN;
    let mut vlan = None;

    if ether_type == layout::ETHER_TYPE_VLAN && reader.has(0, layout::VLAN_HEADER_LEN) {
        vlan = Some(reader.read_u16_be(layout::VLAN_TCI_OFFSET)? & layout::VLAN_ID_MASK);
        ether_type = reader.read_u16_be(layout::VLAN_ETHER_TYPE_OFFSET)?;
        network_offset = layout::VLAN_HEADER_LEN;
    }

    Some(EthernetHeader {
        info: EthernetInfo {
            source_mac: format_mac(&source_mac),
            dest_mac: format_mac(&dest_mac),
            ether_type,
            vlan,
        },
        network_offset,
    })
}

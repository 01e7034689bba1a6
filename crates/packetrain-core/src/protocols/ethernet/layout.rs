pub const DEST_MAC_OFFSET: usize = 0;
pub const SOURCE_MAC_OFFSET: usize = 6;
pub const ETHER_TYPE_OFFSET: usize = 12;
pub const HEADER_LEN: usize = 14;

pub const VLAN_TCI_OFFSET: usize = 14;
pub const VLAN_ETHER_TYPE_OFFSET: usize = 16;
pub const VLAN_HEADER_LEN: usize = 18;
pub const VLAN_ID_MASK: u16 = 0x0fff;

pub const ETHER_TYPE_IPV4: u16 = 0x0800;
pub const ETHER_TYPE_ARP: u16 = 0x0806;
pub const ETHER_TYPE_VLAN: u16 = 0x8100;
pub const ETHER_TYPE_IPV6: u16 = 0x86dd;

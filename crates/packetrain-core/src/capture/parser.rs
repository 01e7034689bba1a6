use pcap_parser::pcap::{LegacyPcapBlock, parse_pcap_frame, parse_pcap_frame_be};
use tracing::{debug, trace};

use super::error::FormatError;
use super::layout;
use super::reader::read_global_header;
use crate::ids::IdGenerator;
use crate::protocols::decode_frame;
use crate::{CaptureFile, Endianness, Packet};

/// Decode a classic libpcap capture held in memory.
///
/// Records are decoded in buffer order until the buffer runs out, a record's
/// captured length points past the end of the buffer, or `max_packets` packets
/// have been produced. Frames shorter than an Ethernet header are skipped.
/// Each packet gets a fresh id from `ids`.
///
/// # Examples
/// ```
/// use packetrain_core::{SequentialIds, decode};
///
/// let mut header = vec![0xd4, 0xc3, 0xb2, 0xa1, 2, 0, 4, 0];
/// header.extend_from_slice(&[0; 8]);
/// header.extend_from_slice(&65535u32.to_le_bytes());
/// header.extend_from_slice(&1u32.to_le_bytes());
///
/// let capture = decode(&header, 1000, &mut SequentialIds::new("pkt-"))?;
/// assert_eq!(capture.version.to_string(), "2.4");
/// assert!(capture.packets.is_empty());
/// # Ok::<(), packetrain_core::FormatError>(())
/// ```
///
/// # Errors
/// Returns `FormatError` when the buffer is shorter than the global header or
/// its magic number is not a recognized capture magic in either byte order.
pub fn decode<G: IdGenerator + ?Sized>(
    buffer: &[u8],
    max_packets: usize,
    ids: &mut G,
) -> Result<CaptureFile, FormatError> {
    let header = read_global_header(buffer)?;

    debug!(
        version = %header.version,
        endianness = ?header.endianness,
        resolution = ?header.resolution,
        snapshot_length = header.snapshot_length,
        link_type = header.link_type,
        "capture header detected"
    );

    let packets = decode_records(
        &buffer[layout::GLOBAL_HEADER_LEN..],
        header.endianness,
        max_packets,
        ids,
    );

    debug!(packets = packets.len(), "capture decoded");

    Ok(CaptureFile {
        version: header.version,
        snapshot_length: header.snapshot_length,
        link_type: header.link_type,
        endianness: header.endianness,
        resolution: header.resolution,
        packets,
    })
}

/// Milliseconds from the record's seconds and fractional field.
///
/// The fraction is read as microseconds whatever the capture's resolution.
fn record_millis(seconds: u32, fraction: u32) -> u64 {
    u64::from(seconds) * 1_000 + u64::from(fraction) / 1_000
}

fn next_record(records: &[u8], endianness: Endianness) -> Option<(&[u8], LegacyPcapBlock<'_>)> {
    let parsed = match endianness {
        Endianness::Little => parse_pcap_frame(records),
        Endianness::Big => parse_pcap_frame_be(records),
    };
    parsed.ok()
}

fn decode_records<G: IdGenerator + ?Sized>(
    records: &[u8],
    endianness: Endianness,
    max_packets: usize,
    ids: &mut G,
) -> Vec<Packet> {
    let mut packets = Vec::new();
    let mut rest = records;

    while packets.len() < max_packets && !rest.is_empty() {
        let Some((remaining, block)) = next_record(rest, endianness) else {
            trace!(remaining = rest.len(), "truncated record, stopping");
            break;
        };
        rest = remaining;

        let Some(decoded) = decode_frame(block.data) else {
            trace!(len = block.data.len(), "frame shorter than ethernet header, skipped");
            continue;
        };

        let original_size = if block.origlen == 0 {
            block.caplen
        } else {
            block.origlen
        };

        packets.push(Packet {
            id: ids.next_id(),
            timestamp_millis: record_millis(block.ts_sec, block.ts_usec),
            ethernet: decoded.ethernet,
            network: decoded.layers.network,
            transport: decoded.layers.transport,
            captured_size: block.caplen,
            original_size,
            payload_length: decoded.layers.payload_length,
        });
    }

    packets
}

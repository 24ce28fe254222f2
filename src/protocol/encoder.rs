//! Packet encoder: region entry lists to fixed-layout feature reports.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use super::{FRAGMENT_LEN, HEADER_LEN, LightingEntry, REPORT_ID};
use crate::layout::{Layout, PaddingPolicy, RegionInfo};

/// Serializes region entry lists according to a layout's padding policy.
#[derive(Debug, Clone, Copy)]
pub struct PacketEncoder<'a> {
    policy: &'a PaddingPolicy,
    max_entries: usize,
}

impl<'a> PacketEncoder<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self {
            policy: &layout.padding,
            max_entries: layout.max_entries_per_packet.max(1),
        }
    }

    /// Encode a region's entries, splitting them into packets of at most
    /// `max_entries_per_packet` live entries. Entry order is preserved
    /// across packets. An empty list yields no packets.
    pub fn encode(&self, region: &RegionInfo, entries: &[LightingEntry]) -> Vec<Bytes> {
        let packets: Vec<Bytes> = entries
            .chunks(self.max_entries)
            .map(|chunk| self.encode_packet(region, chunk))
            .collect();

        trace!(
            region = region.code,
            entries = entries.len(),
            packets = packets.len(),
            "Encoded region"
        );
        packets
    }

    /// Encode a single packet. `entries` must not exceed the packet
    /// capacity; `encode` takes care of that.
    pub fn encode_packet(&self, region: &RegionInfo, entries: &[LightingEntry]) -> Bytes {
        let slots = self.slot_count(region, entries.len());
        let mut buf = BytesMut::with_capacity(
            HEADER_LEN + slots * FRAGMENT_LEN + self.policy.trailer().len(),
        );

        buf.put_slice(&[REPORT_ID, 0x00, region.code, 0x00]);
        for entry in entries {
            buf.put_slice(&entry.fragment());
        }

        let mut filled = entries.len();
        if let PaddingPolicy::RepeatToMinimum { repeat_count, .. } = self.policy {
            let repeat = region.repeat_to_fill.unwrap_or(*repeat_count);
            if let Some(last) = entries.last() {
                let fragment = last.fragment();
                while filled < repeat {
                    buf.put_slice(&fragment);
                    filled += 1;
                }
            }
        }

        if slots > filled {
            buf.put_bytes(0x00, (slots - filled) * FRAGMENT_LEN);
        }

        buf.put_slice(self.policy.trailer());
        buf.freeze()
    }

    /// Number of entry slots a packet with `live` entries occupies.
    fn slot_count(&self, region: &RegionInfo, live: usize) -> usize {
        match self.policy {
            PaddingPolicy::ZeroPadToCapacity { capacity, .. } => live.max(*capacity),
            PaddingPolicy::RepeatToMinimum {
                min_entries,
                repeat_count,
                ..
            } => {
                let repeat = if live == 0 {
                    0
                } else {
                    region.repeat_to_fill.unwrap_or(*repeat_count)
                };
                live.max(repeat)
                    .max(region.min_entries.unwrap_or(*min_entries))
            }
        }
    }
}

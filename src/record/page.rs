use ahash::AHashMap;

use crate::file::PageId;

use super::record::SlotId;

/// In-memory image of one fixed-size disk block, split into fixed-width
/// rows keyed by slot. Created on first touch of its page id and kept for
/// the owning table buffer's whole lifetime; there is no eviction.
#[derive(Debug)]
pub struct Page {
    id: PageId,
    slots: AHashMap<SlotId, Vec<u8>>,
    dirty: bool,
}

impl Page {
    /// Decode a raw block by walking it in `row_size` strides. Every
    /// physically present row is materialized, including slots past the
    /// table's logical row count; logical visibility is the caller's
    /// concern.
    pub fn from_block(id: PageId, block: &[u8], row_size: u32) -> Self {
        let row_size = row_size as usize;
        let mut slots = AHashMap::new();
        let mut slot: SlotId = 0;
        let mut offset = 0;
        while offset + row_size <= block.len() {
            slots.insert(slot, block[offset..offset + row_size].to_vec());
            slot += 1;
            offset += row_size;
        }
        Self {
            id,
            slots,
            dirty: false,
        }
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn get(&self, slot_id: SlotId) -> Option<&[u8]> {
        self.slots.get(&slot_id).map(Vec::as_slice)
    }

    /// Place a row into a slot and mark the page dirty.
    pub fn put(&mut self, slot_id: SlotId, row: Vec<u8>) {
        self.slots.insert(slot_id, row);
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Serialize every slot into a page-sized buffer, each row at
    /// `slot * row_size`. Offsets come from slot ids, never from map
    /// iteration order, so the output is deterministic.
    pub fn write_into(&self, buf: &mut [u8], row_size: u32) {
        let row_size = row_size as usize;
        for (&slot, row) in &self.slots {
            let offset = slot as usize * row_size;
            buf[offset..offset + row_size].copy_from_slice(row);
        }
    }
}

use crate::file::PageId;

/// Slot identifier within a page
pub type SlotId = u32;

/// Physical address of one logical row: the page it lives in and its slot
/// within that page. Always derived from the logical row index, never
/// stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId {
    pub page_id: PageId,
    pub slot_id: SlotId,
}

impl RecordId {
    pub fn new(page_id: PageId, slot_id: SlotId) -> Self {
        Self { page_id, slot_id }
    }

    /// Map a 0-based logical row index to its page and slot. This is the
    /// single addressing authority; no other component computes placement.
    ///
    /// Callers guarantee `1 <= row_size <= page_size`, which table creation
    /// enforces by rejecting empty schemas and page-wide rows.
    pub fn for_row(row_index: u32, row_size: u32, page_size: u32) -> Self {
        let per_page = rows_per_page(row_size, page_size);
        Self {
            page_id: row_index / per_page,
            slot_id: row_index % per_page,
        }
    }
}

/// How many fixed-width rows fit in one page (floor division; the
/// remainder bytes of each page stay unused).
pub fn rows_per_page(row_size: u32, page_size: u32) -> u32 {
    debug_assert!(row_size > 0, "zero row size must be rejected at creation");
    page_size / row_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_per_page_floor() {
        assert_eq!(rows_per_page(20, 4096), 204);
        assert_eq!(rows_per_page(20, 128), 6);
        assert_eq!(rows_per_page(4096, 4096), 1);
    }

    #[test]
    fn test_sequential_assignment() {
        // row_size 20, page_size 128 -> 6 rows per page
        let rid = RecordId::for_row(0, 20, 128);
        assert_eq!(rid, RecordId::new(0, 0));
        let rid = RecordId::for_row(5, 20, 128);
        assert_eq!(rid, RecordId::new(0, 5));
        let rid = RecordId::for_row(6, 20, 128);
        assert_eq!(rid, RecordId::new(1, 0));
        let rid = RecordId::for_row(13, 20, 128);
        assert_eq!(rid, RecordId::new(2, 1));
    }

    #[test]
    fn test_addressing_bijection() {
        for (row_size, page_size) in [(20u32, 128u32), (4, 4096), (16, 64), (100, 100)] {
            let per_page = rows_per_page(row_size, page_size);
            assert!(per_page >= 1);
            for row_index in 0..1000u32 {
                let rid = RecordId::for_row(row_index, row_size, page_size);
                assert!(rid.slot_id < per_page);
                assert_eq!(row_index, rid.page_id * per_page + rid.slot_id);
            }
        }
    }
}

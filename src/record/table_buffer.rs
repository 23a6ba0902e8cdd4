use std::collections::hash_map::Entry;

use ahash::AHashMap;
use tracing::trace;

use crate::file::{PagedFile, PageId};

use super::error::{RecordError, RecordResult};
use super::page::Page;
use super::record::RecordId;
use super::row::{self, NamedValues};
use super::schema::TableSchema;

/// Per-table page cache plus the table's schema and file handle.
///
/// Pages materialize lazily on first read-or-write touch and are retained
/// for the buffer's whole lifetime. All mutation happens in memory; `flush`
/// writes dirty pages back in whole-page units.
pub struct TableBuffer {
    schema: TableSchema,
    ordinal: u32,
    file: PagedFile,
    pages: AHashMap<PageId, Page>,
    dirty: bool,
}

impl TableBuffer {
    /// Wrap a freshly created table: empty cache, nothing to flush yet.
    pub fn create(schema: TableSchema, ordinal: u32, file: PagedFile) -> Self {
        Self::wrap(schema, ordinal, file)
    }

    /// Wrap a table loaded from the metadata file.
    pub fn open(schema: TableSchema, ordinal: u32, file: PagedFile) -> Self {
        Self::wrap(schema, ordinal, file)
    }

    fn wrap(schema: TableSchema, ordinal: u32, file: PagedFile) -> Self {
        Self {
            schema,
            ordinal,
            file,
            pages: AHashMap::new(),
            dirty: false,
        }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Stable metadata-page ordinal assigned at creation time; the schema
    /// persists at metadata page `ordinal + 1` for the table's lifetime.
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return the cached page, reading and decoding it from disk on first
    /// touch. Rows physically present past the logical row count decode
    /// too; they only become visible once the row count grows over them.
    fn get_page(&mut self, page_id: PageId) -> RecordResult<&mut Page> {
        match self.pages.entry(page_id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let mut block = vec![0u8; self.file.page_size() as usize];
                self.file.read_page(page_id, &mut block)?;
                trace!(table = self.schema.name(), page_id, "page materialized");
                let page = Page::from_block(page_id, &block, self.schema.row_size());
                Ok(entry.insert(page))
            }
        }
    }

    /// Append one row at the next logical index.
    ///
    /// Exactly the schema's attribute count must be supplied. The row is
    /// fully encoded before any state changes, so a bad value mutates
    /// neither the page cache nor the row count.
    pub fn insert_row(&mut self, values: &NamedValues) -> RecordResult<RecordId> {
        if values.len() != self.schema.attribute_count() {
            return Err(RecordError::SchemaMismatch {
                expected: self.schema.attribute_count(),
                actual: values.len(),
            });
        }

        let row = row::encode_row(&self.schema, values)?;
        let rid = RecordId::for_row(
            self.schema.row_count(),
            self.schema.row_size(),
            self.file.page_size(),
        );

        let page = self.get_page(rid.page_id)?;
        page.put(rid.slot_id, row);
        self.dirty = true;
        self.schema.increment_row_count();

        Ok(rid)
    }

    /// All rows in insertion order (ascending logical index), fully
    /// materialized. Tables are expected to stay small; a larger design
    /// would stream.
    pub fn select_all(&mut self) -> RecordResult<Vec<NamedValues>> {
        let schema = self.schema.clone();
        let page_size = self.file.page_size();

        let mut rows = Vec::with_capacity(schema.row_count() as usize);
        for row_index in 0..schema.row_count() {
            let rid = RecordId::for_row(row_index, schema.row_size(), page_size);
            let page = self.get_page(rid.page_id)?;
            let bytes = page.get(rid.slot_id).ok_or(RecordError::InvalidSlot {
                page_id: rid.page_id,
                slot_id: rid.slot_id,
            })?;
            rows.push(row::decode_row(&schema, bytes));
        }
        Ok(rows)
    }

    /// Write dirty pages back to the table file in whole-page units and
    /// clear the dirty flags. A clean buffer is a no-op, so flushing twice
    /// in a row leaves byte-identical file content.
    pub fn flush(&mut self) -> RecordResult<()> {
        if !self.dirty {
            return Ok(());
        }

        let row_size = self.schema.row_size();
        let page_size = self.file.page_size() as usize;
        let mut written = 0u32;
        for page in self.pages.values_mut() {
            if !page.is_dirty() {
                continue;
            }
            let mut buf = vec![0u8; page_size];
            page.write_into(&mut buf, row_size);
            self.file.write_page(page.id(), &buf)?;
            page.clear_dirty();
            written += 1;
        }
        self.file.sync()?;
        self.dirty = false;

        trace!(table = self.schema.name(), pages = written, "table flushed");
        Ok(())
    }
}

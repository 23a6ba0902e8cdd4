use crate::file::FileError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("File error: {0}")]
    File(#[from] FileError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Name too long: '{0}' exceeds {max} bytes", max = crate::record::MAX_NAME_LEN)]
    NameTooLong(String),

    #[error("Unsupported attribute type: '{0}' (expected 'int' or 'char')")]
    UnsupportedAttrType(String),

    #[error("Table '{0}' must have at least one attribute")]
    EmptySchema(String),

    #[error("Schema for table '{table}' does not fit in one page: {attr_count} attributes, page size {page_size}")]
    SchemaOverflow {
        table: String,
        attr_count: u32,
        page_size: u32,
    },

    #[error("Row of table '{table}' is wider than a page: row size {row_size}, page size {page_size}")]
    RowTooWide {
        table: String,
        row_size: u32,
        page_size: u32,
    },

    #[error("Value for attribute '{attr}' is too long: {len} bytes, max {max}", max = crate::record::MAX_NAME_LEN)]
    ValueTooLong { attr: String, len: usize },

    #[error("Cannot store '{value}' in int attribute '{attr}'")]
    InvalidInteger { attr: String, value: String },

    #[error("Schema mismatch: expected {expected} attributes, got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error("Invalid slot: page_id={page_id}, slot_id={slot_id}")]
    InvalidSlot { page_id: u32, slot_id: u32 },
}

pub type RecordResult<T> = Result<T, RecordError>;

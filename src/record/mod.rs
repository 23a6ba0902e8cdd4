mod error;
mod page;
mod record;
mod row;
mod schema;
mod table_buffer;
mod value;

pub use error::{RecordError, RecordResult};
pub use page::Page;
pub use record::{rows_per_page, RecordId, SlotId};
pub use row::{decode_row, encode_row, NamedValues};
pub use schema::{Attribute, TableSchema, ATTR_DESC_SIZE, SCHEMA_HEADER_SIZE};
pub use table_buffer::TableBuffer;
pub use value::AttrType;

/// Maximum byte length of table names, attribute names, and char values.
pub const MAX_NAME_LEN: usize = 16;

/// On-disk width of an int attribute.
pub const INT_WIDTH: usize = 4;

/// On-disk width of a char attribute (same bound as names).
pub const CHAR_WIDTH: usize = MAX_NAME_LEN;

pub mod command;
pub mod config;
pub mod database;
pub mod file;
pub mod network;
pub mod record;

pub use config::Config;
pub use database::{Database, DatabaseError, DatabaseResult, SharedDatabase};
pub use file::{FileError, FileResult, PagedFile, PageId, DEFAULT_PAGE_SIZE, META_FILE_NAME};
pub use network::Server;
pub use record::{
    Attribute, AttrType, NamedValues, RecordError, RecordId, RecordResult, TableBuffer,
    TableSchema,
};

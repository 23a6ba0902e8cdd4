mod error;
mod paged_file;

pub use error::{FileError, FileResult};
pub use paged_file::PagedFile;

/// Default page size in bytes. A persisted database carries its actual
/// page size in the metadata header, which takes precedence on open.
pub const DEFAULT_PAGE_SIZE: u32 = 4096;

/// Name of the shared metadata file inside the data directory.
pub const META_FILE_NAME: &str = "dbinfo.bin";

/// Page ID type
pub type PageId = u32;

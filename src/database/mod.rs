use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use ahash::AHashMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::file::{FileError, PagedFile, META_FILE_NAME};
use crate::record::{
    AttrType, Attribute, NamedValues, RecordError, TableBuffer, TableSchema,
};

#[cfg(test)]
mod tests;

/// Smallest workable page: the metadata header plus at least one
/// single-attribute schema page must fit.
pub const MIN_PAGE_SIZE: u32 = 64;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Table {0} already exists")]
    DuplicateTable(String),

    #[error("Table {0} not found")]
    TableNotFound(String),

    #[error("Invalid page size {0}: must be at least {MIN_PAGE_SIZE} bytes")]
    InvalidPageSize(u32),

    #[error("Corrupt metadata header: {0}")]
    CorruptMetadata(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File error: {0}")]
    File(#[from] FileError),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// The engine: owns the catalog, every table buffer, the shared metadata
/// file, and the flush/persistence lifecycle.
///
/// On disk the metadata file holds one header page
/// (`[0:4) page_size, [4:8) table_count`, rest unused) followed by one
/// schema page per table at index `ordinal + 1`. Each table's rows live in
/// `<name>.bin` next to it.
pub struct Database {
    data_dir: PathBuf,
    page_size: u32,
    meta_file: PagedFile,
    tables: AHashMap<String, TableBuffer>,
    dirty: bool,
}

impl Database {
    /// Open the database under `config.data_dir`, creating the metadata
    /// file if needed.
    ///
    /// A fresh metadata file gets its header page written immediately (the
    /// only write open performs). An existing one is loaded whole: header
    /// first, then one schema page per table, opening every `<name>.bin`
    /// as it goes. Any missing table file or undecodable schema aborts the
    /// open; there is no partial catalog.
    pub fn open(config: &Config) -> DatabaseResult<Self> {
        if config.page_size < MIN_PAGE_SIZE {
            return Err(DatabaseError::InvalidPageSize(config.page_size));
        }

        fs::create_dir_all(&config.data_dir)?;
        let meta_path = config.data_dir.join(META_FILE_NAME);
        let mut meta_file = PagedFile::create(&meta_path, config.page_size)?;

        if meta_file.is_empty()? {
            let mut db = Self {
                data_dir: config.data_dir.clone(),
                page_size: config.page_size,
                meta_file,
                tables: AHashMap::new(),
                dirty: false,
            };
            db.write_header()?;
            info!(
                data_dir = %db.data_dir.display(),
                page_size = db.page_size,
                "initialized new database"
            );
            return Ok(db);
        }

        // The header knows the real page size; the configured one only
        // applies to fresh databases.
        let mut header = vec![0u8; config.page_size as usize];
        meta_file.read_page(0, &mut header)?;
        let page_size = read_u32(&header, 0);
        let table_count = read_u32(&header, 4);
        if page_size < MIN_PAGE_SIZE {
            return Err(DatabaseError::CorruptMetadata(format!(
                "header page size {page_size}"
            )));
        }
        if page_size != config.page_size {
            meta_file = PagedFile::open(&meta_path, page_size)?;
        }

        let mut db = Self {
            data_dir: config.data_dir.clone(),
            page_size,
            meta_file,
            tables: AHashMap::with_capacity(table_count as usize),
            dirty: false,
        };

        let mut buf = vec![0u8; page_size as usize];
        for page_index in 1..=table_count {
            db.meta_file.read_page(page_index, &mut buf)?;
            let schema = TableSchema::decode(&buf)?;
            let file = PagedFile::open(db.table_path(schema.name()), page_size)?;
            debug!(table = schema.name(), rows = schema.row_count(), "loaded table");
            db.tables.insert(
                schema.name().to_string(),
                TableBuffer::open(schema, page_index - 1, file),
            );
        }

        info!(
            data_dir = %db.data_dir.display(),
            page_size,
            tables = table_count,
            "opened database"
        );
        Ok(db)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Create a table from ordered (attribute name, type name) pairs.
    ///
    /// The new table's file is created right away, but its schema reaches
    /// the metadata file only at the next flush or close; until then the
    /// table is a memory-only fact. The table keeps the ordinal assigned
    /// here for its whole on-disk life.
    pub fn create_table(
        &mut self,
        name: &str,
        attrs: &[(String, String)],
    ) -> DatabaseResult<()> {
        if self.tables.contains_key(name) {
            return Err(DatabaseError::DuplicateTable(name.to_string()));
        }

        let mut attributes = Vec::with_capacity(attrs.len());
        for (attr_name, type_name) in attrs {
            attributes.push(Attribute {
                name: attr_name.clone(),
                attr_type: AttrType::parse(type_name)?,
            });
        }
        let schema = TableSchema::new(name.to_string(), attributes)?;

        // Reject anything that would not round-trip through one metadata
        // page, or whose rows would not fit a single data page.
        if !schema.fits_in_page(self.page_size) {
            return Err(RecordError::SchemaOverflow {
                table: name.to_string(),
                attr_count: schema.attribute_count() as u32,
                page_size: self.page_size,
            }
            .into());
        }
        if schema.row_size() > self.page_size {
            return Err(RecordError::RowTooWide {
                table: name.to_string(),
                row_size: schema.row_size(),
                page_size: self.page_size,
            }
            .into());
        }

        let file = PagedFile::create(self.table_path(name), self.page_size)?;
        let ordinal = self.tables.len() as u32;
        self.tables
            .insert(name.to_string(), TableBuffer::create(schema, ordinal, file));
        self.dirty = true;

        info!(table = name, ordinal, "created table");
        Ok(())
    }

    /// Append one row. Row-count growth is catalog state, so the database
    /// goes dirty along with the table buffer.
    pub fn insert_row(&mut self, table: &str, values: &NamedValues) -> DatabaseResult<()> {
        let buffer = self
            .tables
            .get_mut(table)
            .ok_or_else(|| DatabaseError::TableNotFound(table.to_string()))?;
        buffer.insert_row(values)?;
        self.dirty = true;
        Ok(())
    }

    /// All table names, sorted for deterministic output.
    pub fn list_tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// Attribute (name, type) pairs in schema order.
    pub fn describe_table(&self, table: &str) -> DatabaseResult<Vec<(String, String)>> {
        let buffer = self
            .tables
            .get(table)
            .ok_or_else(|| DatabaseError::TableNotFound(table.to_string()))?;
        Ok(buffer
            .schema()
            .attributes()
            .iter()
            .map(|a| (a.name.clone(), a.attr_type.as_str().to_string()))
            .collect())
    }

    /// All rows of a table in insertion order.
    pub fn select_all(&mut self, table: &str) -> DatabaseResult<Vec<NamedValues>> {
        let buffer = self
            .tables
            .get_mut(table)
            .ok_or_else(|| DatabaseError::TableNotFound(table.to_string()))?;
        Ok(buffer.select_all()?)
    }

    /// Flush every table buffer, then rewrite the metadata pages if the
    /// catalog changed. Performs the same writes as `close` but keeps all
    /// file handles open.
    pub fn flush_all(&mut self) -> DatabaseResult<()> {
        for buffer in self.tables.values_mut() {
            buffer.flush()?;
        }

        if self.dirty {
            self.write_header()?;
            let mut flushed = 0u32;
            for buffer in self.tables.values() {
                let page = buffer.schema().encode(self.page_size);
                self.meta_file.write_page(buffer.ordinal() + 1, &page)?;
                flushed += 1;
            }
            self.meta_file.sync()?;
            self.dirty = false;
            debug!(tables = flushed, "metadata flushed");
        }

        Ok(())
    }

    /// Flush everything and release all file handles. Consuming `self`
    /// makes a double close unrepresentable.
    pub fn close(mut self) -> DatabaseResult<()> {
        self.flush_all()?;
        info!(data_dir = %self.data_dir.display(), "database closed");
        Ok(())
    }

    fn write_header(&mut self) -> DatabaseResult<()> {
        let mut buf = vec![0u8; self.page_size as usize];
        buf[0..4].copy_from_slice(&self.page_size.to_le_bytes());
        buf[4..8].copy_from_slice(&(self.tables.len() as u32).to_le_bytes());
        self.meta_file.write_page(0, &buf)?;
        Ok(())
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{name}.bin"))
    }
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}

/// Mutex-guarded facade shared by the REPL and the network responder.
///
/// The engine itself has no internal locking; every operation from every
/// front-end must pass through here so catalog and page-cache mutation is
/// serialized.
#[derive(Clone)]
pub struct SharedDatabase {
    inner: Arc<Mutex<Database>>,
}

impl SharedDatabase {
    pub fn new(db: Database) -> Self {
        Self {
            inner: Arc::new(Mutex::new(db)),
        }
    }

    pub fn create_table(&self, name: &str, attrs: &[(String, String)]) -> DatabaseResult<()> {
        self.inner.lock().unwrap().create_table(name, attrs)
    }

    pub fn insert_row(&self, table: &str, values: &NamedValues) -> DatabaseResult<()> {
        self.inner.lock().unwrap().insert_row(table, values)
    }

    pub fn list_tables(&self) -> Vec<String> {
        self.inner.lock().unwrap().list_tables()
    }

    pub fn describe_table(&self, table: &str) -> DatabaseResult<Vec<(String, String)>> {
        self.inner.lock().unwrap().describe_table(table)
    }

    pub fn select_all(&self, table: &str) -> DatabaseResult<Vec<NamedValues>> {
        self.inner.lock().unwrap().select_all(table)
    }

    /// Flush all in-memory state. File handles stay open; they are
    /// released when the last clone drops.
    pub fn shutdown(&self) -> DatabaseResult<()> {
        self.inner.lock().unwrap().flush_all()
    }
}

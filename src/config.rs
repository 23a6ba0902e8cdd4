use std::path::PathBuf;

use crate::file::DEFAULT_PAGE_SIZE;

/// Runtime configuration for one database instance.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the metadata file and every per-table file; the
    /// path prefix of every file open the engine performs.
    pub data_dir: PathBuf,

    /// Page size used when creating a new database. An existing database
    /// keeps the page size recorded in its metadata header.
    pub page_size: u32,

    /// TCP listen address for the read-only responder.
    pub listen_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./ggdb_data"),
            page_size: DEFAULT_PAGE_SIZE,
            listen_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size;
        self
    }

    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

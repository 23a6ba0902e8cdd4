use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::error::{FileError, FileResult};
use super::PageId;

/// A file read and written in whole fixed-size pages.
///
/// Page size is a runtime value: it is chosen when the database is first
/// created and read back from the metadata header afterwards, so it cannot
/// be a compile-time constant.
pub struct PagedFile {
    file: File,
    path: PathBuf,
    page_size: u32,
}

impl PagedFile {
    /// Open a file, creating it if it does not exist.
    pub fn create<P: AsRef<Path>>(path: P, page_size: u32) -> FileResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        Ok(Self {
            file,
            path,
            page_size,
        })
    }

    /// Open an existing file. Fails if the file is missing.
    pub fn open<P: AsRef<Path>>(path: P, page_size: u32) -> FileResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(FileError::FileNotFound(path.display().to_string()));
        }
        let file = OpenOptions::new().read(true).write(true).open(&path)?;
        Ok(Self {
            file,
            path,
            page_size,
        })
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File length in bytes.
    pub fn len(&self) -> FileResult<u64> {
        Ok(self.file.metadata()?.len())
    }

    pub fn is_empty(&self) -> FileResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Read one page into `buffer`. Reading past the end of the file is not
    /// an error: the unread tail is zero-filled, matching the on-disk
    /// convention that absent pages are all zeroes.
    pub fn read_page(&mut self, page_id: PageId, buffer: &mut [u8]) -> FileResult<()> {
        if buffer.len() != self.page_size as usize {
            return Err(FileError::InvalidPageSize {
                expected: self.page_size as usize,
                actual: buffer.len(),
            });
        }

        let offset = page_id as u64 * self.page_size as u64;
        self.file.seek(SeekFrom::Start(offset))?;

        let mut filled = 0;
        while filled < buffer.len() {
            let n = self.file.read(&mut buffer[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        buffer[filled..].fill(0);

        Ok(())
    }

    /// Write one page, extending the file if needed.
    pub fn write_page(&mut self, page_id: PageId, buffer: &[u8]) -> FileResult<()> {
        if buffer.len() != self.page_size as usize {
            return Err(FileError::InvalidPageSize {
                expected: self.page_size as usize,
                actual: buffer.len(),
            });
        }

        let offset = page_id as u64 * self.page_size as u64;
        let required = offset + self.page_size as u64;
        if self.file.metadata()?.len() < required {
            self.file.set_len(required)?;
        }

        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(buffer)?;

        Ok(())
    }

    /// Flush OS buffers to disk.
    pub fn sync(&mut self) -> FileResult<()> {
        self.file.sync_data()?;
        Ok(())
    }
}

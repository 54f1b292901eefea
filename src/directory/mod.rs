//! Abstraction over the storage the index files are written to and
//! read from.
//!
//! The codec only relies on the small random-access surface defined
//! here, so it is portable to any backing that honors it. The crate
//! ships a write-once in-memory implementation; the on-disk formats are
//! laid out so that an mmap-backed implementation could be added without
//! changing them.

mod ram_directory;
mod read_only_source;
mod source_read;

pub use self::ram_directory::RAMDirectory;
pub use self::read_only_source::ReadOnlySource;
pub use self::source_read::SourceRead;

use error::Result;
use std::fmt;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write handle returned by `Directory::open_write`.
///
/// Data is made visible to readers when the writer is flushed.
pub type WritePtr = BufWriter<Box<Write>>;

/// Write-once/read-many file storage.
///
/// Files are immutable once their writer has been flushed; readers get a
/// stable `ReadOnlySource` snapshot.
pub trait Directory: fmt::Debug {
    /// Opens a file for reading, returning a shared read-only view of
    /// its content.
    fn open_read(&self, path: &Path) -> Result<ReadOnlySource>;

    /// Opens a file for writing. Any previous content is discarded.
    fn open_write(&mut self, path: &Path) -> Result<WritePtr>;

    /// Returns true iff the file exists.
    fn exists(&self, path: &Path) -> bool;

    /// Removes the file.
    fn delete(&mut self, path: &Path) -> Result<()>;
}

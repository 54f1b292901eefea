use directory::{Directory, ReadOnlySource, WritePtr};
use error::Result;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::io::{BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Writer that accumulates bytes and commits them to the shared
/// directory map on flush.
///
/// Readers only ever observe fully flushed files.
struct VecWriter {
    path: PathBuf,
    shared_directory: RAMDirectory,
    data: Cursor<Vec<u8>>,
    is_flushed: bool,
}

impl VecWriter {
    fn new(path: PathBuf, shared_directory: RAMDirectory) -> VecWriter {
        VecWriter {
            path: path,
            shared_directory: shared_directory,
            data: Cursor::new(Vec::new()),
            is_flushed: true,
        }
    }
}

impl Drop for VecWriter {
    fn drop(&mut self) {
        if !self.is_flushed {
            warn!(
                "You forgot to flush {:?} before its writer got dropped. Do not rely on drop.",
                self.path
            );
        }
    }
}

impl Write for VecWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.is_flushed = false;
        self.data.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.is_flushed = true;
        self.shared_directory
            .write_file(&self.path, self.data.get_ref().clone());
        Ok(())
    }
}

/// In-memory directory.
///
/// Cloning gives another handle on the same shared file map, which is
/// how a writer and readers of the same segment coexist.
#[derive(Clone, Default)]
pub struct RAMDirectory {
    fs: Arc<RwLock<HashMap<PathBuf, ReadOnlySource>>>,
}

impl RAMDirectory {
    pub fn create() -> RAMDirectory {
        RAMDirectory::default()
    }

    pub(crate) fn write_file(&self, path: &Path, data: Vec<u8>) {
        self.fs
            .write()
            .expect("lock poisoned")
            .insert(path.to_owned(), ReadOnlySource::from(data));
    }
}

impl fmt::Debug for RAMDirectory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RAMDirectory")
    }
}

impl Directory for RAMDirectory {
    fn open_read(&self, path: &Path) -> Result<ReadOnlySource> {
        self.fs
            .read()
            .expect("lock poisoned")
            .get(path)
            .cloned()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("file {:?} does not exist", path),
                ).into()
            })
    }

    fn open_write(&mut self, path: &Path) -> Result<WritePtr> {
        let vec_writer = VecWriter::new(path.to_owned(), self.clone());
        Ok(BufWriter::new(Box::new(vec_writer)))
    }

    fn exists(&self, path: &Path) -> bool {
        self.fs.read().expect("lock poisoned").contains_key(path)
    }

    fn delete(&mut self, path: &Path) -> Result<()> {
        match self.fs.write().expect("lock poisoned").remove(path) {
            Some(_) => Ok(()),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file {:?} does not exist", path),
            ).into()),
        }
    }
}

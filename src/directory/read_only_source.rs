use std::sync::Arc;

/// Read-only view over a shared byte buffer.
///
/// Cloning and slicing are cheap: every view shares the same underlying
/// buffer. Because finalized segment files are immutable, any number of
/// iterators may hold independent views of the same file concurrently.
#[derive(Clone)]
pub struct ReadOnlySource {
    data: Arc<Vec<u8>>,
    start: usize,
    stop: usize,
}

impl ReadOnlySource {
    /// Creates an empty source.
    pub fn empty() -> ReadOnlySource {
        ReadOnlySource::from(Vec::new())
    }

    /// Number of bytes in the view.
    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The viewed bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[self.start..self.stop]
    }

    /// Sub-view over `[from, to)`, relative to this view.
    pub fn slice(&self, from: usize, to: usize) -> ReadOnlySource {
        assert!(from <= to);
        assert!(to <= self.len());
        ReadOnlySource {
            data: Arc::clone(&self.data),
            start: self.start + from,
            stop: self.start + to,
        }
    }

    /// Sub-view dropping the first `from` bytes.
    pub fn slice_from(&self, from: usize) -> ReadOnlySource {
        self.slice(from, self.len())
    }
}

impl From<Vec<u8>> for ReadOnlySource {
    fn from(data: Vec<u8>) -> ReadOnlySource {
        let len = data.len();
        ReadOnlySource {
            data: Arc::new(data),
            start: 0,
            stop: len,
        }
    }
}

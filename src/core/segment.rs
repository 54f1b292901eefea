use directory::{Directory, ReadOnlySource, WritePtr};
use error::Result;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Random identifier naming a segment's files.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentId(Uuid);

impl SegmentId {
    pub fn generate_random() -> SegmentId {
        SegmentId(Uuid::new_v4())
    }

    pub fn uuid_string(&self) -> String {
        self.0.to_simple().to_string()
    }

    /// First eight hex chars, for logging.
    pub fn short_uuid_string(&self) -> String {
        self.uuid_string()[..8].to_string()
    }
}

impl fmt::Debug for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Seg({})", self.short_uuid_string())
    }
}

/// The files a segment is made of.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentComponent {
    /// Aligned postings blocks (`.doc`).
    Postings,
    /// Term dictionary (`.term`).
    Terms,
}

impl SegmentComponent {
    pub fn extension(&self) -> &'static str {
        match *self {
            SegmentComponent::Postings => "doc",
            SegmentComponent::Terms => "term",
        }
    }
}

/// One segment of the index: a segment id bound to the directory its
/// files live in.
///
/// Segments are write-once: a `SegmentWriter` populates the files, and
/// once it has finalized them they are immutable.
pub struct Segment {
    directory: Box<Directory>,
    segment_id: SegmentId,
}

impl Segment {
    pub fn new(directory: Box<Directory>, segment_id: SegmentId) -> Segment {
        Segment {
            directory: directory,
            segment_id: segment_id,
        }
    }

    pub fn id(&self) -> SegmentId {
        self.segment_id
    }

    /// Path of one of the segment's files, relative to the directory.
    pub fn relative_path(&self, component: SegmentComponent) -> PathBuf {
        PathBuf::from(format!(
            "{}.{}",
            self.segment_id.uuid_string(),
            component.extension()
        ))
    }

    pub fn open_read(&self, component: SegmentComponent) -> Result<ReadOnlySource> {
        self.directory.open_read(&self.relative_path(component))
    }

    pub fn open_write(&mut self, component: SegmentComponent) -> Result<WritePtr> {
        let path = self.relative_path(component);
        self.directory.open_write(&path)
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Segment({:?})", self.segment_id)
    }
}

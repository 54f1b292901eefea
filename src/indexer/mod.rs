//! Indexing-time side of the crate: the in-memory term accumulator
//! filled while documents stream in, the borrowing pull wrappers that
//! expose it to the codec at flush time, and the segment writer gluing
//! both to the postings serializer.

mod accumulator;
mod buffered_fields;
mod segment_writer;

pub use self::accumulator::{FieldStats, PostingList, TermAccumulator};
pub use self::buffered_fields::{
    BufferedFields, BufferedPostingsEnum, BufferedTerms, BufferedTermsEnum,
};
pub use self::segment_writer::SegmentWriter;

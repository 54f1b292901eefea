//! Segment identity and the read side of a finalized segment.

mod segment;
mod segment_reader;

pub use self::segment::{Segment, SegmentComponent, SegmentId};
pub use self::segment_reader::{SegmentReader, SegmentTerms, SegmentTermsEnum};

//! Postings: per-term `(doc, freq)` sequences, their on-disk codec, and
//! the one-at-a-time / batch-at-a-time iterators over them.
//!
//! On disk, a term's postings are a run of fixed-shape blocks of up to
//! [`BLOCK_SIZE`](constant.BLOCK_SIZE.html) absolute doc ids, each block
//! starting on a cache-line boundary so that a scorer can load it
//! straight into a SIMD register without delta decoding.

mod batch;
mod segment_postings;
mod serializer;
mod term_state;
mod vec_postings;

pub use self::batch::PostingsBatch;
pub use self::segment_postings::SegmentPostings;
pub use self::serializer::PostingsSerializer;
pub use self::term_state::TermState;
pub use self::vec_postings::VecPostings;

use DocId;
use NO_MORE_DOCS;

/// Number of doc slots per on-disk block.
pub const BLOCK_SIZE: usize = 16;

/// On-disk blocks start on multiples of this many bytes.
pub const ALIGNMENT: u64 = 64;

/// Magic number opening the postings file: "POST", big-endian.
pub(crate) const POSTINGS_MAGIC: u32 = 0x504F_5354;

/// Magic number opening the term dictionary file: "TERM", big-endian.
pub(crate) const TERM_DICT_MAGIC: u32 = 0x5445_524D;

/// Version byte shared by both files.
pub(crate) const FORMAT_VERSION: u8 = 1;

/// One-document-at-a-time cursor over a posting list.
///
/// `next_doc` and `advance` are the only methods moving the cursor;
/// `doc_id` and `freq` are meaningful only after one of them returned a
/// doc id other than [`NO_MORE_DOCS`](../constant.NO_MORE_DOCS.html).
pub trait PostingsEnum {
    /// Doc id the cursor is positioned on.
    fn doc_id(&self) -> DocId;

    /// Moves to the next document, returning its doc id, or
    /// `NO_MORE_DOCS` if the list is exhausted.
    fn next_doc(&mut self) -> DocId;

    /// Term frequency within the current document.
    fn freq(&self) -> u32;

    /// Upper bound on the number of documents this cursor will return,
    /// used by query planners to order legs.
    fn cost(&self) -> u64;

    /// Moves to the first document with a doc id `>= target`, returning
    /// it, or `NO_MORE_DOCS`.
    ///
    /// The default implementation is the linear fallback; concrete
    /// cursors may skip ahead when their layout permits.
    fn advance(&mut self, target: DocId) -> DocId {
        let mut doc = self.doc_id();
        while doc < target && doc != NO_MORE_DOCS {
            doc = self.next_doc();
        }
        doc
    }

    /// Freq-only cursors record no positions; `-1` is returned instead
    /// of failing.
    fn next_position(&mut self) -> i32 {
        -1
    }

    /// Start offset of the current position, `-1` when offsets are not
    /// recorded.
    fn start_offset(&self) -> i32 {
        -1
    }

    /// End offset of the current position, `-1` when offsets are not
    /// recorded.
    fn end_offset(&self) -> i32 {
        -1
    }
}

/// Batch-at-a-time extension of `PostingsEnum`.
///
/// Traversal code should pick one mode per traversal: interleaving
/// `next_batch` with `next_doc` is not specified by this contract.
pub trait BatchPostingsEnum: PostingsEnum {
    /// Fills `batch` with the next run of postings, in list order, and
    /// returns the number of slots filled.
    ///
    /// A return of 0 signals exhaustion and stays at 0 on subsequent
    /// calls. The batch is caller-owned and is never reallocated.
    fn next_batch(&mut self, batch: &mut PostingsBatch) -> usize;
}

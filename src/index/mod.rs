//! The read-only pull hierarchy exposed both by the in-memory
//! accumulator at flush time and by finalized segments:
//! `Fields` → `Terms` → `TermsEnum` → `PostingsEnum`.
//!
//! Every level is expressed with associated types rather than trait
//! objects, so that the batch decoding path is monomorphized wherever
//! the concrete cursor type is known. Inner cursors borrow from their
//! outer holder; lifetimes guarantee that no inner iterator outlives
//! the structure it reads from.

use error::{ErrorKind, Result};
use postings::{BatchPostingsEnum, PostingsEnum};
use schema::Field;

/// Outcome of `TermsEnum::seek_ceil`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeekStatus {
    /// The cursor is positioned on the exact target term.
    Found,
    /// The cursor is positioned on the first term greater than the
    /// target.
    NotFound,
    /// All terms compare lower than the target; the cursor is
    /// exhausted.
    End,
}

/// Cursor position of a `TermsEnum`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Cursor {
    BeforeFirst,
    Positioned(usize),
    End,
}

impl Cursor {
    pub(crate) fn position(&self) -> Result<usize> {
        match *self {
            Cursor::Positioned(ord) => Ok(ord),
            Cursor::BeforeFirst => Err(ErrorKind::InvalidCursor(
                "the terms cursor is not positioned yet".to_string(),
            ).into()),
            Cursor::End => Err(ErrorKind::InvalidCursor(
                "the terms cursor is exhausted".to_string(),
            ).into()),
        }
    }
}

/// Enumerates the indexed fields of a segment (in-memory or on-disk).
pub trait Fields {
    type TermsImpl: Terms;

    /// Indexed fields holding at least one term, in declaration order.
    fn fields(&self) -> Vec<Field>;

    /// The terms of a field, or `None` if the field is absent or not
    /// indexed.
    fn terms(&self, field: Field) -> Option<Self::TermsImpl>;
}

/// Term-level statistics and cursor factory for one field.
pub trait Terms {
    type Iter: TermsEnum;

    /// A cursor over the field's terms, initially positioned before the
    /// first term.
    fn iterator(&self) -> Self::Iter;

    /// Number of distinct terms.
    fn size(&self) -> u64;

    /// Number of distinct documents holding at least one term of the
    /// field.
    fn doc_count(&self) -> u32;

    /// Sum of `total_term_freq` over the field's terms.
    fn sum_total_term_freq(&self) -> u64;

    /// Sum of `doc_freq` over the field's terms.
    fn sum_doc_freq(&self) -> u64;
}

/// Lexicographic cursor over the terms of a field.
///
/// The cursor starts before the first term, is moved by `next`,
/// `seek_exact` and `seek_ceil`, and ends exhausted. The accessors
/// (`term`, `doc_freq`, `total_term_freq`, `postings`,
/// `batch_postings`) fail with `InvalidCursor` unless the cursor is
/// positioned on a term.
pub trait TermsEnum {
    type Postings: PostingsEnum;
    type BatchPostings: BatchPostingsEnum;

    /// Advances to the next term, returning false once exhausted.
    fn next(&mut self) -> bool;

    /// Positions the cursor on `target` and returns true if the term
    /// exists; otherwise leaves the cursor unchanged and returns false.
    fn seek_exact(&mut self, target: &[u8]) -> bool;

    /// Positions the cursor on the first term `>= target`.
    fn seek_ceil(&mut self, target: &[u8]) -> SeekStatus;

    /// Bytes of the current term.
    fn term(&self) -> Result<&[u8]>;

    /// Number of documents containing the current term.
    fn doc_freq(&self) -> Result<u32>;

    /// Total occurrences of the current term.
    fn total_term_freq(&self) -> Result<u64>;

    /// Opens a one-at-a-time postings cursor over the current term.
    fn postings(&self) -> Result<Self::Postings>;

    /// Opens a batch-capable postings cursor over the current term.
    fn batch_postings(&self) -> Result<Self::BatchPostings>;
}

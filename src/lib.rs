//! # `fathom`
//!
//! Fathom is a segment-based inverted index core.
//!
//! It provides the machinery sitting between an indexing pipeline and a
//! scorer: an in-memory term accumulator filled during indexing, a
//! streaming pull API (`Fields` / `Terms` / `TermsEnum` / `PostingsEnum`)
//! over it, an on-disk postings codec with cache-line aligned blocks of
//! absolute doc ids, and the batch-at-a-time postings iterators that feed
//! decoded `(doc, freq)` runs to SIMD scorers.
//!
//! Segments are write-once. A `SegmentWriter` accumulates postings for one
//! flush epoch and serializes them; a `SegmentReader` then exposes the
//! same pull API over the finalized files.
//!
//! ```
//! use fathom::schema::{SchemaBuilder, IndexRecordOption, Document};
//! use fathom::directory::RAMDirectory;
//! use fathom::core::{Segment, SegmentId, SegmentReader};
//! use fathom::indexer::SegmentWriter;
//! use fathom::index::{Terms, TermsEnum};
//! use fathom::postings::PostingsEnum;
//!
//! let mut schema_builder = SchemaBuilder::new();
//! let body = schema_builder.add_field("body", IndexRecordOption::WithFreqs);
//! let schema = schema_builder.build();
//!
//! let directory = RAMDirectory::create();
//! let segment = Segment::new(Box::new(directory), SegmentId::generate_random());
//! let mut segment_writer = SegmentWriter::for_segment(segment, &schema);
//! for text in &["apple", "banana", "apple"] {
//!     let mut doc = Document::new();
//!     doc.add_token(body, text.as_bytes());
//!     segment_writer.add_document(&doc);
//! }
//! let segment = segment_writer.finalize().unwrap();
//!
//! let segment_reader = SegmentReader::open(&segment).unwrap();
//! let terms = segment_reader.terms(body).expect("body field is indexed");
//! assert_eq!(terms.size(), 2);
//! let mut terms_enum = terms.iterator();
//! assert!(terms_enum.seek_exact(b"apple"));
//! assert_eq!(terms_enum.doc_freq().unwrap(), 2);
//! let mut postings = terms_enum.postings().unwrap();
//! assert_eq!(postings.next_doc(), 0);
//! assert_eq!(postings.next_doc(), 2);
//! assert_eq!(postings.next_doc(), fathom::NO_MORE_DOCS);
//! ```

#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
extern crate byteorder;
extern crate itertools;
extern crate serde;
extern crate serde_json;
extern crate uuid;

#[cfg(test)]
extern crate env_logger;
#[cfg(test)]
extern crate rand;

#[macro_use]
mod macros;

mod error;

pub mod common;
pub mod compression;
pub mod core;
pub mod directory;
pub mod granularity;
pub mod index;
pub mod indexer;
pub mod postings;
pub mod schema;

pub use error::{Error, ErrorKind, Result, ResultExt};

/// A segment-local document ordinal.
///
/// Doc ids are stored as unsigned 32-bit little-endian integers on disk,
/// but carried as signed 32-bit at the iterator boundary so that the
/// before-first position (`-1`) and [`NO_MORE_DOCS`](constant.NO_MORE_DOCS.html)
/// fit in the same type. Valid doc ids satisfy `0 <= doc < max_doc < 2^31`.
pub type DocId = i32;

/// Sentinel doc id signalling that an iterator is exhausted.
pub const NO_MORE_DOCS: DocId = 0x7FFF_FFFF;

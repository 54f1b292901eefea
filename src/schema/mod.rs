//! Field configuration and the minimal document representation.
//!
//! The codec treats terms as opaque byte sequences; this module only
//! carries what it needs to know about fields: their declaration order
//! and whether (and how) they are indexed. Tokenization is not part of
//! this crate, so documents hold pre-tokenized byte tokens.

mod document;
mod field;
mod field_entry;
mod index_record_option;
mod schema;

pub use self::document::Document;
pub use self::field::Field;
pub use self::field_entry::FieldEntry;
pub use self::index_record_option::IndexRecordOption;
pub use self::schema::{Schema, SchemaBuilder};

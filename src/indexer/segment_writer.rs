use core::Segment;
use error::Result;
use index::{Fields, Terms, TermsEnum};
use indexer::{BufferedFields, TermAccumulator};
use postings::{PostingsEnum, PostingsSerializer};
use schema::{Document, Schema};
use DocId;
use NO_MORE_DOCS;

/// Owns the in-memory accumulator for one flush epoch and serializes it
/// into the segment's files.
///
/// Documents are pushed with `add_document`; doc ids are attributed in
/// arrival order. `finalize` consumes the writer, streams the
/// accumulator through the pull API into the `PostingsSerializer`, and
/// returns the now-immutable segment.
pub struct SegmentWriter {
    segment: Segment,
    schema: Schema,
    accumulator: TermAccumulator,
    max_doc: DocId,
}

impl SegmentWriter {
    pub fn for_segment(segment: Segment, schema: &Schema) -> SegmentWriter {
        SegmentWriter {
            segment: segment,
            schema: schema.clone(),
            accumulator: TermAccumulator::new(schema),
            max_doc: 0,
        }
    }

    /// Records the document's tokens and returns its doc id.
    ///
    /// Tokens of unindexed fields are skipped.
    pub fn add_document(&mut self, doc: &Document) -> DocId {
        let doc_id = self.max_doc;
        for &(field, ref token) in doc.tokens() {
            if self.schema.get_field_entry(field).is_indexed() {
                self.accumulator.record(field, token, doc_id);
            }
        }
        self.max_doc += 1;
        doc_id
    }

    pub fn max_doc(&self) -> DocId {
        self.max_doc
    }

    /// Writes every buffered field to disk and seals the segment.
    ///
    /// Fields stream out in declaration order, terms in lexicographic
    /// order, postings in doc id order; this is the canonical flush
    /// data flow, driven entirely through the pull API.
    pub fn finalize(mut self) -> Result<Segment> {
        debug!(
            "flushing segment {:?} ({} docs)",
            self.segment.id(),
            self.max_doc
        );
        {
            let mut serializer = PostingsSerializer::open(&mut self.segment)?;
            let buffered_fields = BufferedFields::new(&self.accumulator);
            for field in buffered_fields.fields() {
                let terms = buffered_fields
                    .terms(field)
                    .expect("fields() only lists fields with terms");
                let record_option = self.schema.get_field_entry(field).record_option();
                serializer.new_field(
                    field,
                    record_option,
                    terms.size(),
                    terms.doc_count(),
                    terms.sum_total_term_freq(),
                    terms.sum_doc_freq(),
                )?;
                let mut terms_enum = terms.iterator();
                while terms_enum.next() {
                    serializer.new_term(terms_enum.term()?)?;
                    let mut postings = terms_enum.postings()?;
                    let mut doc = postings.next_doc();
                    while doc != NO_MORE_DOCS {
                        serializer.write_doc(doc, postings.freq())?;
                        doc = postings.next_doc();
                    }
                    serializer.close_term()?;
                }
                serializer.close_field()?;
            }
            serializer.close()?;
        }
        info!(
            "segment {:?} sealed with {} docs",
            self.segment.id(),
            self.max_doc
        );
        Ok(self.segment)
    }
}

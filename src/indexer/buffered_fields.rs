use error::Result;
use index::{Cursor, Fields, SeekStatus, Terms, TermsEnum};
use indexer::{PostingList, TermAccumulator};
use postings::{BatchPostingsEnum, PostingsBatch, PostingsEnum};
use schema::Field;
use DocId;
use NO_MORE_DOCS;

/// `Fields` view over the in-memory accumulator, used at flush time to
/// stream the buffered postings into the codec.
///
/// All the wrappers below borrow the accumulator: none of them may
/// outlive the flush epoch, which is exactly the lifetime `'a` carries.
pub struct BufferedFields<'a> {
    accumulator: &'a TermAccumulator,
}

impl<'a> BufferedFields<'a> {
    pub fn new(accumulator: &'a TermAccumulator) -> BufferedFields<'a> {
        BufferedFields {
            accumulator: accumulator,
        }
    }
}

impl<'a> Fields for BufferedFields<'a> {
    type TermsImpl = BufferedTerms<'a>;

    fn fields(&self) -> Vec<Field> {
        let schema = self.accumulator.schema();
        (0..schema.num_fields() as u32)
            .map(Field)
            .filter(|&field| schema.get_field_entry(field).is_indexed())
            .filter(|&field| self.accumulator.has_terms(field))
            .collect()
    }

    fn terms(&self, field: Field) -> Option<BufferedTerms<'a>> {
        let schema = self.accumulator.schema();
        if field.field_id() as usize >= schema.num_fields() {
            return None;
        }
        if !schema.get_field_entry(field).is_indexed() {
            return None;
        }
        if !self.accumulator.has_terms(field) {
            return None;
        }
        Some(BufferedTerms::new(self.accumulator, field))
    }
}

/// Term statistics of one buffered field.
pub struct BufferedTerms<'a> {
    accumulator: &'a TermAccumulator,
    field: Field,
    sorted_terms: Vec<&'a [u8]>,
}

impl<'a> BufferedTerms<'a> {
    fn new(accumulator: &'a TermAccumulator, field: Field) -> BufferedTerms<'a> {
        BufferedTerms {
            accumulator: accumulator,
            field: field,
            sorted_terms: accumulator.sorted_terms(field),
        }
    }
}

impl<'a> Terms for BufferedTerms<'a> {
    type Iter = BufferedTermsEnum<'a>;

    fn iterator(&self) -> BufferedTermsEnum<'a> {
        BufferedTermsEnum {
            accumulator: self.accumulator,
            field: self.field,
            terms: self.sorted_terms.clone(),
            cursor: Cursor::BeforeFirst,
        }
    }

    fn size(&self) -> u64 {
        self.sorted_terms.len() as u64
    }

    fn doc_count(&self) -> u32 {
        self.accumulator.field_stats(self.field).doc_count
    }

    fn sum_total_term_freq(&self) -> u64 {
        self.accumulator.field_stats(self.field).sum_total_term_freq
    }

    fn sum_doc_freq(&self) -> u64 {
        self.accumulator.field_stats(self.field).sum_doc_freq
    }
}

/// Lexicographic cursor over the buffered terms of one field.
pub struct BufferedTermsEnum<'a> {
    accumulator: &'a TermAccumulator,
    field: Field,
    terms: Vec<&'a [u8]>,
    cursor: Cursor,
}

impl<'a> BufferedTermsEnum<'a> {
    fn current_posting_list(&self) -> Result<&'a PostingList> {
        let ord = self.cursor.position()?;
        Ok(self
            .accumulator
            .posting_list(self.field, self.terms[ord])
            .expect("every sorted term has a posting list"))
    }
}

impl<'a> TermsEnum for BufferedTermsEnum<'a> {
    type Postings = BufferedPostingsEnum<'a>;
    type BatchPostings = BufferedPostingsEnum<'a>;

    fn next(&mut self) -> bool {
        self.cursor = match self.cursor {
            Cursor::BeforeFirst => {
                if self.terms.is_empty() {
                    Cursor::End
                } else {
                    Cursor::Positioned(0)
                }
            }
            Cursor::Positioned(ord) => {
                if ord + 1 < self.terms.len() {
                    Cursor::Positioned(ord + 1)
                } else {
                    Cursor::End
                }
            }
            Cursor::End => Cursor::End,
        };
        self.cursor != Cursor::End
    }

    fn seek_exact(&mut self, target: &[u8]) -> bool {
        match self.terms.binary_search(&target) {
            Ok(ord) => {
                self.cursor = Cursor::Positioned(ord);
                true
            }
            Err(_) => false,
        }
    }

    fn seek_ceil(&mut self, target: &[u8]) -> SeekStatus {
        match self.terms.binary_search(&target) {
            Ok(ord) => {
                self.cursor = Cursor::Positioned(ord);
                SeekStatus::Found
            }
            Err(ord) => {
                if ord < self.terms.len() {
                    self.cursor = Cursor::Positioned(ord);
                    SeekStatus::NotFound
                } else {
                    self.cursor = Cursor::End;
                    SeekStatus::End
                }
            }
        }
    }

    fn term(&self) -> Result<&[u8]> {
        let ord = self.cursor.position()?;
        Ok(self.terms[ord])
    }

    fn doc_freq(&self) -> Result<u32> {
        Ok(self.current_posting_list()?.doc_freq())
    }

    fn total_term_freq(&self) -> Result<u64> {
        Ok(self.current_posting_list()?.total_term_freq())
    }

    fn postings(&self) -> Result<BufferedPostingsEnum<'a>> {
        Ok(BufferedPostingsEnum::new(self.current_posting_list()?))
    }

    fn batch_postings(&self) -> Result<BufferedPostingsEnum<'a>> {
        Ok(BufferedPostingsEnum::new(self.current_posting_list()?))
    }
}

/// Postings cursor borrowing one buffered posting list.
pub struct BufferedPostingsEnum<'a> {
    docs: &'a [DocId],
    freqs: &'a [u32],
    position: usize,
    doc: DocId,
    freq: u32,
}

impl<'a> BufferedPostingsEnum<'a> {
    fn new(posting_list: &'a PostingList) -> BufferedPostingsEnum<'a> {
        BufferedPostingsEnum {
            docs: posting_list.docs(),
            freqs: posting_list.freqs(),
            position: 0,
            doc: -1,
            freq: 1,
        }
    }
}

impl<'a> PostingsEnum for BufferedPostingsEnum<'a> {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> DocId {
        if self.position >= self.docs.len() {
            self.doc = NO_MORE_DOCS;
            return NO_MORE_DOCS;
        }
        self.doc = self.docs[self.position];
        self.freq = self.freqs[self.position];
        self.position += 1;
        self.doc
    }

    fn freq(&self) -> u32 {
        self.freq
    }

    fn cost(&self) -> u64 {
        self.docs.len() as u64
    }
}

impl<'a> BatchPostingsEnum for BufferedPostingsEnum<'a> {
    fn next_batch(&mut self, batch: &mut PostingsBatch) -> usize {
        let remaining = self.docs.len() - self.position;
        let count = batch.capacity().min(remaining);
        batch.docs[..count].copy_from_slice(&self.docs[self.position..self.position + count]);
        batch.freqs[..count].copy_from_slice(&self.freqs[self.position..self.position + count]);
        batch.count = count;
        self.position += count;
        count
    }
}

#[cfg(test)]
mod tests {

    use super::BufferedFields;
    use index::{Fields, SeekStatus, Terms, TermsEnum};
    use indexer::TermAccumulator;
    use postings::PostingsEnum;
    use schema::{IndexRecordOption, SchemaBuilder};
    use NO_MORE_DOCS;

    fn sample_accumulator() -> (TermAccumulator, ::schema::Field) {
        let mut schema_builder = SchemaBuilder::new();
        let field = schema_builder.add_field("content", IndexRecordOption::WithFreqs);
        let schema = schema_builder.build();
        let mut accumulator = TermAccumulator::new(&schema);
        accumulator.record(field, b"banana", 0);
        accumulator.record(field, b"apple", 1);
        accumulator.record(field, b"apple", 1);
        accumulator.record(field, b"cherry", 2);
        (accumulator, field)
    }

    #[test]
    fn test_terms_enum_iteration() {
        let (accumulator, field) = sample_accumulator();
        let buffered_fields = BufferedFields::new(&accumulator);
        assert_eq!(buffered_fields.fields(), vec![field]);
        let terms = buffered_fields.terms(field).unwrap();
        assert_eq!(terms.size(), 3);
        assert_eq!(terms.doc_count(), 3);
        assert_eq!(terms.sum_total_term_freq(), 4);
        assert_eq!(terms.sum_doc_freq(), 3);
        let mut terms_enum = terms.iterator();
        assert!(terms_enum.term().is_err());
        assert!(terms_enum.next());
        assert_eq!(terms_enum.term().unwrap(), &b"apple"[..]);
        assert_eq!(terms_enum.doc_freq().unwrap(), 1);
        assert_eq!(terms_enum.total_term_freq().unwrap(), 2);
        assert!(terms_enum.next());
        assert!(terms_enum.next());
        assert_eq!(terms_enum.term().unwrap(), &b"cherry"[..]);
        assert!(!terms_enum.next());
        assert!(terms_enum.term().is_err());
    }

    #[test]
    fn test_seeks() {
        let (accumulator, field) = sample_accumulator();
        let buffered_fields = BufferedFields::new(&accumulator);
        let terms = buffered_fields.terms(field).unwrap();
        let mut terms_enum = terms.iterator();
        assert!(terms_enum.seek_exact(b"banana"));
        assert_eq!(terms_enum.term().unwrap(), &b"banana"[..]);
        assert!(!terms_enum.seek_exact(b"blueberry"));
        // failed exact seek leaves the cursor unchanged.
        assert_eq!(terms_enum.term().unwrap(), &b"banana"[..]);
        assert_eq!(terms_enum.seek_ceil(b"b"), SeekStatus::NotFound);
        assert_eq!(terms_enum.term().unwrap(), &b"banana"[..]);
        assert_eq!(terms_enum.seek_ceil(b"cherry"), SeekStatus::Found);
        assert_eq!(terms_enum.seek_ceil(b"zebra"), SeekStatus::End);
        assert!(terms_enum.term().is_err());
    }

    #[test]
    fn test_postings_from_positioned_cursor() {
        let (accumulator, field) = sample_accumulator();
        let buffered_fields = BufferedFields::new(&accumulator);
        let terms = buffered_fields.terms(field).unwrap();
        let mut terms_enum = terms.iterator();
        assert!(terms_enum.postings().is_err());
        assert!(terms_enum.seek_exact(b"apple"));
        let mut postings = terms_enum.postings().unwrap();
        assert_eq!(postings.cost(), 1);
        assert_eq!(postings.next_doc(), 1);
        assert_eq!(postings.freq(), 2);
        assert_eq!(postings.next_doc(), NO_MORE_DOCS);
    }

    #[test]
    fn test_empty_field_has_no_terms() {
        let mut schema_builder = SchemaBuilder::new();
        let indexed = schema_builder.add_field("indexed", IndexRecordOption::WithFreqs);
        let unindexed = schema_builder.add_field("unindexed", IndexRecordOption::Unindexed);
        let schema = schema_builder.build();
        let accumulator = TermAccumulator::new(&schema);
        let buffered_fields = BufferedFields::new(&accumulator);
        assert!(buffered_fields.fields().is_empty());
        assert!(buffered_fields.terms(indexed).is_none());
        assert!(buffered_fields.terms(unindexed).is_none());
    }

    #[test]
    fn test_seek_ceil_on_empty_terms() {
        let mut schema_builder = SchemaBuilder::new();
        let field = schema_builder.add_field("content", IndexRecordOption::WithFreqs);
        let schema = schema_builder.build();
        let mut accumulator = TermAccumulator::new(&schema);
        accumulator.record(field, b"only", 0);
        let buffered_fields = BufferedFields::new(&accumulator);
        let terms = buffered_fields.terms(field).unwrap();
        let mut terms_enum = terms.iterator();
        // target above the single term: End.
        assert_eq!(terms_enum.seek_ceil(b"z"), SeekStatus::End);
        // target equal to the last term: Found.
        assert_eq!(terms_enum.seek_ceil(b"only"), SeekStatus::Found);
    }
}

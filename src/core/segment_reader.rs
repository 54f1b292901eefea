use byteorder::{BigEndian, ByteOrder};
use common::{BinarySerializable, VInt};
use core::{Segment, SegmentComponent};
use directory::{ReadOnlySource, SourceRead};
use error::{ErrorKind, Result};
use index::{Cursor, Fields, SeekStatus, Terms, TermsEnum};
use postings::{SegmentPostings, TermState, FORMAT_VERSION, POSTINGS_MAGIC, TERM_DICT_MAGIC};
use schema::Field;

/// Terms of one field, loaded from the term dictionary.
struct FieldTerms {
    field: Field,
    has_freqs: bool,
    doc_count: u32,
    sum_total_term_freq: u64,
    sum_doc_freq: u64,
    /// Sorted by term bytes.
    terms: Vec<(Vec<u8>, TermState)>,
}

impl FieldTerms {
    fn lookup(&self, term: &[u8]) -> Option<TermState> {
        self.terms
            .binary_search_by(|&(ref entry_term, _)| entry_term[..].cmp(term))
            .ok()
            .map(|ord| self.terms[ord].1)
    }
}

/// The read side of a finalized segment.
///
/// `open` loads the whole term dictionary into per-field sorted tables;
/// postings themselves stay in their file and are traversed through
/// `SegmentPostings` cursors. A reader is cheap to share: every cursor
/// it hands out clones a view of the postings source, so any number of
/// traversals may run concurrently against the same sealed files.
pub struct SegmentReader {
    postings_source: ReadOnlySource,
    fields: Vec<FieldTerms>,
}

fn check_header(source: &ReadOnlySource, expected_magic: u32, file_kind: &str) -> Result<()> {
    let bytes = source.as_slice();
    if bytes.len() < 5 {
        return Err(
            ErrorKind::CorruptEncoding(format!("truncated {} file header", file_kind)).into(),
        );
    }
    if BigEndian::read_u32(bytes) != expected_magic {
        return Err(ErrorKind::CorruptEncoding(format!("bad {} file magic", file_kind)).into());
    }
    if bytes[4] != FORMAT_VERSION {
        return Err(ErrorKind::CorruptEncoding(format!(
            "unsupported {} file version {}",
            file_kind, bytes[4]
        )).into());
    }
    Ok(())
}

impl SegmentReader {
    /// Opens the segment, validating both file headers and loading the
    /// term dictionary.
    pub fn open(segment: &Segment) -> Result<SegmentReader> {
        let postings_source = segment.open_read(SegmentComponent::Postings)?;
        check_header(&postings_source, POSTINGS_MAGIC, "postings")?;
        let terms_source = segment.open_read(SegmentComponent::Terms)?;
        check_header(&terms_source, TERM_DICT_MAGIC, "term dictionary")?;

        let mut read = SourceRead::from(terms_source);
        read.seek(5);
        let mut fields: Vec<FieldTerms> = Vec::new();
        while read.remaining() > 0 {
            let field_id = VInt::deserialize(&mut read)?.val() as u32;
            let has_freqs_byte = u8::deserialize(&mut read)?;
            if has_freqs_byte > 1 {
                return Err(ErrorKind::CorruptEncoding(format!(
                    "invalid hasFreqs byte {} in term dictionary",
                    has_freqs_byte
                )).into());
            }
            let num_terms = VInt::deserialize(&mut read)?.val();
            let doc_count = VInt::deserialize(&mut read)?.val() as u32;
            let sum_total_term_freq = VInt::deserialize(&mut read)?.val();
            let sum_doc_freq = VInt::deserialize(&mut read)?.val();
            let mut terms: Vec<(Vec<u8>, TermState)> = Vec::new();
            for _ in 0..num_terms {
                let term_len = VInt::deserialize(&mut read)?.val() as usize;
                let mut term = vec![0u8; term_len];
                read.read_bytes(&mut term)?;
                let term_state = TermState::deserialize(&mut read)?;
                if term_state.num_blocks != TermState::blocks_for(term_state.doc_freq) {
                    return Err(ErrorKind::CorruptEncoding(
                        "term block count does not match its doc freq".to_string(),
                    ).into());
                }
                if term_state.has_freqs != (has_freqs_byte == 1) {
                    return Err(ErrorKind::CorruptEncoding(
                        "term freq flag does not match its field".to_string(),
                    ).into());
                }
                if let Some(&(ref previous_term, _)) = terms.last() {
                    if *previous_term >= term {
                        return Err(ErrorKind::CorruptEncoding(
                            "term dictionary is not sorted".to_string(),
                        ).into());
                    }
                }
                terms.push((term, term_state));
            }
            fields.push(FieldTerms {
                field: Field(field_id),
                has_freqs: has_freqs_byte == 1,
                doc_count: doc_count,
                sum_total_term_freq: sum_total_term_freq,
                sum_doc_freq: sum_doc_freq,
                terms: terms,
            });
        }
        debug!("opened segment {:?}: {} fields", segment.id(), fields.len());
        Ok(SegmentReader {
            postings_source: postings_source,
            fields: fields,
        })
    }

    fn field_terms(&self, field: Field) -> Option<&FieldTerms> {
        self.fields.iter().find(|field_terms| field_terms.field == field)
    }

    /// Serialized indexed fields, in declaration order.
    pub fn fields(&self) -> Vec<Field> {
        self.fields.iter().map(|field_terms| field_terms.field).collect()
    }

    /// Returns the terms of a field, or `None` if the field was absent
    /// or not indexed at write time.
    pub fn terms(&self, field: Field) -> Option<SegmentTerms> {
        let field_terms = get!(self.field_terms(field));
        Some(SegmentTerms {
            field_terms: field_terms,
            postings_source: &self.postings_source,
        })
    }

    /// Returns the term metadata associated with the term.
    pub fn get_term_state(&self, field: Field, term: &[u8]) -> Option<TermState> {
        let field_terms = get!(self.field_terms(field));
        field_terms.lookup(term)
    }

    /// Returns the number of documents containing the term.
    pub fn doc_freq(&self, field: Field, term: &[u8]) -> u32 {
        self.get_term_state(field, term)
            .map(|term_state| term_state.doc_freq)
            .unwrap_or(0u32)
    }

    /// Opens a postings cursor for the term, or `None` if the term has
    /// never been indexed.
    pub fn read_postings(&self, field: Field, term: &[u8]) -> Option<SegmentPostings> {
        let term_state = get!(self.get_term_state(field, term));
        Some(self.read_postings_from_term_state(term_state))
    }

    /// Opens a postings cursor straight from term metadata. Advanced
    /// use, for callers caching `TermState`s.
    pub fn read_postings_from_term_state(&self, term_state: TermState) -> SegmentPostings {
        SegmentPostings::open(
            SourceRead::from(self.postings_source.clone()),
            term_state,
        )
    }
}

impl<'a> Fields for &'a SegmentReader {
    type TermsImpl = SegmentTerms<'a>;

    fn fields(&self) -> Vec<Field> {
        SegmentReader::fields(self)
    }

    fn terms(&self, field: Field) -> Option<SegmentTerms<'a>> {
        let reader: &'a SegmentReader = *self;
        reader.terms(field)
    }
}

/// Term statistics of one field of a finalized segment.
pub struct SegmentTerms<'a> {
    field_terms: &'a FieldTerms,
    postings_source: &'a ReadOnlySource,
}

impl<'a> SegmentTerms<'a> {
    /// Whether the field records term frequencies. When false, every
    /// traversal reports a frequency of 1.
    pub fn has_freqs(&self) -> bool {
        self.field_terms.has_freqs
    }
}

impl<'a> Terms for SegmentTerms<'a> {
    type Iter = SegmentTermsEnum<'a>;

    fn iterator(&self) -> SegmentTermsEnum<'a> {
        SegmentTermsEnum {
            field_terms: self.field_terms,
            postings_source: self.postings_source,
            cursor: Cursor::BeforeFirst,
        }
    }

    fn size(&self) -> u64 {
        self.field_terms.terms.len() as u64
    }

    fn doc_count(&self) -> u32 {
        self.field_terms.doc_count
    }

    fn sum_total_term_freq(&self) -> u64 {
        self.field_terms.sum_total_term_freq
    }

    fn sum_doc_freq(&self) -> u64 {
        self.field_terms.sum_doc_freq
    }
}

/// Lexicographic cursor over the terms of one on-disk field.
pub struct SegmentTermsEnum<'a> {
    field_terms: &'a FieldTerms,
    postings_source: &'a ReadOnlySource,
    cursor: Cursor,
}

impl<'a> SegmentTermsEnum<'a> {
    fn entry(&self) -> Result<&'a (Vec<u8>, TermState)> {
        let ord = self.cursor.position()?;
        Ok(&self.field_terms.terms[ord])
    }

    fn search(&self, target: &[u8]) -> ::std::result::Result<usize, usize> {
        self.field_terms
            .terms
            .binary_search_by(|&(ref term, _)| term[..].cmp(target))
    }
}

impl<'a> TermsEnum for SegmentTermsEnum<'a> {
    type Postings = SegmentPostings;
    type BatchPostings = SegmentPostings;

    fn next(&mut self) -> bool {
        let num_terms = self.field_terms.terms.len();
        self.cursor = match self.cursor {
            Cursor::BeforeFirst => {
                if num_terms == 0 {
                    Cursor::End
                } else {
                    Cursor::Positioned(0)
                }
            }
            Cursor::Positioned(ord) => {
                if ord + 1 < num_terms {
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
        match self.search(target) {
            Ok(ord) => {
                self.cursor = Cursor::Positioned(ord);
                true
            }
            Err(_) => false,
        }
    }

    fn seek_ceil(&mut self, target: &[u8]) -> SeekStatus {
        match self.search(target) {
            Ok(ord) => {
                self.cursor = Cursor::Positioned(ord);
                SeekStatus::Found
            }
            Err(ord) => {
                if ord < self.field_terms.terms.len() {
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
        Ok(&self.entry()?.0)
    }

    fn doc_freq(&self) -> Result<u32> {
        Ok(self.entry()?.1.doc_freq)
    }

    fn total_term_freq(&self) -> Result<u64> {
        Ok(self.entry()?.1.total_term_freq)
    }

    fn postings(&self) -> Result<SegmentPostings> {
        let term_state = self.entry()?.1;
        Ok(SegmentPostings::open(
            SourceRead::from(self.postings_source.clone()),
            term_state,
        ))
    }

    fn batch_postings(&self) -> Result<SegmentPostings> {
        self.postings()
    }
}

#[cfg(test)]
mod tests {

    use super::SegmentReader;
    use core::{Segment, SegmentComponent, SegmentId};
    use directory::RAMDirectory;
    use index::{Fields, Terms, TermsEnum};
    use indexer::{BufferedFields, SegmentWriter, TermAccumulator};
    use schema::{Document, Field, IndexRecordOption, Schema, SchemaBuilder};

    fn indexed_segment() -> (Segment, Schema, Field) {
        let mut schema_builder = SchemaBuilder::new();
        let field = schema_builder.add_field("content", IndexRecordOption::WithFreqs);
        let schema = schema_builder.build();
        let segment = Segment::new(
            Box::new(RAMDirectory::create()),
            SegmentId::generate_random(),
        );
        let mut segment_writer = SegmentWriter::for_segment(segment, &schema);
        for &tokens in &[
            &[&b"apple"[..], &b"pie"[..]][..],
            &[&b"apple"[..]][..],
            &[&b"pie"[..], &b"crust"[..]][..],
        ] {
            let mut doc = Document::new();
            for token in tokens {
                doc.add_token(field, token);
            }
            segment_writer.add_document(&doc);
        }
        (segment_writer.finalize().unwrap(), schema, field)
    }

    #[test]
    fn test_field_statistics_survive_round_trip() {
        let (segment, _schema, field) = indexed_segment();
        let reader = SegmentReader::open(&segment).unwrap();
        let terms = reader.terms(field).unwrap();
        assert_eq!(terms.size(), 3);
        assert_eq!(terms.doc_count(), 3);
        assert_eq!(terms.sum_total_term_freq(), 5);
        assert_eq!(terms.sum_doc_freq(), 5);
    }

    #[test]
    fn test_same_counts_through_both_pull_apis() {
        // generic over the pull hierarchy: the in-memory view and the
        // on-disk reader answer identically.
        fn dump<F: Fields>(fields: &F, field: Field) -> Vec<(Vec<u8>, u32, u64)> {
            let mut result = Vec::new();
            if let Some(terms) = fields.terms(field) {
                let mut terms_enum = terms.iterator();
                while terms_enum.next() {
                    result.push((
                        terms_enum.term().unwrap().to_vec(),
                        terms_enum.doc_freq().unwrap(),
                        terms_enum.total_term_freq().unwrap(),
                    ));
                }
            }
            result
        }

        let mut schema_builder = SchemaBuilder::new();
        let field = schema_builder.add_field("content", IndexRecordOption::WithFreqs);
        let schema = schema_builder.build();
        let mut accumulator = TermAccumulator::new(&schema);
        for (doc, &term) in [&b"b"[..], b"a", b"b", b"c"].iter().enumerate() {
            accumulator.record(field, term, doc as i32);
        }
        let from_memory = dump(&BufferedFields::new(&accumulator), field);

        let segment = Segment::new(
            Box::new(RAMDirectory::create()),
            SegmentId::generate_random(),
        );
        let mut segment_writer = SegmentWriter::for_segment(segment, &schema);
        for &term in &[&b"b"[..], b"a", b"b", b"c"] {
            let mut doc = Document::new();
            doc.add_token(field, term);
            segment_writer.add_document(&doc);
        }
        let segment = segment_writer.finalize().unwrap();
        let reader = SegmentReader::open(&segment).unwrap();
        let from_disk = dump(&&reader, field);

        assert_eq!(from_memory, from_disk);
    }

    #[test]
    fn test_bad_magic_is_rejected() {
        let directory = RAMDirectory::create();
        let segment = Segment::new(
            Box::new(directory.clone()),
            SegmentId::generate_random(),
        );
        let mut schema_builder = SchemaBuilder::new();
        let field = schema_builder.add_field("content", IndexRecordOption::WithFreqs);
        let schema = schema_builder.build();
        let mut segment_writer = SegmentWriter::for_segment(segment, &schema);
        let mut doc = Document::new();
        doc.add_token(field, b"token");
        segment_writer.add_document(&doc);
        let segment = segment_writer.finalize().unwrap();
        let postings_path = segment.relative_path(SegmentComponent::Postings);
        let mut data = {
            use directory::Directory;
            directory.open_read(&postings_path).unwrap().as_slice().to_vec()
        };
        data[0] = b'X';
        directory.write_file(&postings_path, data);
        assert!(SegmentReader::open(&segment).is_err());
    }
}

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use common::{BinarySerializable, CountingWriter, VInt};
use core::{Segment, SegmentComponent};
use directory::WritePtr;
use error::Result;
use postings::{TermState, ALIGNMENT, BLOCK_SIZE, FORMAT_VERSION, POSTINGS_MAGIC, TERM_DICT_MAGIC};
use schema::{Field, IndexRecordOption};
use std::io::Write;
use DocId;

const ZERO_PADDING: [u8; ALIGNMENT as usize] = [0u8; ALIGNMENT as usize];

/// `PostingsSerializer` is in charge of serializing postings on disk,
/// in the
/// * `.doc` (postings blocks)
/// * `.term` (term dictionary)
///
/// The serializer expects to receive the following calls in this order:
///
/// * `new_field(...)`
/// * `new_term(...)`
/// * `write_doc(...)`
/// * `write_doc(...)`
/// * ...
/// * `close_term()`
/// * `new_term(...)`
/// * ...
/// * `close_term()`
/// * `close_field()`
/// * `new_field(...)`
/// * ...
/// * `close()`
///
/// Terms have to be pushed in lexicographic byte order. Within a term,
/// documents have to be pushed in strictly increasing doc id order.
///
/// Postings go out as fixed-shape blocks of up to 16 absolute doc ids,
/// each block padded to the next 64-byte boundary, so that the reader
/// can load a block straight into a SIMD register. No delta encoding is
/// applied to doc ids.
pub struct PostingsSerializer {
    postings_write: CountingWriter<WritePtr>,
    terms_write: CountingWriter<WritePtr>,
    doc_buffer: [u32; BLOCK_SIZE],
    freq_buffer: [u32; BLOCK_SIZE],
    buffer_len: usize,
    has_freqs: bool,
    field_open: bool,
    term_open: bool,
    current_term: Vec<u8>,
    last_term: Vec<u8>,
    doc_start_fp: u64,
    doc_freq: u32,
    total_term_freq: u64,
    num_blocks: u32,
    last_doc: DocId,
}

impl PostingsSerializer {
    /// Opens a new `PostingsSerializer` for the given segment and writes
    /// the file headers.
    ///
    /// The postings header is padded to the first 64-byte boundary so
    /// that every block start is cache-line aligned, both absolutely
    /// and relative to the end of the header.
    pub fn open(segment: &mut Segment) -> Result<PostingsSerializer> {
        let postings_write = segment.open_write(SegmentComponent::Postings)?;
        let mut postings_write = CountingWriter::wrap(postings_write);
        postings_write.write_u32::<BigEndian>(POSTINGS_MAGIC)?;
        postings_write.write_u8(FORMAT_VERSION)?;
        let header_padding = ALIGNMENT - postings_write.written_bytes();
        postings_write.write_all(&ZERO_PADDING[..header_padding as usize])?;

        let terms_write = segment.open_write(SegmentComponent::Terms)?;
        let mut terms_write = CountingWriter::wrap(terms_write);
        terms_write.write_u32::<BigEndian>(TERM_DICT_MAGIC)?;
        terms_write.write_u8(FORMAT_VERSION)?;

        Ok(PostingsSerializer {
            postings_write: postings_write,
            terms_write: terms_write,
            doc_buffer: [0u32; BLOCK_SIZE],
            freq_buffer: [0u32; BLOCK_SIZE],
            buffer_len: 0,
            has_freqs: true,
            field_open: false,
            term_open: false,
            current_term: Vec::new(),
            last_term: Vec::new(),
            doc_start_fp: 0,
            doc_freq: 0,
            total_term_freq: 0,
            num_blocks: 0,
            last_doc: -1,
        })
    }

    /// Starts the terms of a new field, writing the field's framing
    /// record to the term dictionary.
    ///
    /// Field statistics are maintained incrementally by the accumulator
    /// and are simply persisted here.
    pub fn new_field(
        &mut self,
        field: Field,
        record_option: IndexRecordOption,
        num_terms: u64,
        doc_count: u32,
        sum_total_term_freq: u64,
        sum_doc_freq: u64,
    ) -> Result<()> {
        if self.field_open {
            panic!("Called new_field, while the previous field was not closed.");
        }
        self.field_open = true;
        self.has_freqs = record_option.has_freq();
        self.last_term.clear();
        VInt(u64::from(field.field_id())).serialize(&mut self.terms_write)?;
        let has_freqs_byte: u8 = if self.has_freqs { 1 } else { 0 };
        has_freqs_byte.serialize(&mut self.terms_write)?;
        VInt(num_terms).serialize(&mut self.terms_write)?;
        VInt(u64::from(doc_count)).serialize(&mut self.terms_write)?;
        VInt(sum_total_term_freq).serialize(&mut self.terms_write)?;
        VInt(sum_doc_freq).serialize(&mut self.terms_write)?;
        Ok(())
    }

    /// Starts the postings for a new term.
    ///
    /// `term` needs to come after the previous term of the field in
    /// lexicographic byte order.
    pub fn new_term(&mut self, term: &[u8]) -> Result<()> {
        if !self.field_open {
            panic!("Called new_term outside of a field.");
        }
        if self.term_open {
            panic!("Called new_term, while the previous term was not closed.");
        }
        debug_assert!(
            self.last_term.is_empty() || &self.last_term[..] < term,
            "terms must arrive in lexicographic order"
        );
        self.term_open = true;
        self.current_term.clear();
        self.current_term.extend_from_slice(term);
        self.doc_start_fp = self.postings_write.written_bytes();
        self.doc_freq = 0;
        self.total_term_freq = 0;
        self.num_blocks = 0;
        self.buffer_len = 0;
        self.last_doc = -1;
        Ok(())
    }

    /// Serializes the information that a document contains the current
    /// term, with the given term frequency.
    ///
    /// Doc ids must be pushed in strictly increasing order.
    pub fn write_doc(&mut self, doc_id: DocId, term_freq: u32) -> Result<()> {
        debug_assert!(self.term_open);
        debug_assert!(doc_id > self.last_doc, "doc ids must be strictly increasing");
        debug_assert!(term_freq >= 1);
        self.last_doc = doc_id;
        self.doc_buffer[self.buffer_len] = doc_id as u32;
        self.freq_buffer[self.buffer_len] = term_freq;
        self.buffer_len += 1;
        self.doc_freq += 1;
        self.total_term_freq += u64::from(term_freq);
        if self.buffer_len == BLOCK_SIZE {
            self.write_block()?;
        }
        Ok(())
    }

    /// Finishes the serialization of the current term postings and
    /// appends the term's record to the term dictionary.
    ///
    /// A short final block is zero-filled up to the full block shape;
    /// its header carries the true count.
    pub fn close_term(&mut self) -> Result<()> {
        if !self.term_open {
            return Ok(());
        }
        if self.buffer_len > 0 {
            self.write_block()?;
        }
        let total_term_freq = if self.has_freqs {
            self.total_term_freq
        } else {
            u64::from(self.doc_freq)
        };
        let term_state = TermState {
            doc_start_fp: self.doc_start_fp,
            doc_freq: self.doc_freq,
            total_term_freq: total_term_freq,
            num_blocks: self.num_blocks,
            has_freqs: self.has_freqs,
        };
        debug_assert_eq!(term_state.num_blocks, TermState::blocks_for(term_state.doc_freq));
        VInt(self.current_term.len() as u64).serialize(&mut self.terms_write)?;
        self.terms_write.write_all(&self.current_term)?;
        term_state.serialize(&mut self.terms_write)?;
        self.last_term.clear();
        self.last_term.extend_from_slice(&self.current_term);
        self.term_open = false;
        Ok(())
    }

    /// Finishes the current field.
    pub fn close_field(&mut self) -> Result<()> {
        if self.term_open {
            panic!("Called close_field, while a term was still open.");
        }
        self.field_open = false;
        Ok(())
    }

    /// Closes the serializer, flushing both files.
    pub fn close(mut self) -> Result<()> {
        self.close_term()?;
        self.postings_write.finish()?;
        self.terms_write.finish()?;
        Ok(())
    }

    fn write_block(&mut self) -> Result<()> {
        for slot in self.buffer_len..BLOCK_SIZE {
            self.doc_buffer[slot] = 0;
            self.freq_buffer[slot] = 0;
        }
        self.postings_write.write_u8(self.buffer_len as u8)?;
        let has_freqs_byte: u8 = if self.has_freqs { 1 } else { 0 };
        self.postings_write.write_u8(has_freqs_byte)?;
        self.postings_write.write_all(&ZERO_PADDING[..6])?;
        for &doc in self.doc_buffer.iter() {
            self.postings_write.write_u32::<LittleEndian>(doc)?;
        }
        if self.has_freqs {
            for &freq in self.freq_buffer.iter() {
                self.postings_write.write_u32::<LittleEndian>(freq)?;
            }
        }
        let fp = self.postings_write.written_bytes();
        let padding = (ALIGNMENT - fp % ALIGNMENT) % ALIGNMENT;
        self.postings_write.write_all(&ZERO_PADDING[..padding as usize])?;
        self.num_blocks += 1;
        self.buffer_len = 0;
        Ok(())
    }
}

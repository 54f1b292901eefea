use byteorder::{ByteOrder, LittleEndian};
use directory::SourceRead;
use error::{Error, ErrorKind, Result};
use postings::{BatchPostingsEnum, PostingsBatch, PostingsEnum, TermState, ALIGNMENT, BLOCK_SIZE};
use DocId;
use NO_MORE_DOCS;

/// Postings cursor over one term's on-disk block run.
///
/// The cursor keeps one decoded block buffered; both the one-at-a-time
/// and the batch traversal consume from that buffer and refill it block
/// by block. Blocks hold absolute doc ids, so refilling is a plain copy
/// with no delta decoding.
///
/// A corrupt block terminates the traversal: the cursor reports
/// `NO_MORE_DOCS` (or an empty batch) and records the error for
/// [`error()`](#method.error) inspection. It never tries to
/// re-synchronize mid-stream.
pub struct SegmentPostings {
    input: SourceRead,
    term_state: TermState,
    doc: DocId,
    current_freq: u32,
    docs_read: u32,
    blocks_read: u32,
    block_doc_count: usize,
    buffer_pos: usize,
    doc_buffer: [u32; BLOCK_SIZE],
    freq_buffer: [u32; BLOCK_SIZE],
    error: Option<Error>,
}

impl SegmentPostings {
    /// Opens a cursor over `(input, term_state)`, seeking to the term's
    /// first block. `input` must cover the postings file the term was
    /// written to.
    pub fn open(mut input: SourceRead, term_state: TermState) -> SegmentPostings {
        input.seek(term_state.doc_start_fp);
        SegmentPostings {
            input: input,
            term_state: term_state,
            doc: -1,
            current_freq: 1,
            docs_read: 0,
            blocks_read: 0,
            block_doc_count: 0,
            buffer_pos: 0,
            doc_buffer: [0u32; BLOCK_SIZE],
            freq_buffer: [0u32; BLOCK_SIZE],
            error: None,
        }
    }

    /// Error that terminated the traversal, if any.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn term_state(&self) -> &TermState {
        &self.term_state
    }

    fn read_next_block(&mut self) -> Result<usize> {
        if self.blocks_read >= self.term_state.num_blocks {
            return Ok(0);
        }
        let block_size = self.input.read_byte()? as usize;
        if block_size < 1 || block_size > BLOCK_SIZE {
            return Err(
                ErrorKind::CorruptEncoding(format!("block size {} out of range", block_size))
                    .into(),
            );
        }
        let has_freqs_byte = self.input.read_byte()?;
        if has_freqs_byte > 1 {
            return Err(ErrorKind::CorruptEncoding(format!(
                "invalid hasFreqs byte {}",
                has_freqs_byte
            )).into());
        }
        if (has_freqs_byte == 1) != self.term_state.has_freqs {
            return Err(ErrorKind::CorruptEncoding(
                "block hasFreqs flag does not match term metadata".to_string(),
            ).into());
        }
        let mut reserved = [0u8; 6];
        self.input.read_bytes(&mut reserved)?;
        if reserved.iter().any(|&byte| byte != 0) {
            return Err(
                ErrorKind::CorruptEncoding("non-zero reserved block bytes".to_string()).into(),
            );
        }
        let mut raw = [0u8; BLOCK_SIZE * 4];
        self.input.read_bytes(&mut raw)?;
        LittleEndian::read_u32_into(&raw, &mut self.doc_buffer);
        if self.term_state.has_freqs {
            self.input.read_bytes(&mut raw)?;
            LittleEndian::read_u32_into(&raw, &mut self.freq_buffer);
        } else {
            for freq in self.freq_buffer.iter_mut() {
                *freq = 1;
            }
        }
        // absorb the padding up to the next cache line.
        self.input.align_to(ALIGNMENT);
        self.blocks_read += 1;
        self.block_doc_count = block_size;
        self.buffer_pos = 0;
        Ok(block_size)
    }

    /// Refills the block buffer, returning 0 on exhaustion or error.
    fn refill(&mut self) -> usize {
        match self.read_next_block() {
            Ok(count) => count,
            Err(error) => {
                warn!("terminating postings traversal: {}", error);
                if self.error.is_none() {
                    self.error = Some(error);
                }
                self.blocks_read = self.term_state.num_blocks;
                self.block_doc_count = 0;
                self.buffer_pos = 0;
                0
            }
        }
    }
}

impl PostingsEnum for SegmentPostings {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> DocId {
        if self.docs_read >= self.term_state.doc_freq {
            self.doc = NO_MORE_DOCS;
            return NO_MORE_DOCS;
        }
        if self.buffer_pos >= self.block_doc_count {
            if self.refill() == 0 {
                self.doc = NO_MORE_DOCS;
                return NO_MORE_DOCS;
            }
        }
        self.doc = self.doc_buffer[self.buffer_pos] as DocId;
        self.current_freq = self.freq_buffer[self.buffer_pos];
        self.buffer_pos += 1;
        self.docs_read += 1;
        self.doc
    }

    fn freq(&self) -> u32 {
        self.current_freq
    }

    fn cost(&self) -> u64 {
        u64::from(self.term_state.doc_freq)
    }
}

impl BatchPostingsEnum for SegmentPostings {
    fn next_batch(&mut self, batch: &mut PostingsBatch) -> usize {
        batch.count = 0;
        let capacity = batch.capacity();
        while batch.count < capacity && self.docs_read < self.term_state.doc_freq {
            if self.buffer_pos >= self.block_doc_count {
                if self.refill() == 0 {
                    break;
                }
            }
            let available = self.block_doc_count - self.buffer_pos;
            let count = available.min(capacity - batch.count);
            for i in 0..count {
                batch.docs[batch.count + i] = self.doc_buffer[self.buffer_pos + i] as DocId;
            }
            batch.freqs[batch.count..batch.count + count]
                .copy_from_slice(&self.freq_buffer[self.buffer_pos..self.buffer_pos + count]);
            batch.count += count;
            self.buffer_pos += count;
            self.docs_read += count as u32;
        }
        batch.count
    }
}

#[cfg(test)]
mod tests {

    use super::SegmentPostings;
    use byteorder::{LittleEndian, WriteBytesExt};
    use directory::{ReadOnlySource, SourceRead};
    use postings::{BatchPostingsEnum, PostingsBatch, PostingsEnum, TermState, ALIGNMENT};
    use NO_MORE_DOCS;

    /// Builds a postings buffer holding one term: a 64-byte header
    /// region followed by aligned blocks of 16 docs.
    fn block_run(docs: &[u32], freqs: Option<&[u32]>) -> (Vec<u8>, TermState) {
        let has_freqs = freqs.is_some();
        let mut buffer = vec![0u8; ALIGNMENT as usize];
        for (block_index, chunk) in docs.chunks(16).enumerate() {
            buffer.push(chunk.len() as u8);
            buffer.push(if has_freqs { 1 } else { 0 });
            buffer.extend_from_slice(&[0u8; 6]);
            for slot in 0..16 {
                let doc = chunk.get(slot).cloned().unwrap_or(0);
                buffer.write_u32::<LittleEndian>(doc).unwrap();
            }
            if let Some(freqs) = freqs {
                let base = block_index * 16;
                for slot in 0..16 {
                    let freq = freqs.get(base + slot).cloned().unwrap_or(0);
                    buffer.write_u32::<LittleEndian>(freq).unwrap();
                }
            }
            while buffer.len() % ALIGNMENT as usize != 0 {
                buffer.push(0);
            }
        }
        let term_state = TermState {
            doc_start_fp: ALIGNMENT,
            doc_freq: docs.len() as u32,
            total_term_freq: docs.len() as u64,
            num_blocks: TermState::blocks_for(docs.len() as u32),
            has_freqs: has_freqs,
        };
        (buffer, term_state)
    }

    fn open(buffer: Vec<u8>, term_state: TermState) -> SegmentPostings {
        SegmentPostings::open(SourceRead::from(ReadOnlySource::from(buffer)), term_state)
    }

    #[test]
    fn test_one_at_a_time() {
        let docs: Vec<u32> = (0..21).map(|i| i * 2).collect();
        let freqs: Vec<u32> = (0..21).map(|i| i + 1).collect();
        let (buffer, term_state) = block_run(&docs, Some(&freqs[..]));
        let mut postings = open(buffer, term_state);
        assert_eq!(postings.cost(), 21);
        for i in 0..21 {
            assert_eq!(postings.next_doc(), (i * 2) as i32);
            assert_eq!(postings.doc_id(), (i * 2) as i32);
            assert_eq!(postings.freq(), i as u32 + 1);
        }
        assert_eq!(postings.next_doc(), NO_MORE_DOCS);
        assert_eq!(postings.next_doc(), NO_MORE_DOCS);
        assert!(postings.error().is_none());
    }

    #[test]
    fn test_freqless_run_reads_ones() {
        let docs: Vec<u32> = vec![3, 5, 8];
        let (buffer, term_state) = block_run(&docs, None);
        let mut postings = open(buffer, term_state);
        assert_eq!(postings.next_doc(), 3);
        assert_eq!(postings.freq(), 1);
        assert_eq!(postings.next_doc(), 5);
        assert_eq!(postings.freq(), 1);
    }

    #[test]
    fn test_batch_refill_across_blocks() {
        let docs: Vec<u32> = (0..40).collect();
        let freqs: Vec<u32> = vec![2; 40];
        let (buffer, term_state) = block_run(&docs, Some(&freqs[..]));
        let mut postings = open(buffer, term_state);
        let mut batch = PostingsBatch::with_capacity(12);
        let mut collected: Vec<i32> = Vec::new();
        loop {
            let count = postings.next_batch(&mut batch);
            if count == 0 {
                break;
            }
            assert!(batch.freqs().iter().all(|&freq| freq == 2));
            collected.extend_from_slice(batch.docs());
        }
        let expected: Vec<i32> = (0..40).collect();
        assert_eq!(collected, expected);
    }

    #[test]
    fn test_corrupt_block_size() {
        let docs: Vec<u32> = vec![1, 2, 3];
        let (mut buffer, term_state) = block_run(&docs, Some(&[1, 1, 1][..]));
        buffer[64] = 17;
        let mut postings = open(buffer, term_state);
        assert_eq!(postings.next_doc(), NO_MORE_DOCS);
        assert!(postings.error().is_some());
    }

    #[test]
    fn test_corrupt_reserved_bytes() {
        let docs: Vec<u32> = vec![1, 2, 3];
        let (mut buffer, term_state) = block_run(&docs, Some(&[1, 1, 1][..]));
        buffer[64 + 5] = 0xAB;
        let mut postings = open(buffer, term_state);
        assert_eq!(postings.next_doc(), NO_MORE_DOCS);
        assert!(postings.error().is_some());
    }

    #[test]
    fn test_freq_flag_mismatch() {
        let docs: Vec<u32> = vec![1, 2, 3];
        let (buffer, mut term_state) = block_run(&docs, Some(&[1, 1, 1][..]));
        term_state.has_freqs = false;
        let mut postings = open(buffer, term_state);
        assert_eq!(postings.next_doc(), NO_MORE_DOCS);
        assert!(postings.error().is_some());
    }

    #[test]
    fn test_truncated_block() {
        let docs: Vec<u32> = vec![1, 2, 3];
        let (mut buffer, term_state) = block_run(&docs, Some(&[1, 1, 1][..]));
        buffer.truncate(100);
        let mut postings = open(buffer, term_state);
        assert_eq!(postings.next_doc(), NO_MORE_DOCS);
        assert!(postings.error().is_some());
        let mut batch = PostingsBatch::with_capacity(8);
        assert_eq!(postings.next_batch(&mut batch), 0);
    }
}

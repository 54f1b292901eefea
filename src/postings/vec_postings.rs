use postings::{BatchPostingsEnum, PostingsBatch, PostingsEnum};
use DocId;
use NO_MORE_DOCS;

/// Postings cursor over in-memory vectors.
///
/// Mostly useful to express tests and to back small synthetic posting
/// lists; the real read path is `SegmentPostings`.
pub struct VecPostings {
    docs: Vec<DocId>,
    freqs: Vec<u32>,
    position: usize,
    doc: DocId,
    freq: u32,
}

impl VecPostings {
    /// Builds a cursor over parallel doc and freq vectors.
    pub fn with_freqs(docs: Vec<DocId>, freqs: Vec<u32>) -> VecPostings {
        assert_eq!(docs.len(), freqs.len());
        VecPostings {
            docs: docs,
            freqs: freqs,
            position: 0,
            doc: -1,
            freq: 1,
        }
    }
}

impl From<Vec<DocId>> for VecPostings {
    /// All frequencies default to 1.
    fn from(docs: Vec<DocId>) -> VecPostings {
        let freqs = vec![1u32; docs.len()];
        VecPostings::with_freqs(docs, freqs)
    }
}

impl PostingsEnum for VecPostings {
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

impl BatchPostingsEnum for VecPostings {
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

use DocId;

/// Caller-owned batch of decoded postings.
///
/// `docs` and `freqs` are parallel arrays sized once at construction;
/// slots `[0, count)` hold a contiguous run of postings in list order.
/// Iterators filling a batch write into the existing buffers and never
/// reallocate them, so a batch can be handed to SIMD scoring code that
/// assumes stable addresses.
pub struct PostingsBatch {
    pub docs: Vec<DocId>,
    pub freqs: Vec<u32>,
    pub count: usize,
}

impl PostingsBatch {
    /// Creates a batch able to hold `capacity` postings. Typical
    /// capacities are 8 or 16, matching SIMD lane counts.
    pub fn with_capacity(capacity: usize) -> PostingsBatch {
        assert!(capacity > 0);
        PostingsBatch {
            docs: vec![0; capacity],
            freqs: vec![0; capacity],
            count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.docs.len()
    }

    /// Doc ids of the filled slots.
    pub fn docs(&self) -> &[DocId] {
        &self.docs[..self.count]
    }

    /// Frequencies of the filled slots.
    pub fn freqs(&self) -> &[u32] {
        &self.freqs[..self.count]
    }
}

#[cfg(test)]
mod tests {

    use super::PostingsBatch;

    #[test]
    fn test_capacity_and_views() {
        let mut batch = PostingsBatch::with_capacity(8);
        assert_eq!(batch.capacity(), 8);
        assert_eq!(batch.docs(), &[] as &[i32]);
        batch.docs[0] = 7;
        batch.freqs[0] = 2;
        batch.count = 1;
        assert_eq!(batch.docs(), &[7]);
        assert_eq!(batch.freqs(), &[2]);
        assert_eq!(batch.capacity(), 8);
    }
}

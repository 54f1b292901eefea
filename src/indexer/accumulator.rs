use itertools::Itertools;
use schema::{Field, Schema};
use std::collections::HashMap;
use DocId;

/// Per-field statistics, maintained incrementally as observations are
/// recorded. They are never recomputed by scanning posting lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldStats {
    /// Total number of token observations for the field.
    pub sum_total_term_freq: u64,
    /// Sum of `doc_freq` over the field's terms.
    pub sum_doc_freq: u64,
    /// Number of distinct documents holding at least one term of the
    /// field.
    pub doc_count: u32,
}

/// Growing posting list of one `(field, term)` pair.
///
/// Doc ids and frequencies are kept in parallel vectors; consecutive
/// observations of the same document are coalesced into its frequency.
pub struct PostingList {
    docs: Vec<DocId>,
    freqs: Vec<u32>,
    total_term_freq: u64,
}

impl PostingList {
    fn with_first_doc(doc_id: DocId) -> PostingList {
        PostingList {
            docs: vec![doc_id],
            freqs: vec![1],
            total_term_freq: 1,
        }
    }

    /// Records one more occurrence, returning true iff `doc_id` is new
    /// for this term.
    fn record(&mut self, doc_id: DocId) -> bool {
        debug_assert!(
            self.docs.last().map(|&last| last <= doc_id).unwrap_or(true),
            "doc ids must not decrease"
        );
        self.total_term_freq += 1;
        if self.docs.last() == Some(&doc_id) {
            *self.freqs.last_mut().expect("freqs parallel to docs") += 1;
            false
        } else {
            self.docs.push(doc_id);
            self.freqs.push(1);
            true
        }
    }

    pub fn doc_freq(&self) -> u32 {
        self.docs.len() as u32
    }

    pub fn total_term_freq(&self) -> u64 {
        self.total_term_freq
    }

    pub fn docs(&self) -> &[DocId] {
        &self.docs
    }

    pub fn freqs(&self) -> &[u32] {
        &self.freqs
    }
}

struct FieldData {
    terms: HashMap<Vec<u8>, PostingList>,
    stats: FieldStats,
    last_doc: DocId,
}

impl FieldData {
    fn new() -> FieldData {
        FieldData {
            terms: HashMap::new(),
            stats: FieldStats::default(),
            last_doc: -1,
        }
    }
}

/// In-memory term accumulator for one flush epoch.
///
/// During indexing it receives `(field, term, doc)` observations; at
/// flush, `BufferedFields` exposes its content as the sorted pull API.
/// Entries are only appended to until the flush, after which the whole
/// accumulator is discarded with its epoch.
///
/// `record` is infallible for well-formed inputs; feeding decreasing
/// doc ids or an unindexed field is a caller bug, trapped in debug
/// builds.
pub struct TermAccumulator {
    schema: Schema,
    fields: Vec<FieldData>,
}

impl TermAccumulator {
    pub fn new(schema: &Schema) -> TermAccumulator {
        let fields = (0..schema.num_fields()).map(|_| FieldData::new()).collect();
        TermAccumulator {
            schema: schema.clone(),
            fields: fields,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Records one token observation.
    ///
    /// If `(term, doc_id)` matches the most recent observation for the
    /// term, its frequency is bumped; otherwise a `(doc_id, 1)` posting
    /// is appended.
    pub fn record(&mut self, field: Field, term: &[u8], doc_id: DocId) {
        debug_assert!(
            self.schema.get_field_entry(field).is_indexed(),
            "recording a token for an unindexed field"
        );
        debug_assert!(doc_id >= 0);
        let field_data = &mut self.fields[field.field_id() as usize];
        field_data.stats.sum_total_term_freq += 1;
        if !field_data.terms.contains_key(term) {
            field_data
                .terms
                .insert(term.to_vec(), PostingList::with_first_doc(doc_id));
            field_data.stats.sum_doc_freq += 1;
        } else {
            let posting_list = field_data
                .terms
                .get_mut(term)
                .expect("term checked above");
            if posting_list.record(doc_id) {
                field_data.stats.sum_doc_freq += 1;
            }
        }
        if field_data.last_doc != doc_id {
            field_data.last_doc = doc_id;
            field_data.stats.doc_count += 1;
        }
    }

    /// The field's terms in lexicographic byte order, computed on
    /// demand.
    pub fn sorted_terms(&self, field: Field) -> Vec<&[u8]> {
        self.fields[field.field_id() as usize]
            .terms
            .keys()
            .map(|term| &term[..])
            .sorted()
            .collect()
    }

    /// Read-only view over the posting list of `(field, term)`.
    pub fn posting_list(&self, field: Field, term: &[u8]) -> Option<&PostingList> {
        self.fields[field.field_id() as usize].terms.get(term)
    }

    pub fn field_stats(&self, field: Field) -> FieldStats {
        self.fields[field.field_id() as usize].stats
    }

    pub fn num_terms(&self, field: Field) -> u64 {
        self.fields[field.field_id() as usize].terms.len() as u64
    }

    pub fn has_terms(&self, field: Field) -> bool {
        !self.fields[field.field_id() as usize].terms.is_empty()
    }
}

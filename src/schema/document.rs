use schema::Field;

/// Pre-tokenized document.
///
/// Tokenization is the responsibility of the caller: a document is the
/// ordered list of `(field, token)` observations to feed to the term
/// accumulator. The same token may appear several times, which is how
/// within-document term frequencies build up.
#[derive(Clone, Debug, Default)]
pub struct Document {
    tokens: Vec<(Field, Vec<u8>)>,
}

impl Document {
    pub fn new() -> Document {
        Document::default()
    }

    /// Appends one token observation for `field`.
    pub fn add_token<T: AsRef<[u8]>>(&mut self, field: Field, token: T) {
        self.tokens.push((field, token.as_ref().to_vec()));
    }

    pub fn tokens(&self) -> &[(Field, Vec<u8>)] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

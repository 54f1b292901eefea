use common::{BinarySerializable, VInt};
use postings::BLOCK_SIZE;
use std::io;
use std::io::{Read, Write};

/// Per-term metadata recorded in the term dictionary.
///
/// Plain data with no external references: produced by the postings
/// writer, persisted in the term dictionary, and handed to the reader
/// to open a postings cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TermState {
    /// File pointer of the term's first postings block.
    pub doc_start_fp: u64,
    /// Number of documents containing the term.
    pub doc_freq: u32,
    /// Sum of the term's frequencies over all documents. Equal to
    /// `doc_freq` when frequencies are not recorded.
    pub total_term_freq: u64,
    /// Number of postings blocks, `ceil(doc_freq / 16)`.
    pub num_blocks: u32,
    /// Whether the blocks carry a frequency array.
    pub has_freqs: bool,
}

impl TermState {
    /// Number of blocks needed for `doc_freq` postings.
    pub fn blocks_for(doc_freq: u32) -> u32 {
        (doc_freq + BLOCK_SIZE as u32 - 1) / BLOCK_SIZE as u32
    }
}

const HAS_FREQS_FLAG: u8 = 1;

impl BinarySerializable for TermState {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        let mut written = self.doc_start_fp.serialize(writer)?;
        written += VInt(u64::from(self.doc_freq)).serialize(writer)?;
        written += VInt(self.total_term_freq).serialize(writer)?;
        written += VInt(u64::from(self.num_blocks)).serialize(writer)?;
        let flags: u8 = if self.has_freqs { HAS_FREQS_FLAG } else { 0 };
        written += flags.serialize(writer)?;
        Ok(written)
    }

    fn deserialize<R: Read>(reader: &mut R) -> io::Result<TermState> {
        let doc_start_fp = u64::deserialize(reader)?;
        let doc_freq = VInt::deserialize(reader)?.val() as u32;
        let total_term_freq = VInt::deserialize(reader)?.val();
        let num_blocks = VInt::deserialize(reader)?.val() as u32;
        let flags = u8::deserialize(reader)?;
        Ok(TermState {
            doc_start_fp: doc_start_fp,
            doc_freq: doc_freq,
            total_term_freq: total_term_freq,
            num_blocks: num_blocks,
            has_freqs: flags & HAS_FREQS_FLAG != 0,
        })
    }
}

#[cfg(test)]
mod tests {

    use super::TermState;
    use common::BinarySerializable;

    #[test]
    fn test_blocks_for() {
        assert_eq!(TermState::blocks_for(0), 0);
        assert_eq!(TermState::blocks_for(1), 1);
        assert_eq!(TermState::blocks_for(16), 1);
        assert_eq!(TermState::blocks_for(17), 2);
        assert_eq!(TermState::blocks_for(32), 2);
        assert_eq!(TermState::blocks_for(33), 3);
    }

    #[test]
    fn test_serialization_round_trip() {
        let term_state = TermState {
            doc_start_fp: 64 * 7,
            doc_freq: 33,
            total_term_freq: 71,
            num_blocks: 3,
            has_freqs: true,
        };
        let mut buffer: Vec<u8> = Vec::new();
        let written = term_state.serialize(&mut buffer).unwrap();
        assert_eq!(written, buffer.len());
        let deserialized = TermState::deserialize(&mut &buffer[..]).unwrap();
        assert_eq!(deserialized, term_state);
    }
}

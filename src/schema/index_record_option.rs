/// Describes what is recorded for a field in the inverted index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexRecordOption {
    /// The field does not appear in the inverted index at all.
    #[serde(rename = "unindexed")]
    Unindexed,
    /// Only the documents containing each term are recorded.
    /// Readers report a frequency of 1 for every posting.
    #[serde(rename = "basic")]
    Basic,
    /// Documents and within-document term frequencies are recorded.
    #[serde(rename = "freq")]
    WithFreqs,
}

impl IndexRecordOption {
    pub fn is_indexed(&self) -> bool {
        *self != IndexRecordOption::Unindexed
    }

    pub fn has_freq(&self) -> bool {
        *self == IndexRecordOption::WithFreqs
    }
}

#[cfg(test)]
mod tests {

    use super::IndexRecordOption;

    #[test]
    fn test_json_names() {
        let json = ::serde_json::to_string(&IndexRecordOption::WithFreqs).unwrap();
        assert_eq!(json, "\"freq\"");
        let option: IndexRecordOption = ::serde_json::from_str("\"basic\"").unwrap();
        assert_eq!(option, IndexRecordOption::Basic);
    }
}

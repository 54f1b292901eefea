use schema::IndexRecordOption;

/// Name and indexing configuration of one field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    name: String,
    record_option: IndexRecordOption,
}

impl FieldEntry {
    pub fn new(name: String, record_option: IndexRecordOption) -> FieldEntry {
        FieldEntry {
            name: name,
            record_option: record_option,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record_option(&self) -> IndexRecordOption {
        self.record_option
    }

    pub fn is_indexed(&self) -> bool {
        self.record_option.is_indexed()
    }
}

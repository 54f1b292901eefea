use schema::{Field, FieldEntry, IndexRecordOption};

/// Immutable list of field declarations, in declaration order.
///
/// Schemas serialize to JSON so that a segment's field configuration can
/// be persisted next to its data files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<FieldEntry>,
}

impl Schema {
    pub fn fields(&self) -> &[FieldEntry] {
        &self.fields
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn get_field_entry(&self, field: Field) -> &FieldEntry {
        &self.fields[field.0 as usize]
    }

    /// Looks a field up by name.
    pub fn get_field(&self, field_name: &str) -> Option<Field> {
        self.fields
            .iter()
            .position(|entry| entry.name() == field_name)
            .map(|field_id| Field(field_id as u32))
    }
}

/// Accumulates field declarations and builds the `Schema`.
pub struct SchemaBuilder {
    fields: Vec<FieldEntry>,
}

impl SchemaBuilder {
    pub fn new() -> SchemaBuilder {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Declares a new field and returns its handle.
    pub fn add_field(&mut self, name: &str, record_option: IndexRecordOption) -> Field {
        let field = Field(self.fields.len() as u32);
        self.fields.push(FieldEntry::new(name.to_string(), record_option));
        field
    }

    pub fn build(self) -> Schema {
        Schema {
            fields: self.fields,
        }
    }
}

impl Default for SchemaBuilder {
    fn default() -> SchemaBuilder {
        SchemaBuilder::new()
    }
}

/// Handle on a field of the schema.
///
/// The wrapped ordinal is the field's position in declaration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Field(pub u32);

impl Field {
    pub fn field_id(&self) -> u32 {
        self.0
    }
}

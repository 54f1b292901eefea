mod counting_writer;
mod serialize;

pub mod sortable;
pub mod vint;

pub use self::counting_writer::CountingWriter;
pub use self::serialize::{BinarySerializable, VInt};

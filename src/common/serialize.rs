use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use common::vint;
use std::io;
use std::io::{Read, Write};

/// Objects that can be serialized to, and deserialized from,
/// a stream of bytes.
///
/// `serialize` returns the number of bytes written, so that callers
/// tracking file pointers do not need to wrap every writer in a
/// counting adapter.
pub trait BinarySerializable: Sized {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<usize>;
    fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self>;
}

impl BinarySerializable for u8 {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        writer.write_u8(*self)?;
        Ok(1)
    }
    fn deserialize<R: Read>(reader: &mut R) -> io::Result<u8> {
        reader.read_u8()
    }
}

impl BinarySerializable for u32 {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        writer.write_u32::<LittleEndian>(*self)?;
        Ok(4)
    }
    fn deserialize<R: Read>(reader: &mut R) -> io::Result<u32> {
        reader.read_u32::<LittleEndian>()
    }
}

impl BinarySerializable for u64 {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        writer.write_u64::<LittleEndian>(*self)?;
        Ok(8)
    }
    fn deserialize<R: Read>(reader: &mut R) -> io::Result<u64> {
        reader.read_u64::<LittleEndian>()
    }
}

/// Variable-length integer, encoded with the VByte scheme
/// of `common::vint`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VInt(pub u64);

impl VInt {
    pub fn val(&self) -> u64 {
        self.0
    }
}

impl BinarySerializable for VInt {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        let mut buffer = [0u8; vint::MAX_U64_VINT_LEN];
        let num_bytes = vint::encode_u64(self.0, &mut buffer);
        writer.write_all(&buffer[..num_bytes])?;
        Ok(num_bytes)
    }

    fn deserialize<R: Read>(reader: &mut R) -> io::Result<VInt> {
        let mut value = 0u64;
        let mut shift = 0u32;
        for _ in 0..vint::MAX_U64_VINT_LEN {
            let byte = reader.read_u8()?;
            value |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(VInt(value));
            }
            shift += 7;
        }
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "overlong varint",
        ))
    }
}

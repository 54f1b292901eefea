use std::io;
use std::io::Write;

/// Writer wrapper keeping track of the number of bytes written.
///
/// The postings and term-dictionary serializers use the running count as
/// the file pointer recorded in term metadata, so the count is maintained
/// in `u64` like every other file pointer.
pub struct CountingWriter<W> {
    underlying_writer: W,
    written_bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    pub fn wrap(underlying_writer: W) -> CountingWriter<W> {
        CountingWriter {
            underlying_writer: underlying_writer,
            written_bytes: 0,
        }
    }

    pub fn written_bytes(&self) -> u64 {
        self.written_bytes
    }

    /// Flushes the underlying writer and returns it.
    pub fn finish(mut self) -> io::Result<W> {
        self.underlying_writer.flush()?;
        Ok(self.underlying_writer)
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.underlying_writer.write(buf)?;
        self.written_bytes += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.underlying_writer.flush()
    }
}

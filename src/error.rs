use std::io;

error_chain! {
    foreign_links {
        Io(io::Error);
    }

    errors {
        // Truncated varint or group, impossible control data, bad block
        // header, or a magic/version mismatch. Fatal for the affected
        // traversal.
        CorruptEncoding(msg: String) {
            description("corrupt encoding")
            display("corrupt encoding: {}", msg)
        }
        // A mark or row index outside of the valid range.
        OutOfRange(msg: String) {
            description("out of range")
            display("out of range: {}", msg)
        }
        // A cursor accessor was called while the cursor was not
        // positioned on an entry.
        InvalidCursor(msg: String) {
            description("invalid cursor")
            display("invalid cursor: {}", msg)
        }
    }
}

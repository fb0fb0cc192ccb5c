use byteorder::WriteBytesExt;

use crate::error;

/// Binary primitive I/O over a growable in-memory buffer.
///
/// The whole serialized tree is built up here before the compression frame
/// ever sees it; `Vec<u8>`'s own amortized-doubling growth gives us the
/// "grow geometrically when full" behavior without any bookkeeping.
pub(crate) struct Writer {
    buffer: Vec<u8>,
}

macro_rules! put_number_types {
    ($($typ:ident),+) => {
        paste::item! {
            $(pub(crate) fn [<put_ $typ>](&mut self, n: $typ) -> error::Result<()> {
                self.buffer.[<write_ $typ>]::<byteorder::BigEndian>(n)?;
                Ok(())
            })*
        }
    };
}

impl Writer {
    pub(crate) fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    put_number_types!(i16, i32, i64, f32, f64);

    pub(crate) fn put_byte(&mut self, n: u8) -> error::Result<()> {
        self.buffer.write_u8(n)?;
        Ok(())
    }

    // Separated from the number type macro since a single byte has no endianness.
    pub(crate) fn put_i8(&mut self, n: i8) -> error::Result<()> {
        self.buffer.write_i8(n)?;
        Ok(())
    }

    pub(crate) fn put_bytes(&mut self, bytes: &[u8]) -> error::Result<()> {
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    /// Writes a length-prefixed byte string with an unsigned 16-bit length,
    /// used for tag names and the String payload.
    pub(crate) fn put_short_bytes(&mut self, bytes: &[u8]) -> error::Result<()> {
        self.buffer.write_u16::<byteorder::BigEndian>(bytes.len() as u16)?;
        self.put_bytes(bytes)
    }

    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

use crate::error::{Error, Result};
use byteorder::ReadBytesExt;
use std::io::{self, Cursor};

/// Binary primitive I/O over an in-memory, already-decompressed buffer.
///
/// Everything the tag codec reads comes through here; there is no
/// direct `std::io::Read` in the recursive parser itself, matching the
/// "buffer the whole decompressed input first" design.
pub(crate) struct Reader<'a> {
    cursor: Cursor<&'a [u8]>,
}

// Macro for generating parsing function implementations of number types.
macro_rules! get_number_types {
    ($($typ:ident),+) => {
        paste::item! {
            $(pub(crate) fn [<get_ $typ>](&mut self) -> Result<$typ> {
                Ok(self.cursor.[<read_ $typ>]::<byteorder::BigEndian>()?)
            })*
        }
    };
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buffer: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(buffer),
        }
    }

    get_number_types!(i16, i32, i64, f32, f64);

    pub(crate) fn get_byte(&mut self) -> Result<u8> {
        Ok(self.cursor.read_u8()?)
    }

    // Separated from the number type macro since a single byte has no endianness.
    pub(crate) fn get_i8(&mut self) -> Result<i8> {
        Ok(self.cursor.read_i8()?)
    }

    /// Reads `len` bytes, rejecting `len` up front if it exceeds the bytes
    /// actually remaining in the buffer rather than eagerly allocating a
    /// `len`-sized buffer for an attacker-chosen length.
    pub(crate) fn get_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(Error::MalformedLength(len as i64));
        }
        let mut buffer = vec![0u8; len];
        io::Read::read_exact(&mut self.cursor, &mut buffer)?;
        Ok(buffer)
    }

    fn remaining(&self) -> usize {
        let total = self.cursor.get_ref().len();
        total.saturating_sub(self.cursor.position() as usize)
    }

    /// Reads a 32-bit signed length prefix, rejecting negative values
    /// instead of treating them as an enormous unsigned count. Used for
    /// array lengths, where a negative length is always a malformed
    /// stream.
    pub(crate) fn get_length(&mut self) -> Result<usize> {
        let len = self.get_i32()?;
        if len < 0 {
            return Err(Error::MalformedLength(len as i64));
        }
        Ok(len as usize)
    }

    /// Reads the 32-bit signed element count of a List tag. Per the wire
    /// format, a non-positive count (including negative values some
    /// writers emit for an empty list) means the list is empty; the
    /// element-type byte has already been read by the caller regardless.
    pub(crate) fn get_list_length(&mut self) -> Result<usize> {
        let len = self.get_i32()?;
        Ok(len.max(0) as usize)
    }

    /// Reads the unsigned 16-bit length prefix used by names and String
    /// payloads.
    pub(crate) fn get_short_length(&mut self) -> Result<usize> {
        Ok(self.cursor.read_u16::<byteorder::BigEndian>()? as usize)
    }
}

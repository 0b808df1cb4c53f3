//! Byte reader with bounded operations.

use crate::error::{ByteError, ByteResult};
use crate::zigzag::zigzag_decode;
use crate::Width;

/// A forward-only byte reader for decoding compact binary data.
///
/// The reader borrows its input for its whole lifetime, so the source cannot
/// change underneath a decode. All reads are bounds-checked and the position
/// never moves backward. The reader never panics on malformed input.
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` over a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the number of bytes remaining to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the number of bytes consumed so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Removes and returns the next byte.
    pub fn read_byte(&mut self) -> ByteResult<u8> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(ByteError::BufferUnderrun {
                requested: 1,
                available: 0,
            })?;
        self.pos += 1;
        Ok(byte)
    }

    /// Removes and returns up to `n` bytes.
    ///
    /// Returns fewer than `n` bytes if the input is exhausted. Length-prefixed
    /// decodes must use [`read_exact`](Self::read_exact) instead.
    pub fn read_bytes(&mut self, n: usize) -> &'a [u8] {
        let take = n.min(self.remaining());
        let bytes = &self.data[self.pos..self.pos + take];
        self.pos += take;
        bytes
    }

    /// Removes and returns exactly `n` bytes.
    ///
    /// Consumes nothing on failure.
    pub fn read_exact(&mut self, n: usize) -> ByteResult<&'a [u8]> {
        let available = self.remaining();
        if n > available {
            return Err(ByteError::BufferUnderrun {
                requested: n,
                available,
            });
        }
        Ok(self.read_bytes(n))
    }

    /// Reads an unsigned LEB128 varint of the given width class.
    ///
    /// # Errors
    ///
    /// Returns [`ByteError::BadVarint`] if the varint is longer than the width
    /// allows or its final group overflows the width, and
    /// [`ByteError::BufferUnderrun`] if the input ends before the final group.
    pub fn read_varint(&mut self, width: Width) -> ByteResult<u128> {
        let max_bytes = width.varint_max_bytes();
        let mut value = 0u128;
        for i in 0..max_bytes {
            let byte = self.read_byte()?;
            value |= u128::from(byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                if i == max_bytes - 1 && byte > width.max_of_last_varint_byte() {
                    return Err(ByteError::BadVarint { width });
                }
                return Ok(value);
            }
        }
        Err(ByteError::BadVarint { width })
    }

    /// Reads an unsigned integer of the given width class.
    pub fn read_uint(&mut self, width: Width) -> ByteResult<u128> {
        match width {
            Width::W1 => self.read_byte().map(u128::from),
            _ => self.read_varint(width),
        }
    }

    /// Reads a signed integer of the given width class.
    pub fn read_int(&mut self, width: Width) -> ByteResult<i128> {
        match width {
            Width::W1 => self.read_byte().map(|byte| i128::from(byte as i8)),
            _ => self.read_varint(width).map(zigzag_decode),
        }
    }

    /// Reads a boolean; any nonzero byte is `true`.
    pub fn read_bool(&mut self) -> ByteResult<bool> {
        Ok(self.read_byte()? != 0)
    }

    /// Reads a little-endian `f32`.
    pub fn read_f32(&mut self) -> ByteResult<f32> {
        self.read_array::<4>().map(f32::from_le_bytes)
    }

    /// Reads a little-endian `f64`.
    pub fn read_f64(&mut self) -> ByteResult<f64> {
        self.read_array::<8>().map(f64::from_le_bytes)
    }

    /// Reads a container length prefix.
    pub fn read_len(&mut self) -> ByteResult<usize> {
        let len = self.read_varint(Width::LENGTH)?;
        usize::try_from(len).map_err(|_| ByteError::LengthOverflow { length: len })
    }

    fn read_array<const N: usize>(&mut self) -> ByteResult<[u8; N]> {
        let bytes = self.read_exact(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}

//! Byte writer for encoding compact binary data.

use crate::error::{ByteError, ByteResult};
use crate::zigzag::zigzag_encode;
use crate::Width;

/// An append-only byte writer.
///
/// Writes are accumulated in an internal buffer. Call [`finish`](Self::finish)
/// to get the final byte buffer. Raw byte writes never fail; the primitive
/// encoders fail only when a value does not fit its width class.
#[derive(Debug, Default)]
pub struct ByteWriter {
    bytes: Vec<u8>,
}

impl ByteWriter {
    /// Creates a new empty `ByteWriter`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `ByteWriter` with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
        }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn bytes_written(&self) -> usize {
        self.bytes.len()
    }

    /// Returns the bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Appends one byte.
    pub fn write_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Appends all bytes in order.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Writes an unsigned LEB128 varint.
    ///
    /// # Errors
    ///
    /// Returns [`ByteError::UnsignedOutOfRange`] if `value` exceeds `width`.
    pub fn write_varint(&mut self, value: u128, width: Width) -> ByteResult<()> {
        if !width.fits_unsigned(value) {
            return Err(ByteError::UnsignedOutOfRange { value, width });
        }
        let mut value = value;
        loop {
            let group = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                self.write_byte(group);
                return Ok(());
            }
            self.write_byte(group | 0x80);
        }
    }

    /// Writes an unsigned integer of the given width class.
    ///
    /// Single-byte integers are written raw; wider ones as varints.
    pub fn write_uint(&mut self, value: u128, width: Width) -> ByteResult<()> {
        match width {
            Width::W1 => {
                let byte = u8::try_from(value)
                    .map_err(|_| ByteError::UnsignedOutOfRange { value, width })?;
                self.write_byte(byte);
                Ok(())
            }
            _ => self.write_varint(value, width),
        }
    }

    /// Writes a signed integer of the given width class.
    ///
    /// Single-byte integers are written as raw two's complement; wider ones
    /// are zigzagged and written as varints.
    pub fn write_int(&mut self, value: i128, width: Width) -> ByteResult<()> {
        if !width.fits_signed(value) {
            return Err(ByteError::SignedOutOfRange { value, width });
        }
        match width {
            Width::W1 => {
                self.write_byte(value as i8 as u8);
                Ok(())
            }
            _ => self.write_varint(zigzag_encode(value, width), width),
        }
    }

    /// Writes a boolean as a single `0` or `1` byte.
    pub fn write_bool(&mut self, value: bool) {
        self.write_byte(u8::from(value));
    }

    /// Writes an `f32` as 4 little-endian bytes.
    pub fn write_f32(&mut self, value: f32) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes an `f64` as 8 little-endian bytes.
    pub fn write_f64(&mut self, value: f64) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes a container length prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ByteError::LengthOverflow`] if `len` exceeds `u32::MAX`.
    pub fn write_len(&mut self, len: usize) -> ByteResult<()> {
        let len = len as u128;
        if !Width::LENGTH.fits_unsigned(len) {
            return Err(ByteError::LengthOverflow { length: len });
        }
        self.write_varint(len, Width::LENGTH)
    }

    /// Finishes writing and returns the byte buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }

    /// Finishes writing and appends to the provided buffer.
    pub fn finish_into(mut self, buf: &mut Vec<u8>) {
        buf.append(&mut self.bytes);
    }
}

//! Length-prefixed text, byte arrays, sequences and maps.
//!
//! Every variable-length container starts with a `u32`-class varint holding
//! its element (or byte) count. Elements are encoded by a caller-supplied
//! function, so these helpers know nothing about element types.

use crate::error::{ByteError, ByteResult};
use crate::reader::ByteReader;
use crate::writer::ByteWriter;

impl ByteWriter {
    /// Writes text as a char count followed by one byte per char.
    ///
    /// Only Latin-1 is representable: each char is truncated to its low
    /// 8 bits.
    pub fn write_str(&mut self, value: &str) -> ByteResult<()> {
        self.write_len(value.chars().count())?;
        for c in value.chars() {
            self.write_byte(u32::from(c) as u8);
        }
        Ok(())
    }

    /// Writes a byte array as a length followed by the raw bytes.
    pub fn write_byte_array(&mut self, bytes: &[u8]) -> ByteResult<()> {
        self.write_len(bytes.len())?;
        self.write_bytes(bytes);
        Ok(())
    }

    /// Writes an element count followed by each element.
    pub fn write_seq<I, E, F>(&mut self, items: I, per_item: F) -> Result<(), E>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        E: From<ByteError>,
        F: FnMut(&mut Self, I::Item) -> Result<(), E>,
    {
        let items = items.into_iter();
        self.write_len(items.len())?;
        self.write_seq_fixed(items, per_item)
    }

    /// Writes each element with no length prefix.
    pub fn write_seq_fixed<I, E, F>(&mut self, items: I, mut per_item: F) -> Result<(), E>
    where
        I: IntoIterator,
        F: FnMut(&mut Self, I::Item) -> Result<(), E>,
    {
        for item in items {
            per_item(self, item)?;
        }
        Ok(())
    }

    /// Writes an entry count followed by each key and value, in the
    /// iteration order of `entries`.
    pub fn write_map<K, V, I, E, F>(&mut self, entries: I, mut per_entry: F) -> Result<(), E>
    where
        I: IntoIterator<Item = (K, V)>,
        I::IntoIter: ExactSizeIterator,
        E: From<ByteError>,
        F: FnMut(&mut Self, K, V) -> Result<(), E>,
    {
        let entries = entries.into_iter();
        self.write_len(entries.len())?;
        for (key, value) in entries {
            per_entry(self, key, value)?;
        }
        Ok(())
    }
}

impl<'a> ByteReader<'a> {
    /// Reads length-prefixed text written by [`ByteWriter::write_str`].
    pub fn read_str(&mut self) -> ByteResult<String> {
        let len = self.read_len()?;
        let bytes = self.read_exact(len)?;
        Ok(bytes.iter().copied().map(char::from).collect())
    }

    /// Reads a length-prefixed byte array.
    pub fn read_byte_array(&mut self) -> ByteResult<&'a [u8]> {
        let len = self.read_len()?;
        self.read_exact(len)
    }

    /// Reads an element count, then that many elements.
    pub fn read_seq<T, E, F>(&mut self, per_item: F) -> Result<Vec<T>, E>
    where
        E: From<ByteError>,
        F: FnMut(&mut Self) -> Result<T, E>,
    {
        let len = self.read_len()?;
        self.read_seq_fixed(len, per_item)
    }

    /// Reads exactly `len` elements with no length prefix.
    pub fn read_seq_fixed<T, E, F>(&mut self, len: usize, mut per_item: F) -> Result<Vec<T>, E>
    where
        F: FnMut(&mut Self) -> Result<T, E>,
    {
        // Every element that carries data occupies at least one byte.
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            items.push(per_item(self)?);
        }
        Ok(items)
    }

    /// Reads an entry count, then that many key/value pairs, inserting them
    /// into a fresh collection in read order.
    pub fn read_map<C, K, V, E, F>(&mut self, mut per_entry: F) -> Result<C, E>
    where
        C: Default + Extend<(K, V)>,
        E: From<ByteError>,
        F: FnMut(&mut Self) -> Result<(K, V), E>,
    {
        let len = self.read_len()?;
        let mut map = C::default();
        for _ in 0..len {
            let entry = per_entry(self)?;
            map.extend(std::iter::once(entry));
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::Width;

    #[test]
    fn str_hi() {
        let mut writer = ByteWriter::new();
        writer.write_str("Hi").unwrap();
        let bytes = writer.finish();
        assert_eq!(bytes, vec![2, b'H', b'i']);

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_str().unwrap(), "Hi");
        assert!(reader.is_empty());
    }

    #[test]
    fn str_counts_chars_and_truncates_code_points() {
        let mut writer = ByteWriter::new();
        writer.write_str("é\u{141}").unwrap();
        // U+00E9 fits, U+0141 is truncated to 0x41.
        assert_eq!(writer.finish(), vec![2, 0xE9, 0x41]);
    }

    #[test]
    fn str_latin1_roundtrip() {
        let text = "caf\u{e9} \u{a3}5";
        let mut writer = ByteWriter::new();
        writer.write_str(text).unwrap();
        let bytes = writer.finish();
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_str().unwrap(), text);
    }

    #[test]
    fn str_truncated_fails() {
        let mut reader = ByteReader::new(&[2, b'H']);
        assert!(matches!(
            reader.read_str(),
            Err(ByteError::BufferUnderrun {
                requested: 2,
                available: 1
            })
        ));
    }

    #[test]
    fn byte_array() {
        let mut writer = ByteWriter::new();
        writer.write_byte_array(&[0xDE, 0xAD]).unwrap();
        let bytes = writer.finish();
        assert_eq!(bytes, vec![2, 0xDE, 0xAD]);
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_byte_array().unwrap(), &[0xDE, 0xAD]);
    }

    #[test]
    fn seq_of_u16() {
        let values = [1u16, 300, 7];
        let mut writer = ByteWriter::new();
        writer
            .write_seq(values, |w, v| w.write_uint(u128::from(v), Width::W2))
            .unwrap();
        let bytes = writer.finish();
        assert_eq!(bytes, vec![3, 1, 0xAC, 0x02, 7]);

        let mut reader = ByteReader::new(&bytes);
        let decoded: Vec<u128> = reader.read_seq(|r| r.read_uint(Width::W2)).unwrap();
        assert_eq!(decoded, vec![1, 300, 7]);
    }

    #[test]
    fn seq_fixed_has_no_prefix() {
        let mut writer = ByteWriter::new();
        writer
            .write_seq_fixed([1u8, 2, 3], |w, v| {
                w.write_byte(v);
                Ok::<_, ByteError>(())
            })
            .unwrap();
        let bytes = writer.finish();
        assert_eq!(bytes, vec![1, 2, 3]);

        let mut reader = ByteReader::new(&bytes);
        let decoded = reader.read_seq_fixed(3, ByteReader::read_byte).unwrap();
        assert_eq!(decoded, vec![1, 2, 3]);
    }

    #[test]
    fn seq_with_huge_count_fails_without_allocating() {
        let mut reader = ByteReader::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0x0F, 1]);
        let err = reader.read_seq(ByteReader::read_byte).unwrap_err();
        assert!(matches!(err, ByteError::BufferUnderrun { .. }));
    }

    #[test]
    fn map_preserves_entry_order_on_the_wire() {
        let entries = vec![("b", 2u8), ("a", 1u8)];
        let mut writer = ByteWriter::new();
        writer
            .write_map(entries, |w, k, v| {
                w.write_str(k)?;
                w.write_uint(u128::from(v), Width::W1)
            })
            .unwrap();
        let bytes = writer.finish();
        assert_eq!(bytes, vec![2, 1, b'b', 2, 1, b'a', 1]);

        let mut reader = ByteReader::new(&bytes);
        let decoded: BTreeMap<String, u128> = reader
            .read_map(|r| Ok::<_, ByteError>((r.read_str()?, r.read_uint(Width::W1)?)))
            .unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded["a"], 1);
        assert_eq!(decoded["b"], 2);
    }
}

#![no_main]

use bytestream::{ByteReader, Width};
use libfuzzer_sys::fuzz_target;

const WIDTHS: [Width; 5] = [Width::W1, Width::W2, Width::W4, Width::W8, Width::W16];

fuzz_target!(|data: &[u8]| {
    let mut reader = ByteReader::new(data);
    let mut idx = 0usize;

    // Input bytes pick a bounded sequence of operations.
    while idx < data.len() && idx < 1024 {
        let op = data[idx];
        idx += 1;
        let width = WIDTHS[usize::from(op >> 4) % WIDTHS.len()];

        match op % 8 {
            0 => {
                let _ = reader.read_byte();
            }
            1 => {
                let _ = reader.read_varint(width);
            }
            2 => {
                let _ = reader.read_uint(width);
            }
            3 => {
                let _ = reader.read_int(width);
            }
            4 => {
                let _ = reader.read_bool();
            }
            5 => {
                let _ = reader.read_str();
            }
            6 => {
                let _ = reader.read_byte_array();
            }
            _ => {
                let _ = reader.read_f64();
            }
        }
        assert!(reader.position() <= data.len());
    }
});

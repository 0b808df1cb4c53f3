//! Byte cursor and primitive codec for the compak binary format.
//!
//! This crate provides [`ByteWriter`] and [`ByteReader`] together with the
//! format-defining primitives: LEB128 varints bounded by a [`Width`] class,
//! zigzag mapping for signed integers, and length-prefixed text, sequences
//! and maps.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked; varints are bounded by their width.
//! - **No type knowledge** - This crate knows primitive widths, not records or enums.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bytestream::{ByteReader, ByteWriter, Width};
//!
//! let mut writer = ByteWriter::new();
//! writer.write_bool(true);
//! writer.write_uint(300, Width::W2).unwrap();
//! writer.write_str("Hi").unwrap();
//!
//! let bytes = writer.finish();
//! assert_eq!(bytes, [1, 0xAC, 0x02, 2, b'H', b'i']);
//!
//! let mut reader = ByteReader::new(&bytes);
//! assert!(reader.read_bool().unwrap());
//! assert_eq!(reader.read_uint(Width::W2).unwrap(), 300);
//! assert_eq!(reader.read_str().unwrap(), "Hi");
//! ```

mod container;
mod error;
mod reader;
mod width;
mod writer;
mod zigzag;

pub use error::{ByteError, ByteResult};
pub use reader::ByteReader;
pub use width::Width;
pub use writer::ByteWriter;
pub use zigzag::{zigzag_decode, zigzag_encode};

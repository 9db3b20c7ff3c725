//! Streaming bzip2 compression and decompression.
//!
//! Provides safe, checksum-verified encoding and decoding of the bzip2
//! format through the standard `std::io::Read` / `std::io::Write` traits.
//! The decoder is pull driven and tolerates being drained in arbitrary-sized
//! chunks; the encoder is push driven and seals a block only when it fills
//! or on `finish()`. Both are single stream state machines: one instance,
//! one stream, and any checksum or format violation is fatal for that
//! instance.
//!
//! Basic usage:
//!
//! ```no_run
//! use std::io::{Read, Write};
//! use bzip2_stream::{BzDecoder, BzEncoder};
//!
//! let mut encoder = BzEncoder::new(Vec::new(), 9);
//! encoder.write_all(b"hello hello hello").unwrap();
//! let compressed = encoder.finish().unwrap();
//!
//! let mut decoder = BzDecoder::new(compressed.as_slice());
//! let mut restored = Vec::new();
//! decoder.read_to_end(&mut restored).unwrap();
//! assert_eq!(restored, b"hello hello hello");
//! ```

pub mod bitstream;
pub mod bwt_algorithms;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::BzEncoder;
pub use compression::decompress::BzDecoder;
pub use error::BzError;

//! The compression module holds the two stream state machines of the codec.
//!
//! Compression happens in the following steps:
//! - Run Length Encoding 1: Compress all runs of 4-255 identical bytes.
//! - Burrows Wheeler Transform: Sort the data to increase the probability of
//!   runs of identical bytes.
//! - Move To Front + Run Length Encoding 2: Turn local byte recency into
//!   small ranks and collapse the rank-zero runs.
//! - Huffman coding: 2-6 rotating canonical code tables per block.
//!
//! Decompression runs the same pipe backwards, driven by a pull-style
//! `std::io::Read` implementation that decodes one block at a time and
//! verifies every checksum before handing bytes out.
//!
//! [`compress::BzEncoder`] is push driven: bytes buffer through the RLE1
//! stage and a block is emitted only when full or on `finish()`.
//! [`decompress::BzDecoder`] is pull driven and never reads further ahead
//! than the block it is decoding.

pub mod compress;
pub mod compress_block;
pub mod decompress;

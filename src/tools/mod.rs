//! The tools module provides the helper stages shared by the compression and
//! decompression sides of the streaming bzip2 codec.
//!
//! The tools are:
//! - cli: Command line interface for the bzip2 binary.
//! - crc: CRC32 checksums, both block and stream versions.
//! - freq_count: Frequency count over a byte block.
//! - randomize: The legacy block derandomization pass (decode only).
//! - rle1: Run-Length-Encoding phase 1, before the block transform.
//! - rle2_mtf: Move-To-Front transform and Run-Length-Encoding phase 2
//!   (integrated for speed), encode side.
//! - rle2_mtf_decode: The matching decode side.
//! - symbol_map: The two-level in-use symbol bitmap.

pub mod cli;
pub mod crc;
pub mod freq_count;
pub mod randomize;
pub mod rle1;
pub mod rle2_mtf;
pub mod rle2_mtf_decode;
pub mod symbol_map;

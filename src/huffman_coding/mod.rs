//! The huffman module builds and consumes the entropy-coded portion of the
//! bzip2 bitstream.
//!
//! Huffman coding is used in lieu of arithmetic coding because of an
//! historical licensing problem; the format was frozen around it. Within
//! each block, chunks of 50 symbols are coded with one of 2-6 tables, chosen
//! per chunk by a selector stream. That buys a better ratio than a single
//! table per block.
//!
//! - [`code_lengths`]: the length-limited canonical code length allocator,
//!   shared by the encoder and mirrored by the decoder's table builder.
//! - [`encode`]: table refinement, selector generation, and bitstream output.
//! - [`decode`]: `(limit, base, permutation)` tables and one-symbol decoding.

pub mod code_lengths;
pub mod decode;
pub mod encode;

/// Longest code the encoder will produce.
pub const MAX_ENCODE_LEN: u8 = 17;

/// Longest code length the wire format can describe.
pub const MAX_WIRE_LEN: u8 = 20;

/// Hard ceiling any decode table tolerates.
pub const MAX_CODE_LEN: usize = 23;

/// Symbols coded per selector entry.
pub const CHUNK_SIZE: usize = 50;

/// Upper bound on the selector count field.
pub const MAX_SELECTORS: usize = 18002;

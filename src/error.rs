//! Error types for the streaming bzip2 codec.
//!
//! Every failure mode of the format is its own variant so callers can tell a
//! transport problem from a corrupt stream. All of them are fatal for the
//! stream that raised them: the encoder/decoder instance remembers that it
//! failed and refuses further work.

use std::io;
use thiserror::Error;

/// Everything that can go wrong while encoding or decoding a bzip2 stream.
#[derive(Debug, Error)]
pub enum BzError {
    /// The stream does not start with `BZh<1-9>`.
    #[error("not a bzip2 stream: {0}")]
    Format(&'static str),

    /// A block started with neither the block magic nor the end-of-stream magic.
    #[error("corrupt block header")]
    CorruptBlockHeader,

    /// Group count, selector count, selector values, or code lengths are out
    /// of the legal range for the format.
    #[error("invalid huffman tables: {0}")]
    InvalidHuffmanTables(&'static str),

    /// A canonical code read from the stream exceeded the table's maximum
    /// code length.
    #[error("invalid huffman code in bitstream")]
    InvalidHuffmanCode,

    /// The decoded symbol stream expands past the block size declared in the
    /// stream header.
    #[error("decoded data overruns the declared block size")]
    BlockOverrun,

    /// The CRC computed over a fully restored block does not match the value
    /// stored in the block header.
    #[error("block crc mismatch: stored {expected:#010x}, computed {found:#010x}")]
    BlockCrc { expected: u32, found: u32 },

    /// The combined CRC in the stream trailer does not match the value folded
    /// together from the block CRCs.
    #[error("stream crc mismatch: stored {expected:#010x}, computed {found:#010x}")]
    StreamCrc { expected: u32, found: u32 },

    /// The underlying byte source ran dry in the middle of a structure.
    #[error("unexpected end of compressed data")]
    UnexpectedEndOfData,

    /// The stream was already finished, or a previous operation failed.
    #[error("stream is closed or has previously failed")]
    StreamClosed,

    /// The underlying reader or writer failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl From<BzError> for io::Error {
    fn from(err: BzError) -> io::Error {
        match err {
            BzError::Io(inner) => inner,
            other => {
                let kind = match other {
                    BzError::UnexpectedEndOfData => io::ErrorKind::UnexpectedEof,
                    _ => io::ErrorKind::InvalidData,
                };
                io::Error::new(kind, other)
            }
        }
    }
}

impl BzError {
    /// True for errors raised by the codec itself rather than the transport.
    pub fn is_data_error(&self) -> bool {
        !matches!(self, BzError::Io(_))
    }
}

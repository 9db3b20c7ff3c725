//! The push side of the codec: a streaming bzip2 encoder.
//!
//! Source bytes arrive through `std::io::Write`, pass through the phase-1
//! run length encoder into the block buffer, and a block is compressed and
//! emitted whenever the buffer reaches the declared block size. `finish`
//! seals the last block (if any) and writes the stream trailer; an empty
//! input still produces a minimal valid stream.

use std::io::{self, Write};

use log::{debug, info};

use super::compress_block::compress_block;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::BzError;
use crate::tools::crc::{do_crc, do_stream_crc};
use crate::tools::rle1::Rle1Encoder;

/// Refinement passes over each block's coding tables. Four is the classic
/// setting; three gains almost as much on most data.
pub const DEFAULT_ITERATIONS: usize = 4;

/// One block's worth of working state, reused across blocks.
pub struct Block {
    /// RLE1 output on the way in; the block transform replaces it in place.
    pub data: Vec<u8>,
    /// The MTF+RLE2 symbol stream, EOB included.
    pub rle2: Vec<u16>,
    /// Origin pointer from the block transform.
    pub key: u32,
    /// RLE2 symbol frequencies.
    pub freqs: [u32; 258],
    /// Two-level in-use symbol map words.
    pub sym_map: Vec<u16>,
    /// End-of-block symbol (alphabet size minus one).
    pub eob: u16,
    /// 1-based block number within the stream.
    pub seq: u32,
    /// CRC over the source bytes this block covers (pre-RLE1).
    pub block_crc: u32,
}

impl Block {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            rle2: Vec::new(),
            key: 0,
            freqs: [0; 258],
            sym_map: Vec::new(),
            eob: 0,
            seq: 0,
            block_crc: 0,
        }
    }

    /// Make ready for the next block without giving buffers back.
    fn reset(&mut self) {
        self.data.clear();
        self.rle2.clear();
        self.block_crc = 0;
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::new()
    }
}

/// A streaming bzip2 encoder wrapping any byte sink.
///
/// ```no_run
/// use std::io::Write;
/// use bzip2_stream::BzEncoder;
///
/// let mut encoder = BzEncoder::new(Vec::new(), 9);
/// encoder.write_all(b"some data").unwrap();
/// let compressed = encoder.finish().unwrap();
/// # drop(compressed);
/// ```
pub struct BzEncoder<W: Write> {
    bw: BitWriter<W>,
    block: Block,
    rle1: Rle1Encoder,
    block_size: u8,
    /// Post-RLE1 bytes that trigger sealing a block. The slack below the
    /// wire maximum absorbs the run pending in the RLE1 stage.
    capacity: usize,
    stream_crc: u32,
    iterations: usize,
    wrote_header: bool,
    finished: bool,
    errored: bool,
}

impl<W: Write> BzEncoder<W> {
    /// Create an encoder writing to `sink`. `block_size` is the classic 1-9
    /// digit (x 100k bytes per block) and is clamped into that range.
    pub fn new(sink: W, block_size: u8) -> Self {
        let block_size = block_size.clamp(1, 9);
        let max_block = block_size as usize * 100_000;
        Self {
            bw: BitWriter::new(sink, max_block),
            block: Block::new(),
            rle1: Rle1Encoder::new(),
            block_size,
            capacity: max_block - 19,
            stream_crc: 0,
            iterations: DEFAULT_ITERATIONS,
            wrote_header: false,
            finished: false,
            errored: false,
        }
    }

    /// Change the number of coding-table refinement passes (minimum 1).
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    fn write_stream_header(&mut self) {
        self.bw.out8(b'B');
        self.bw.out8(b'Z');
        self.bw.out8(b'h');
        self.bw.out8(self.block_size + 0x30);
        self.wrote_header = true;
    }

    /// Push bytes through RLE1 into the block buffer, sealing full blocks.
    fn feed(&mut self, buf: &[u8]) -> Result<(), BzError> {
        let mut crc_from = 0_usize;
        for (i, &byte) in buf.iter().enumerate() {
            self.rle1.push(byte, &mut self.block.data);
            if self.block.data.len() >= self.capacity {
                // The block CRC covers source bytes, not RLE1 output, so
                // fold in everything consumed up to and including this byte.
                self.block.block_crc = do_crc(self.block.block_crc, &buf[crc_from..=i]);
                crc_from = i + 1;
                self.rle1.finish(&mut self.block.data);
                self.emit_block()?;
            }
        }
        if crc_from < buf.len() {
            self.block.block_crc = do_crc(self.block.block_crc, &buf[crc_from..]);
        }
        Ok(())
    }

    fn emit_block(&mut self) -> Result<(), BzError> {
        if !self.wrote_header {
            self.write_stream_header();
        }
        self.block.seq += 1;
        self.stream_crc = do_stream_crc(self.stream_crc, self.block.block_crc);
        info!(
            "Starting block {} ({} bytes after RLE1).",
            self.block.seq,
            self.block.data.len()
        );
        compress_block(&mut self.bw, &mut self.block, self.iterations)?;
        self.bw.drain()?;
        self.block.reset();
        Ok(())
    }

    fn write_trailer(&mut self) -> Result<(), BzError> {
        // Seal whatever is buffered, then the end-of-stream magic and the
        // combined CRC. Zero input still gets header + trailer.
        self.rle1.finish(&mut self.block.data);
        if !self.block.data.is_empty() {
            self.emit_block()?;
        }
        if !self.wrote_header {
            self.write_stream_header();
        }
        self.bw.out24(0x18_177245);
        self.bw.out24(0x18_385090);
        self.bw.out32(self.stream_crc);
        self.bw.flush()?;
        debug!(
            "Stream finished: {} blocks, combined crc {:#010x}.",
            self.block.seq, self.stream_crc
        );
        Ok(())
    }

    /// Write the final block and the stream trailer, returning the sink.
    /// The encoder is spent afterwards; errors leave the stream unusable.
    pub fn finish(mut self) -> io::Result<W> {
        if self.finished || self.errored {
            return Err(BzError::StreamClosed.into());
        }
        match self.write_trailer() {
            Ok(()) => {
                self.finished = true;
                Ok(self.bw.into_inner())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Blocks emitted so far.
    pub fn blocks_written(&self) -> u32 {
        self.block.seq
    }
}

impl<W: Write> Write for BzEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.finished || self.errored {
            return Err(BzError::StreamClosed.into());
        }
        match self.feed(buf) {
            Ok(()) => Ok(buf.len()),
            Err(e) => {
                self.errored = true;
                Err(e.into())
            }
        }
    }

    /// Flushes completed bytes to the sink. Cannot force out a partial
    /// block: bzip2 has no sync points short of a block boundary.
    fn flush(&mut self) -> io::Result<()> {
        if self.errored {
            return Err(BzError::StreamClosed.into());
        }
        self.bw.flush_sink().map_err(|e| {
            self.errored = true;
            e.into()
        })
    }
}

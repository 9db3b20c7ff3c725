//! The pull side of the codec: a streaming bzip2 decoder.
//!
//! [`BzDecoder`] implements `std::io::Read` over any byte source. Each read
//! serves bytes already decoded; when the buffer drains, the block state
//! machine advances exactly one block (header, tables, symbols, inverse
//! permutation walk, optional derandomization, CRC check) and refills it.
//! Every failure is fatal for the stream: the decoder pins the error state
//! and re-raises on any later call instead of resurrecting a broken machine.

use std::io::{self, Read};

use log::{debug, info};

use crate::bitstream::bitreader::BitReader;
use crate::bwt_algorithms::bwt::bwt_decode;
use crate::error::BzError;
use crate::huffman_coding::decode::DecodeTable;
use crate::huffman_coding::{CHUNK_SIZE, MAX_SELECTORS, MAX_WIRE_LEN};
use crate::tools::crc::{do_crc, do_stream_crc};
use crate::tools::randomize::derandomize;
use crate::tools::rle1::rle1_decode;
use crate::tools::rle2_mtf_decode::rle2_mtf_decode;
use crate::tools::symbol_map::decode_sym_map;

const BLOCK_MAGIC: (u32, u32) = (0x0031_4159, 0x0026_5359);
const END_MAGIC: (u32, u32) = (0x0017_7245, 0x0038_5090);

/// Where the stream state machine stands between reads.
enum State {
    StreamHeader,
    Blocks,
    Done,
    Failed,
}

/// Scratch sized once per stream and reused for every block.
struct BlockScratch {
    tt: Vec<u32>,
    rle2: Vec<u16>,
}

/// A streaming bzip2 decoder wrapping any byte source.
///
/// ```no_run
/// use std::io::Read;
/// use bzip2_stream::BzDecoder;
///
/// let compressed: &[u8] = &[];
/// let mut decoder = BzDecoder::new(compressed);
/// let mut data = Vec::new();
/// decoder.read_to_end(&mut data).unwrap();
/// ```
pub struct BzDecoder<R> {
    br: BitReader<R>,
    state: State,
    /// Declared block size in bytes, from the header digit.
    capacity: usize,
    stream_crc: u32,
    blocks_read: u32,
    /// Decoded bytes of the current block, served out through `read`.
    out: Vec<u8>,
    pos: usize,
    scratch: BlockScratch,
}

impl<R: Read> BzDecoder<R> {
    /// Create a decoder over `source`. Nothing is read until the first
    /// `read` call.
    pub fn new(source: R) -> Self {
        Self {
            br: BitReader::new(source),
            state: State::StreamHeader,
            capacity: 0,
            stream_crc: 0,
            blocks_read: 0,
            out: Vec::new(),
            pos: 0,
            scratch: BlockScratch {
                tt: Vec::new(),
                rle2: Vec::new(),
            },
        }
    }

    /// Blocks fully decoded and verified so far.
    pub fn blocks_read(&self) -> u32 {
        self.blocks_read
    }

    fn read_stream_header(&mut self) -> Result<(), BzError> {
        if self.br.bytes(3)? != b"BZh" {
            return Err(BzError::Format("missing BZh signature"));
        }
        let digit = self.br.byte()?.wrapping_sub(0x30);
        if !(1..=9).contains(&digit) {
            return Err(BzError::Format("block size digit out of range"));
        }
        self.capacity = digit as usize * 100_000;
        info!("Found a valid bzip2 signature, block size {}00k.", digit);
        Ok(())
    }

    /// HEADER state: distinguish a block from the stream trailer.
    /// Returns false once the trailer has been read and verified.
    fn next_block(&mut self) -> Result<bool, BzError> {
        let magic = (self.br.bint(24)?, self.br.bint(24)?);
        if magic == END_MAGIC {
            let stored = self.br.bint(32)?;
            if stored != self.stream_crc {
                return Err(BzError::StreamCrc {
                    expected: stored,
                    found: self.stream_crc,
                });
            }
            info!("Stream CRC matched after {} blocks.", self.blocks_read);
            return Ok(false);
        }
        if magic != BLOCK_MAGIC {
            return Err(BzError::CorruptBlockHeader);
        }
        self.blocks_read += 1;

        // TABLES state. Stored CRC, the legacy randomized flag, the origin
        // pointer, then everything the Huffman stage needs.
        let stored_crc = self.br.bint(32)?;
        let randomized = self.br.bool_bit()?;
        let orig_ptr = self.br.bint(24)? as usize;
        if orig_ptr > self.capacity + 10 {
            return Err(BzError::CorruptBlockHeader);
        }

        let mut maps = vec![self.br.bint(16)? as u16];
        for _ in 0..maps[0].count_ones() {
            maps.push(self.br.bint(16)? as u16);
        }
        let symbol_set = decode_sym_map(&maps);
        if symbol_set.is_empty() {
            return Err(BzError::InvalidHuffmanTables("empty symbol map"));
        }
        let eob = symbol_set.len() as u16 + 1;
        let alpha = symbol_set.len() + 2;

        let n_groups = self.br.bint(3)? as usize;
        if !(2..=6).contains(&n_groups) {
            return Err(BzError::InvalidHuffmanTables("group count out of range"));
        }
        let selector_count = self.br.bint(15)? as usize;
        if !(1..=MAX_SELECTORS).contains(&selector_count) {
            return Err(BzError::InvalidHuffmanTables("selector count out of range"));
        }

        // Selectors arrive unary coded and move-to-front transformed.
        let mut selectors = Vec::with_capacity(selector_count);
        let mut order: Vec<usize> = (0..n_groups).collect();
        for _ in 0..selector_count {
            let idx = self.br.unary()? as usize;
            if idx >= n_groups {
                return Err(BzError::InvalidHuffmanTables("selector out of range"));
            }
            let group = order.remove(idx);
            order.insert(0, group);
            selectors.push(group);
        }

        // Per-group code lengths: a 5 bit seed walked by ±1 deltas.
        let mut tables = Vec::with_capacity(n_groups);
        for _ in 0..n_groups {
            let mut lengths = vec![0_u8; alpha];
            let mut len = self.br.bint(5)? as i32;
            for slot in lengths.iter_mut() {
                loop {
                    if !(1..=MAX_WIRE_LEN as i32).contains(&len) {
                        return Err(BzError::InvalidHuffmanTables("code length out of range"));
                    }
                    if !self.br.bool_bit()? {
                        break;
                    }
                    if self.br.bool_bit()? {
                        len -= 1;
                    } else {
                        len += 1;
                    }
                }
                *slot = len as u8;
            }
            tables.push(DecodeTable::new(&lengths));
        }
        debug!(
            "block {}: {} symbols in use, {} groups, {} selectors",
            self.blocks_read,
            symbol_set.len(),
            n_groups,
            selector_count
        );

        // SYMBOLS state: drive MTF/RLE2 symbol recovery until EOB, switching
        // tables every 50 symbols as the selectors dictate.
        let mut rle2 = std::mem::take(&mut self.scratch.rle2);
        rle2.clear();
        let mut selector_idx = 0_usize;
        let mut in_chunk = 0_usize;
        loop {
            if in_chunk == CHUNK_SIZE {
                selector_idx += 1;
                if selector_idx >= selectors.len() {
                    return Err(BzError::InvalidHuffmanTables("selectors exhausted"));
                }
                in_chunk = 0;
            }
            let symbol = tables[selectors[selector_idx]].next_symbol(&mut self.br)?;
            in_chunk += 1;
            if symbol == eob {
                break;
            }
            if rle2.len() > self.capacity {
                return Err(BzError::BlockOverrun);
            }
            rle2.push(symbol);
        }

        let (bwt_data, freq) = rle2_mtf_decode(&rle2, &symbol_set, self.capacity)?;
        self.scratch.rle2 = rle2;

        // PERMUTE + EMIT states: the inverse permutation walk, the legacy
        // derandomization pass when flagged, then RLE1 expansion.
        if orig_ptr >= bwt_data.len() {
            return Err(BzError::CorruptBlockHeader);
        }
        let mut emitted = bwt_decode(orig_ptr as u32, &bwt_data, &freq, &mut self.scratch.tt);
        if randomized {
            derandomize(&mut emitted);
        }
        self.out = rle1_decode(&emitted);
        self.pos = 0;

        // CRC_CHECK state.
        let found = do_crc(0, &self.out);
        if found != stored_crc {
            return Err(BzError::BlockCrc {
                expected: stored_crc,
                found,
            });
        }
        self.stream_crc = do_stream_crc(self.stream_crc, found);
        info!(
            "Block {} CRC matched ({} bytes out).",
            self.blocks_read,
            self.out.len()
        );
        Ok(true)
    }
}

impl<R: Read> Read for BzDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            // Serve buffered bytes before touching the source again.
            if self.pos < self.out.len() {
                let n = (self.out.len() - self.pos).min(buf.len());
                buf[..n].copy_from_slice(&self.out[self.pos..self.pos + n]);
                self.pos += n;
                return Ok(n);
            }
            match self.state {
                State::Done => return Ok(0),
                State::Failed => return Err(BzError::StreamClosed.into()),
                State::StreamHeader => match self.read_stream_header() {
                    Ok(()) => self.state = State::Blocks,
                    Err(e) => {
                        self.state = State::Failed;
                        return Err(e.into());
                    }
                },
                State::Blocks => match self.next_block() {
                    Ok(true) => {}
                    Ok(false) => self.state = State::Done,
                    Err(e) => {
                        self.state = State::Failed;
                        return Err(e.into());
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::BzDecoder;
    use crate::error::BzError;
    use std::io::Read;

    fn decode_err(data: &[u8]) -> std::io::Error {
        let mut decoder = BzDecoder::new(data);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap_err()
    }

    fn kind_of(err: &std::io::Error) -> Option<&BzError> {
        err.get_ref()?.downcast_ref::<BzError>()
    }

    #[test]
    fn rejects_wrong_signature() {
        let err = decode_err(b"not a bzip2 stream at all");
        assert!(matches!(kind_of(&err), Some(BzError::Format(_))));
    }

    #[test]
    fn rejects_bad_version_digit() {
        let err = decode_err(b"BZh0\x31\x41\x59\x26\x53\x59");
        assert!(matches!(kind_of(&err), Some(BzError::Format(_))));
    }

    #[test]
    fn empty_source_is_end_of_data() {
        let err = decode_err(b"");
        assert!(matches!(kind_of(&err), Some(BzError::UnexpectedEndOfData)));
    }

    #[test]
    fn error_state_is_sticky() {
        let mut decoder = BzDecoder::new(&b"garbage!"[..]);
        let mut out = Vec::new();
        assert!(decoder.read_to_end(&mut out).is_err());
        let err = decoder.read_to_end(&mut out).unwrap_err();
        assert!(matches!(kind_of(&err), Some(BzError::StreamClosed)));
    }

    #[test]
    fn corrupt_block_magic_is_reported() {
        let mut data = b"BZh9".to_vec();
        data.extend_from_slice(&[0x99; 8]);
        let err = decode_err(&data);
        assert!(matches!(kind_of(&err), Some(BzError::CorruptBlockHeader)));
    }
}

//! Compress one block onto the bitstream: header, block transform, MTF+RLE2,
//! then the Huffman stage which writes everything after the origin pointer.

use log::debug;

use crate::bitstream::bitwriter::BitWriter;
use crate::bwt_algorithms::bwt::bwt_encode;
use crate::error::BzError;
use crate::huffman_coding::encode::huf_encode;
use crate::tools::rle2_mtf::rle2_mtf_encode;

use super::compress::Block;

#[allow(clippy::unusual_byte_groupings)]
/// Write one full block. The caller has already filled `block.data` with
/// RLE1 output and `block.block_crc` with the source CRC.
pub fn compress_block<W: std::io::Write>(
    bw: &mut BitWriter<W>,
    block: &mut Block,
    iterations: usize,
) -> Result<(), BzError> {
    // Block magic, source CRC, and the randomized flag. New streams are
    // never randomized; the flag exists only so old archives stay readable.
    bw.out24(0x18_314159); // magic bits  1-24
    bw.out24(0x18_265359); // magic bits 25-48
    bw.out32(block.block_crc);
    bw.out24(0x01_000000);

    // The block transform replaces the data in place and yields the origin
    // pointer, written as a 24 bit field.
    let (key, transformed) = bwt_encode(&block.data);
    block.key = key;
    block.data = transformed;
    bw.out24(0x18_000000 | block.key);

    rle2_mtf_encode(block);

    debug!(
        "block {}: {} bytes in, {} symbols after MTF+RLE2, {} symbols in use",
        block.seq,
        block.data.len(),
        block.rle2.len(),
        block.eob + 1
    );

    huf_encode(bw, block, iterations)
}

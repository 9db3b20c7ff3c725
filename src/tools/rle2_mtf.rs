//! Move-To-Front transform and Run-Length-Encoding phase 2, integrated for
//! speed, on the encode side.
//!
//! The block transform output is walked once. Bytes at MTF rank 0 collect
//! into zero-runs written with the bijective RUNA/RUNB scheme; every other
//! byte emits its rank plus one and is promoted to the front of the recency
//! list. The pass also produces the symbol frequencies and the two-level
//! symbol map the Huffman stage needs, and terminates the stream with EOB.

use super::symbol_map::encode_sym_map;
use crate::compression::compress::Block;

pub const RUNA: u16 = 0;
pub const RUNB: u16 = 1;

/// Transform `block.data` (the block-transform output) into the RLE2 symbol
/// stream in `block.rle2`, filling `freqs`, `sym_map`, and `eob` on the way.
pub fn rle2_mtf_encode(block: &mut Block) {
    let mut present = [false; 256];
    for &byte in &block.data {
        present[byte as usize] = true;
    }

    // The recency list starts as the used byte values in ascending order.
    let mut mtf_index = [0_u8; 256];
    let mut used = 0_usize;
    for (value, &in_use) in present.iter().enumerate() {
        if in_use {
            mtf_index[used] = value as u8;
            used += 1;
        }
    }

    block.eob = used as u16 + 1;
    block.sym_map = encode_sym_map(&present);
    block.freqs = [0; 258];
    block.rle2.clear();
    block.rle2.reserve(block.data.len() + 1);

    let mut zeros = 0_u32;
    for i in 0..block.data.len() {
        let byte = block.data[i];
        let rank = mtf_index[..used]
            .iter()
            .position(|&c| c == byte)
            .expect("symbol map covers every block byte");

        if rank == 0 {
            zeros += 1;
            continue;
        }
        if zeros > 0 {
            emit_zero_run(zeros, block);
            zeros = 0;
        }

        block.rle2.push(rank as u16 + 1);
        block.freqs[rank + 1] += 1;

        // Promote to the front of the recency list.
        mtf_index.copy_within(0..rank, 1);
        mtf_index[0] = byte;
    }
    if zeros > 0 {
        emit_zero_run(zeros, block);
    }

    block.rle2.push(block.eob);
    block.freqs[block.eob as usize] += 1;
}

/// Write `run` zeros as bijective base-2 digits, RUNA worth 1 and RUNB worth
/// 2 at each power, least significant digit first.
fn emit_zero_run(mut run: u32, block: &mut Block) {
    while run > 0 {
        if run & 1 == 1 {
            block.rle2.push(RUNA);
            block.freqs[RUNA as usize] += 1;
            run = (run - 1) >> 1;
        } else {
            block.rle2.push(RUNB);
            block.freqs[RUNB as usize] += 1;
            run = (run - 2) >> 1;
        }
    }
}

#[cfg(test)]
mod test {
    use super::{rle2_mtf_encode, RUNA, RUNB};
    use crate::compression::compress::Block;

    fn transform(data: &[u8]) -> Block {
        let mut block = Block::new();
        block.data = data.to_vec();
        rle2_mtf_encode(&mut block);
        block
    }

    #[test]
    fn single_run_is_runa() {
        // One byte in use: rank 0 from the start, a zero-run of one.
        let block = transform(b"a");
        assert_eq!(block.eob, 2);
        assert_eq!(block.rle2, vec![RUNA, 2]);
    }

    #[test]
    fn bijective_run_digits() {
        // Four leading rank-0 bytes encode as RUNB RUNA.
        let block = transform(b"aaaab");
        assert_eq!(block.rle2, vec![RUNB, RUNA, 2, block.eob]);
    }

    #[test]
    fn ranks_shift_after_promotion() {
        // b promotes to rank 0, so the second b is a zero-run of one.
        let block = transform(b"abba");
        // a: run of 1 pending; b: rank 1 -> symbol 2; b: rank 0 run;
        // a: rank 1 -> symbol 2; eob.
        assert_eq!(block.rle2, vec![RUNA, 2, RUNA, 2, block.eob]);
    }

    #[test]
    fn freqs_match_symbols() {
        let block = transform(b"abracadabra");
        let mut counted = [0_u32; 258];
        for &sym in &block.rle2 {
            counted[sym as usize] += 1;
        }
        assert_eq!(&counted[..], &block.freqs[..]);
    }
}

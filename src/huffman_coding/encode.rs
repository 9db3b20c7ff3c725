//! Huffman encoding of one block's RLE2 symbol stream, using the rotating
//! multi-table scheme the format requires.
//!
//! The block is split into 50-symbol chunks and 2-6 coding groups compete
//! for each chunk. Groups start seeded from the block's symbol frequencies,
//! then a few refinement passes reassign chunks to whichever group codes
//! them cheapest and rebuild each group's code lengths from the symbols it
//! actually won. The winning assignment becomes the selector stream.

use std::cmp::Ordering;

use log::debug;

use super::code_lengths::assign_code_lengths;
use super::{CHUNK_SIZE, MAX_ENCODE_LEN};
use crate::bitstream::bitwriter::BitWriter;
use crate::compression::compress::Block;
use crate::error::BzError;

/// How many coding groups a block of this many RLE2 symbols gets.
fn group_count(symbols: usize) -> usize {
    match symbols {
        0..=199 => 2,
        200..=599 => 3,
        600..=1199 => 4,
        1200..=2399 => 5,
        _ => 6,
    }
}

/// Seed the group cost tables by splitting the symbol frequency mass into
/// roughly equal portions: a symbol costs 0 in the one group that claims it
/// and 15 everywhere else. Refinement passes turn these into real lengths.
fn seed_tables(freqs: &[u32; 258], n_groups: usize, alpha: usize) -> [[u32; 258]; 6] {
    let mut tables = [[15_u32; 258]; 6];
    let total: u32 = freqs[..alpha].iter().sum();
    let portion_limit = total / n_groups as u32;

    let mut group = n_groups - 1;
    let mut portion = 0_u32;
    for (sym, &f) in freqs.iter().enumerate().take(alpha) {
        portion += f;
        tables[group][sym] = 0;
        if portion > portion_limit && group > 0 {
            group -= 1;
            portion = 0;
        }
    }
    tables
}

/// Encode `block.rle2` onto the bitstream: symbol map, group count, selector
/// stream, delta-coded lengths per group, then the coded symbols.
pub fn huf_encode<W: std::io::Write>(
    bw: &mut BitWriter<W>,
    block: &mut Block,
    iterations: usize,
) -> Result<(), BzError> {
    let n_groups = group_count(block.rle2.len());
    let alpha = block.eob as usize + 1;
    let mut tables = seed_tables(&block.freqs, n_groups, alpha);

    let selector_count = (block.rle2.len() + CHUNK_SIZE - 1) / CHUNK_SIZE;
    let mut selectors = vec![0_usize; selector_count];

    // Refine the tables against the real data. The first pass runs on the
    // 0/15 seeds; every later pass runs on lengths rebuilt from whatever
    // symbols each group won in the previous pass.
    let iterations = iterations.max(1);
    for iter in 0..iterations {
        let mut rfreq = [[0_u32; 258]; 6];
        let mut total_cost = 0_u32;

        block
            .rle2
            .chunks(CHUNK_SIZE)
            .enumerate()
            .for_each(|(i, chunk)| {
                let mut cost = [0_u32; 6];
                chunk.iter().for_each(|&symbol| {
                    (0..n_groups).for_each(|t| cost[t] += tables[t][symbol as usize]);
                });
                // First lowest cost wins ties.
                let mut best = 0;
                for t in 1..n_groups {
                    if cost[t] < cost[best] {
                        best = t;
                    }
                }
                total_cost += cost[best];
                chunk
                    .iter()
                    .for_each(|&symbol| rfreq[best][symbol as usize] += 1);
                if iter == iterations - 1 {
                    selectors[i] = best;
                }
            });

        debug!(
            "block {} pass {}: {} selectors, cost {} bits",
            block.seq,
            iter + 1,
            selector_count,
            total_cost
        );

        for (t, recount) in rfreq.iter().enumerate().take(n_groups) {
            let mut lens = recount[..alpha].to_vec();
            assign_code_lengths(&mut lens, MAX_ENCODE_LEN);
            tables[t][..alpha].copy_from_slice(&lens);
        }
    }

    // Symbol map: 16 bit index word plus the in-use group words.
    for word in &block.sym_map {
        bw.out16(*word);
    }

    // Group count (3 bits), then selector count (15 bits).
    bw.out24(3 << 24 | n_groups as u32);
    bw.out24(15 << 24 | selector_count as u32);

    // Selectors go out move-to-front transformed and unary coded.
    let mut order: Vec<usize> = (0..n_groups).collect();
    for &selected in &selectors {
        let idx = order
            .iter()
            .position(|&g| g == selected)
            .expect("selector names a live group");
        let group = order.remove(idx);
        order.insert(0, group);
        // idx ones then a terminating zero.
        bw.out24(((idx as u32 + 1) << 24) | ((1_u32 << (idx + 1)) - 2));
    }

    /*
    Each group's lengths become canonical codes: sequential values within a
    length, shifted left at each length step. The decoder rebuilds the exact
    same assignment from the lengths alone, so only lengths go on the wire,
    delta coded from a 5 bit origin.
    */
    let mut code_tables: Vec<Vec<u32>> = Vec::with_capacity(n_groups);
    for table in tables.iter().take(n_groups) {
        let lengths = &table[..alpha];

        let mut len_sym: Vec<(u32, u16)> = lengths
            .iter()
            .enumerate()
            .map(|(sym, &len)| (len, sym as u16))
            .collect();
        len_sym.sort_unstable();

        // Codes in BitWriter format: length in the high byte, code in the low bits.
        let mut codes = vec![0_u32; alpha];
        let mut next_code: (u32, u32) = (len_sym[0].0, 0);
        for &(len, sym) in &len_sym {
            if len != next_code.0 {
                next_code.1 <<= len - next_code.0;
                next_code.0 = len;
            }
            codes[sym as usize] = len << 24 | next_code.1;
            next_code.1 += 1;
        }

        // Wire the lengths: 5 bit origin, then ±1 steps per symbol.
        let mut origin = lengths[0] as i32;
        bw.out24(5 << 24 | origin as u32);
        for &len in lengths {
            let mut delta = len as i32 - origin;
            origin = len as i32;
            loop {
                match delta.cmp(&0) {
                    Ordering::Greater => {
                        bw.out24(0x02_000002); // "10": step up
                        delta -= 1;
                    }
                    Ordering::Less => {
                        bw.out24(0x02_000003); // "11": step down
                        delta += 1;
                    }
                    Ordering::Equal => break,
                }
            }
            bw.out24(0x01_000000);
        }
        code_tables.push(codes);
    }

    // Finally the data itself, switching tables every chunk.
    for (i, chunk) in block.rle2.chunks(CHUNK_SIZE).enumerate() {
        let codes = &code_tables[selectors[i]];
        for &symbol in chunk {
            bw.out24(codes[symbol as usize]);
        }
    }

    Ok(())
}

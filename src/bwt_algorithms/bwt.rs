//! Burrows-Wheeler transform of one block, and its inverse.

use rayon::prelude::*;
use std::cmp::Ordering;

/// Blocks past this size are worth rayon's fork overhead.
const PAR_SORT_MIN: usize = 40_000;

/// Transform a block. Returns the origin pointer (the sorted position of
/// rotation zero) and the transformed bytes.
pub fn bwt_encode(data: &[u8]) -> (u32, Vec<u8>) {
    // Sort rotation start indices rather than materializing rotations.
    let mut index = (0_u32..data.len() as u32).collect::<Vec<u32>>();
    if data.len() > PAR_SORT_MIN {
        index.par_sort_unstable_by(|&a, &b| rotation_cmp(a as usize, b as usize, data));
    } else {
        index.sort_unstable_by(|&a, &b| rotation_cmp(a as usize, b as usize, data));
    }

    // Row i of the sorted matrix ends with the byte before rotation index[i].
    let mut key = 0_u32;
    let mut bwt = vec![0_u8; data.len()];
    for (i, &rotation) in index.iter().enumerate() {
        if rotation == 0 {
            key = i as u32;
            bwt[i] = data[data.len() - 1];
        } else {
            bwt[i] = data[rotation as usize - 1];
        }
    }
    (key, bwt)
}

/// Compare two full rotations of the block. Equal rotations (periodic data)
/// may land in either order; the inverse walk gives the same bytes for both.
fn rotation_cmp(a: usize, b: usize, block: &[u8]) -> Ordering {
    block[a..]
        .iter()
        .chain(&block[..a])
        .cmp(block[b..].iter().chain(&block[..b]))
}

/// Invert the transform: scatter each position into `tt` in
/// cumulative-frequency order, then follow the chain from the origin
/// pointer. `tt` is caller-owned scratch so repeated blocks never reallocate.
pub fn bwt_decode(key: u32, bwt_in: &[u8], freq_in: &[u32], tt: &mut Vec<u32>) -> Vec<u8> {
    let end = bwt_in.len();
    if end == 0 {
        return Vec::new();
    }

    // Exclusive cumulative counts: where each byte value's run starts.
    let mut cum = [0_u32; 256];
    let mut sum = 0_u32;
    for (value, &f) in freq_in.iter().enumerate() {
        cum[value] = sum;
        sum += f;
    }

    tt.clear();
    tt.resize(end, 0);
    for (i, &byte) in bwt_in.iter().enumerate() {
        tt[cum[byte as usize] as usize] = i as u32;
        cum[byte as usize] += 1;
    }

    // Walk the chain to emit bytes in original order.
    let mut out = vec![0_u8; end];
    let mut p = tt[key as usize];
    for slot in out.iter_mut() {
        *slot = bwt_in[p as usize];
        p = tt[p as usize];
    }
    out
}

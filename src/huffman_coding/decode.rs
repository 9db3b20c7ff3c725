//! Canonical Huffman decode tables and one-symbol decoding.
//!
//! A table is fully determined by the code length array: symbols are
//! bucketed by length (stable, ascending symbol index within a bucket) into
//! `permutation`; `limit[len]` holds the numerically largest code of each
//! length and `base[len]` the offset that turns a code into a permutation
//! index. Decoding reads `min_len` bits, then grows the candidate one bit at
//! a time while it exceeds `limit`.

use super::MAX_CODE_LEN;
use crate::bitstream::bitreader::BitReader;
use crate::error::BzError;

/// Decode tables for one coding group.
#[derive(Debug, Clone)]
pub struct DecodeTable {
    limit: [i32; MAX_CODE_LEN + 2],
    base: [i32; MAX_CODE_LEN + 2],
    permutation: Vec<u16>,
    min_len: usize,
    max_len: usize,
}

impl DecodeTable {
    /// Build the decode tables from one group's code lengths.
    pub fn new(lengths: &[u8]) -> Self {
        let min_len = *lengths.iter().min().expect("non-empty alphabet") as usize;
        let max_len = *lengths.iter().max().expect("non-empty alphabet") as usize;
        debug_assert!(max_len <= MAX_CODE_LEN);

        // Bucket symbol indices by ascending code length.
        let mut permutation = Vec::with_capacity(lengths.len());
        for len in min_len..=max_len {
            for (symbol, &l) in lengths.iter().enumerate() {
                if l as usize == len {
                    permutation.push(symbol as u16);
                }
            }
        }

        // base[len] counts codes shorter than len, then gets rebased so that
        // `code - base[len]` indexes straight into the permutation.
        let mut base = [0_i32; MAX_CODE_LEN + 2];
        for &l in lengths {
            base[l as usize + 1] += 1;
        }
        for i in 1..base.len() {
            base[i] += base[i - 1];
        }

        // limit[len] is the largest code value assigned at each length.
        let mut limit = [0_i32; MAX_CODE_LEN + 2];
        let mut code = 0_i32;
        for len in min_len..=max_len {
            code += base[len + 1] - base[len];
            limit[len] = code - 1;
            code <<= 1;
        }
        for len in min_len + 1..=max_len {
            base[len] = ((limit[len - 1] + 1) << 1) - base[len];
        }

        Self {
            limit,
            base,
            permutation,
            min_len,
            max_len,
        }
    }

    /// Decode one symbol from the bitstream.
    pub fn next_symbol<R: std::io::Read>(
        &self,
        br: &mut BitReader<R>,
    ) -> Result<u16, BzError> {
        let mut len = self.min_len;
        let mut code = br.bint(len)? as i32;
        while code > self.limit[len] {
            len += 1;
            if len > self.max_len {
                return Err(BzError::InvalidHuffmanCode);
            }
            code = code << 1 | br.bit()? as i32;
        }
        let idx = code - self.base[len];
        if idx < 0 || idx as usize >= self.permutation.len() {
            return Err(BzError::InvalidHuffmanCode);
        }
        Ok(self.permutation[idx as usize])
    }
}

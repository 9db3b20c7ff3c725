//! The decode side of the integrated MTF and RLE2 stage.
//!
//! Consumes the RLE2 symbol stream (EOB already stripped by the block
//! engine) and rebuilds the block-transform output plus the per-byte
//! frequency table the inverse permutation walk needs. Zero-runs accumulate
//! through the bijective RUNA/RUNB scheme and expand to copies of whatever
//! byte currently sits at rank 0.

use super::rle2_mtf::{RUNA, RUNB};
use crate::error::BzError;

/// Decode `data_in` against the block's symbol set. `capacity` is the
/// declared block size; anything expanding past it is a [`BzError::BlockOverrun`].
/// Returns the rebuilt bytes and their frequency count.
pub fn rle2_mtf_decode(
    data_in: &[u16],
    symbol_set: &[u8],
    capacity: usize,
) -> Result<(Vec<u8>, Vec<u32>), BzError> {
    let mut mtf_index = symbol_set.to_vec();
    let mut out = vec![0_u8; capacity];
    let mut freq = vec![0_u32; 256];

    let mut zeros = 0_usize;
    let mut bit_multiplier = 1_usize;
    let mut index = 0_usize;

    for &symbol in data_in {
        match symbol {
            RUNA => {
                zeros += bit_multiplier;
                bit_multiplier <<= 1;
                if zeros > capacity {
                    return Err(BzError::BlockOverrun);
                }
            }
            RUNB => {
                zeros += bit_multiplier << 1;
                bit_multiplier <<= 1;
                if zeros > capacity {
                    return Err(BzError::BlockOverrun);
                }
            }
            n => {
                if zeros > 0 {
                    if index + zeros > capacity {
                        return Err(BzError::BlockOverrun);
                    }
                    let byte = mtf_index[0];
                    for slot in out[index..index + zeros].iter_mut() {
                        *slot = byte;
                    }
                    freq[byte as usize] += zeros as u32;
                    index += zeros;
                    zeros = 0;
                    bit_multiplier = 1;
                }

                // Symbol n names MTF rank n-1.
                let rank = n as usize - 1;
                if rank >= mtf_index.len() {
                    return Err(BzError::InvalidHuffmanTables("symbol outside mtf range"));
                }
                if index >= capacity {
                    return Err(BzError::BlockOverrun);
                }
                let byte = mtf_index.remove(rank);
                mtf_index.insert(0, byte);
                out[index] = byte;
                freq[byte as usize] += 1;
                index += 1;
            }
        }
    }

    // A block may end in a run: flush zeros pending at EOB.
    if zeros > 0 {
        if index + zeros > capacity {
            return Err(BzError::BlockOverrun);
        }
        let byte = mtf_index[0];
        for slot in out[index..index + zeros].iter_mut() {
            *slot = byte;
        }
        freq[byte as usize] += zeros as u32;
        index += zeros;
    }

    out.truncate(index);
    Ok((out, freq))
}

#[cfg(test)]
mod test {
    use super::rle2_mtf_decode;
    use crate::compression::compress::Block;
    use crate::error::BzError;
    use crate::tools::rle2_mtf::rle2_mtf_encode;
    use crate::tools::symbol_map::decode_sym_map;

    fn round_trip(data: &[u8]) {
        let mut block = Block::new();
        block.data = data.to_vec();
        rle2_mtf_encode(&mut block);
        let symbol_set = decode_sym_map(&block.sym_map);
        let body = &block.rle2[..block.rle2.len() - 1]; // strip eob
        let (out, freq) = rle2_mtf_decode(body, &symbol_set, data.len()).unwrap();
        assert_eq!(out, data);
        for (value, &count) in freq.iter().enumerate() {
            let expected = data.iter().filter(|&&b| b as usize == value).count();
            assert_eq!(count as usize, expected, "freq of byte {}", value);
        }
    }

    #[test]
    fn round_trips() {
        round_trip(b"a");
        round_trip(b"abracadabra");
        round_trip(b"aaaaaaaabbbbbbbbcccccccc");
        round_trip(b"the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn trailing_run_flushes() {
        round_trip(b"xyzzzzzzzzzzzz");
    }

    #[test]
    fn overrun_is_detected() {
        let mut block = Block::new();
        block.data = b"aaaaaaaaaaaaaaaa".to_vec();
        rle2_mtf_encode(&mut block);
        let symbol_set = decode_sym_map(&block.sym_map);
        let body = &block.rle2[..block.rle2.len() - 1];
        // Declare a capacity smaller than the run expands to.
        assert!(matches!(
            rle2_mtf_decode(body, &symbol_set, 4),
            Err(BzError::BlockOverrun)
        ));
    }
}

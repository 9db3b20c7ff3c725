//! The two-level bzip2 symbol map: a 16 bit index word marking which groups
//! of sixteen byte values occur in the block, followed by one 16 bit map for
//! each marked group.

const BIT_MASK: u16 = 0x8000;

/// Build the symbol map words from a 256-entry presence table.
/// Assumes at least one symbol exists.
pub fn encode_sym_map(present: &[bool; 256]) -> Vec<u16> {
    /*
    There are 256 possible u8s, or 16 groups of 16. The index word gets a bit
    for every group with at least one byte in use; only those groups' maps
    are emitted after it, high bit first within each word.
    */
    let mut maps: Vec<u16> = vec![0; 17];

    for (value, &in_use) in present.iter().enumerate() {
        if in_use {
            maps[0] |= BIT_MASK >> (value >> 4);
            maps[1 + (value >> 4)] |= BIT_MASK >> (value & 15);
        }
    }

    // Drop the group words that never got a bit.
    maps.retain(|&map| map > 0);
    maps
}

/// Expand symbol map words back into the sorted list of byte values used in
/// the block.
pub fn decode_sym_map(maps: &[u16]) -> Vec<u8> {
    let mut symbols: Vec<u8> = Vec::with_capacity(256);
    let mut map_idx = 0;

    for group in 0..16_u8 {
        if maps[0] & (BIT_MASK >> group) > 0 {
            map_idx += 1;
            for bit in 0..16_u8 {
                if maps[map_idx] & (BIT_MASK >> bit) > 0 {
                    symbols.push((group << 4) + bit);
                }
            }
        }
    }
    symbols
}

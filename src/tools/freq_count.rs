use rayon::prelude::*;

/// Frequency count of every byte value in `data`. Splits across cores when
/// the block is big enough to pay for the fork.
pub fn freqs(data: &[u8]) -> Vec<u32> {
    if data.len() > 64_000 {
        // 16k chunks are pretty much the sweet spot.
        data.par_chunks(16_000)
            .fold(
                || vec![0_u32; 256],
                |mut counts, chunk| {
                    chunk.iter().for_each(|&el| counts[el as usize] += 1);
                    counts
                },
            )
            .reduce(
                || vec![0_u32; 256],
                |a, b| a.iter().zip(&b).map(|(x, y)| x + y).collect(),
            )
    } else {
        let mut counts = vec![0_u32; 256];
        data.iter().for_each(|&el| counts[el as usize] += 1);
        counts
    }
}

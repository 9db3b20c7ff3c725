//! End-to-end round trips through the streaming encoder and decoder.

use std::io::{Read, Write};

use bzip2_stream::{BzDecoder, BzEncoder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn encode(data: &[u8], block_size: u8) -> Vec<u8> {
    let mut encoder = BzEncoder::new(Vec::new(), block_size);
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn decode(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = BzDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

fn round_trip(data: &[u8], block_size: u8) {
    let compressed = encode(data, block_size);
    assert_eq!(decode(&compressed).unwrap(), data);
}

#[test]
fn empty_input() {
    let compressed = encode(b"", 9);
    assert_eq!(compressed.len(), 14);
    assert_eq!(decode(&compressed).unwrap(), b"");
}

#[test]
fn single_byte() {
    round_trip(b"x", 1);
    round_trip(&[0], 9);
    round_trip(&[255], 9);
}

#[test]
fn short_text() {
    round_trip(b"If Peter Piper picked a peck of pickled peppers...", 1);
}

#[test]
fn all_byte_values() {
    let data: Vec<u8> = (0..=255).cycle().take(2048).collect();
    round_trip(&data, 1);
}

#[test]
fn highly_repetitive() {
    // Long identical runs collapse through RLE1 before the sort.
    let mut data = Vec::new();
    for i in 0..300_u32 {
        data.extend(std::iter::repeat(b'a' + (i % 3) as u8).take(40));
    }
    round_trip(&data, 1);
}

#[test]
fn pure_run() {
    round_trip(&vec![7_u8; 100_000], 1);
}

#[test]
fn uniformly_random() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let data: Vec<u8> = (0..120_000).map(|_| rng.gen()).collect();
    round_trip(&data, 1);
}

#[test]
fn multi_block_stream() {
    // Random bytes do not shrink through RLE1, so 250k at block size 1
    // must span at least three blocks.
    let mut rng = StdRng::seed_from_u64(42);
    let data: Vec<u8> = (0..250_000).map(|_| rng.gen()).collect();
    let compressed = encode(&data, 1);

    let mut decoder = BzDecoder::new(compressed.as_slice());
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).unwrap();
    assert_eq!(out, data);
    assert!(decoder.blocks_read() >= 3, "blocks: {}", decoder.blocks_read());
}

#[test]
fn encode_is_deterministic() {
    let data = b"the same bytes in, the same bytes out, every time".repeat(50);
    assert_eq!(encode(&data, 1), encode(&data, 1));
}

#[test]
fn chunked_writes_match_one_shot() {
    let data = b"split me into ragged little pieces and compress me".repeat(100);
    let one_shot = encode(&data, 1);

    let mut encoder = BzEncoder::new(Vec::new(), 1);
    for chunk in data.chunks(13) {
        encoder.write_all(chunk).unwrap();
    }
    assert_eq!(encoder.finish().unwrap(), one_shot);
}

#[test]
fn chunked_reads_drain_cleanly() {
    let data = b"pull me out seven bytes at a time".repeat(200);
    let compressed = encode(&data, 1);

    let mut decoder = BzDecoder::new(compressed.as_slice());
    let mut out = Vec::new();
    let mut buf = [0_u8; 7];
    loop {
        let n = decoder.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    assert_eq!(out, data);
}

#[test]
fn every_block_size_digit() {
    let data = b"block size sweep".repeat(64);
    for digit in 1..=9 {
        round_trip(&data, digit);
    }
}

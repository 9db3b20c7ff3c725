//! Corruption and truncation must surface as typed errors, never as silent
//! wrong output, a panic, or a hang.

use std::io::{Read, Write};

use bzip2_stream::{BzDecoder, BzEncoder, BzError};

fn encode(data: &[u8]) -> Vec<u8> {
    let mut encoder = BzEncoder::new(Vec::new(), 1);
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn decode(data: &[u8]) -> Result<Vec<u8>, std::io::Error> {
    let mut decoder = BzDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

fn bz_kind(err: &std::io::Error) -> Option<&BzError> {
    err.get_ref()?.downcast_ref::<BzError>()
}

/*
Fixed bit layout of the front of a single-block stream:
bytes 0-3   "BZh1"
bytes 4-9   block magic
bytes 10-13 stored block CRC
byte  14    randomized flag (1 bit) + top of orig_ptr
bytes 15-16 rest of the 24 bit orig_ptr
The trailer ends with the 32 bit stream CRC, padded to a byte.
*/

#[test]
fn flipped_block_crc_is_caught() {
    let mut data = encode(b"corruption target corpus, longer than a few bytes");
    data[12] ^= 0x10;
    let err = decode(&data).unwrap_err();
    assert!(
        matches!(bz_kind(&err), Some(BzError::BlockCrc { .. })),
        "got {:?}",
        err
    );
}

#[test]
fn flipped_stream_crc_is_caught() {
    let mut data = encode(b"corruption target corpus, longer than a few bytes");
    let last = data.len() - 2;
    data[last] ^= 0x04;
    let err = decode(&data).unwrap_err();
    assert!(
        matches!(bz_kind(&err), Some(BzError::StreamCrc { .. })),
        "got {:?}",
        err
    );
}

#[test]
fn flipped_orig_ptr_is_caught() {
    let mut data = encode(b"corruption target corpus, longer than a few bytes");
    data[16] ^= 0x01;
    let err = decode(&data).unwrap_err();
    // A nudged origin pointer either walks the permutation from the wrong
    // place (caught by the block CRC) or points outside the block entirely.
    assert!(
        matches!(
            bz_kind(&err),
            Some(
                BzError::BlockCrc { .. }
                    | BzError::CorruptBlockHeader
                    | BzError::BlockOverrun
                    | BzError::InvalidHuffmanCode
                    | BzError::InvalidHuffmanTables(_)
            )
        ),
        "got {:?}",
        err
    );
}

#[test]
fn truncation_reports_end_of_data() {
    let data = encode(b"truncate me wherever you like, I must never hang");
    // Structural cut points: mid header, mid block magic, mid CRC, mid
    // tables, mid symbol stream, mid trailer.
    for cut in [2, 7, 12, 20, data.len() / 2, data.len() - 3] {
        let err = decode(&data[..cut]).unwrap_err();
        assert!(
            matches!(bz_kind(&err), Some(BzError::UnexpectedEndOfData)),
            "cut at {}: got {:?}",
            cut,
            err
        );
    }
}

#[test]
fn every_truncation_point_errors() {
    let data = encode(b"no prefix of a valid stream is itself valid");
    for cut in 0..data.len() {
        assert!(
            decode(&data[..cut]).is_err(),
            "prefix of {} bytes decoded successfully",
            cut
        );
    }
}

#[test]
fn every_single_bit_flip_errors_or_restores() {
    // Flipping any one bit must either fail decode or (never) change the
    // output silently. Walk a small stream exhaustively.
    let source = b"exhaustive single bit flip sweep";
    let data = encode(source);
    for byte in 0..data.len() {
        for bit in 0..8 {
            let mut copy = data.clone();
            copy[byte] ^= 1 << bit;
            if let Ok(out) = decode(&copy) {
                assert_eq!(
                    out, source,
                    "flip {}:{} decoded to different bytes",
                    byte, bit
                );
            }
        }
    }
}

#[test]
fn garbage_after_magic_is_structural_error() {
    let mut data = b"BZh4".to_vec();
    data.extend_from_slice(&[0xff; 64]);
    let err = decode(&data).unwrap_err();
    assert!(matches!(
        bz_kind(&err),
        Some(BzError::CorruptBlockHeader | BzError::InvalidHuffmanTables(_))
    ));
}

#[test]
fn decoder_stays_failed_after_error() {
    let mut data = encode(b"sticky failure semantics");
    data[12] ^= 0x01;
    let mut decoder = BzDecoder::new(data.as_slice());
    let mut out = Vec::new();
    assert!(decoder.read_to_end(&mut out).is_err());

    let mut buf = [0_u8; 16];
    let err = decoder.read(&mut buf).unwrap_err();
    assert!(matches!(bz_kind(&err), Some(BzError::StreamClosed)));
}

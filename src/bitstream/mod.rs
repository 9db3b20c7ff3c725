//! The bitstream module is the I/O subsystem for the streaming bzip2 codec.
//!
//! BZIP2 is a block-oriented approach to compress data, but the bitstream
//! itself has no alignment: every field is packed most-significant-bit first
//! with no padding until the very end of the stream.
//!
//! [`bitreader::BitReader`] pulls bits from any `std::io::Read` source and
//! reports truncation as a typed error; [`bitwriter::BitWriter`] packs bits
//! toward any `std::io::Write` sink. Both keep a 64 bit accumulator plus a
//! live-bit count, so callers never see partial bytes.

pub mod bitreader;
pub mod bitwriter;

//! The block transform: a Burrows-Wheeler rotation sort on the encode side
//! and the inverse permutation walk on the decode side.
//!
//! The format only fixes the decode contract (the `tt` permutation and the
//! origin pointer); any rotation sort that honors it interoperates. This
//! crate sorts rotation indices directly, in parallel for large blocks.

pub mod bwt;

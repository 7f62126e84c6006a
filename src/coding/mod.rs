//! Encoding and decoding for the several error correction coding schemes used in DMR.

pub mod bptc;
pub mod galois;
pub mod golay;
pub mod hamming;
pub mod qr;
pub mod reed_solomon;

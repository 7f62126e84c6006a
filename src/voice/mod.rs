//! Encoding and decoding of voice-related bursts and signalling.

pub mod burst;
pub mod control;
pub mod embedded;
pub mod full;
pub mod sync;

//! DMR repeater-network relay that records incoming calls through a networked vocoder
//! and answers them with a prerecorded voice message.

pub mod audio;
pub mod bits;
pub mod coding;
pub mod config;
pub mod consts;
pub mod digest;
pub mod error;
pub mod frame;
pub mod ids;
pub mod mux;
pub mod outbox;
pub mod protocol;
pub mod relay;
pub mod session;
pub mod util;
pub mod vocoder;
pub mod voice;

//! Frame sizes and timing constants shared across the relay.

use std::time::Duration;

/// Number of bytes in a `DMRD` repeater data frame.
pub const DATA_FRAME_BYTES: usize = 55;
/// Number of bytes in the burst payload carried by a data frame.
pub const PAYLOAD_BYTES: usize = 33;
/// Offset of the burst payload within a data frame.
pub const PAYLOAD_OFFSET: usize = 20;
/// Number of bytes in a link control word.
pub const LINK_CONTROL_BYTES: usize = 9;
/// Number of bytes in a link control word with its Reed-Solomon parity.
pub const FULL_LC_BYTES: usize = 12;
/// Number of bytes in a compressed (AMBE) vocoder frame.
pub const AMBE_FRAME_BYTES: usize = 9;
/// Number of compressed vocoder frames carried in each voice burst.
pub const AMBE_PER_BURST: usize = 3;
/// Number of PCM samples in one 20ms audio block at 8kHz.
pub const PCM_SAMPLES: usize = 160;
/// Number of bytes in one PCM audio block.
pub const PCM_BYTES: usize = PCM_SAMPLES * 2;
/// Audio sample rate expected by the vocoder.
pub const SAMPLE_RATE: u32 = 8000;
/// Number of voice bursts in a superframe (A through F).
pub const SUPERFRAME_BURSTS: usize = 6;

/// Interval between keepalive pings once connected.
pub const PING_INTERVAL: Duration = Duration::from_secs(5);
/// Time without a keepalive reply before the session is reset.
pub const SESSION_TIMEOUT: Duration = Duration::from_secs(60);
/// Poll interval of the event loop when no datagrams are waiting.
pub const POLL_INTERVAL: Duration = Duration::from_millis(5);
/// Pacing period for outbound audio blocks.
pub const BLOCK_PERIOD: Duration = Duration::from_millis(20);
/// Pacing drift beyond which the send deadline is resynchronized.
pub const MAX_DRIFT: Duration = Duration::from_secs(1);
/// Grace period after a header or voice burst before a call is considered ended.
pub const CALL_GRACE: Duration = Duration::from_secs(2);
/// Grace period after a terminator before a call is considered ended.
pub const TERMINATOR_GRACE: Duration = Duration::from_secs(1);
/// Delay between the end of a received call and the start of the reply.
pub const REPLY_DELAY: Duration = Duration::from_secs(1);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validate_params() {
        assert_eq!(DATA_FRAME_BYTES, PAYLOAD_OFFSET + PAYLOAD_BYTES + 2);
        assert_eq!(PCM_SAMPLES as u32 * 1000 / SAMPLE_RATE, BLOCK_PERIOD.as_millis() as u32);
        assert!(POLL_INTERVAL < BLOCK_PERIOD);
    }
}

//! Placement of compressed vocoder frames within a voice burst, and assembly of complete
//! outbound voice bursts.
//!
//! Each burst carries three 72-bit frames. The middle frame straddles the 48-bit centre
//! field (sync or embedded signalling), so its fifth byte is split between the high nibble
//! of payload byte 13 and the low nibble of byte 19.

use crate::consts::{AMBE_FRAME_BYTES, AMBE_PER_BURST, PAYLOAD_BYTES};
use crate::voice::embedded::{self, EmbeddedLc};
use crate::voice::sync;

/// One compressed vocoder frame.
pub type AmbeFrame = [u8; AMBE_FRAME_BYTES];

/// Extract the three vocoder frames carried by the given voice burst payload.
pub fn extract(payload: &[u8; PAYLOAD_BYTES]) -> [AmbeFrame; AMBE_PER_BURST] {
    let mut frames = [[0; AMBE_FRAME_BYTES]; AMBE_PER_BURST];

    frames[0].copy_from_slice(&payload[..9]);

    frames[1][..4].copy_from_slice(&payload[9..13]);
    frames[1][4] = payload[13] & 0xF0 | payload[19] & 0x0F;
    frames[1][5..].copy_from_slice(&payload[20..24]);

    frames[2].copy_from_slice(&payload[24..]);

    frames
}

/// Write the three vocoder frames into the given payload. The centre field of bytes 13
/// and 19 is cleared.
pub fn insert(frames: &[AmbeFrame; AMBE_PER_BURST], payload: &mut [u8; PAYLOAD_BYTES]) {
    payload[..9].copy_from_slice(&frames[0]);

    payload[9..13].copy_from_slice(&frames[1][..4]);
    payload[13] = frames[1][4] & 0xF0;
    payload[19] = frames[1][4] & 0x0F;
    payload[20..24].copy_from_slice(&frames[1][5..]);

    payload[24..].copy_from_slice(&frames[2]);
}

/// Build the voice burst at the given superframe position (0 for burst A through 5 for
/// burst F).
///
/// Burst A carries the voice sync pattern; bursts B-E carry the embedded LC fragments and
/// burst F carries an empty embedded field, each behind an EMB header.
pub fn build(frames: &[AmbeFrame; AMBE_PER_BURST], position: usize, lc: &EmbeddedLc,
             colour_code: u8)
    -> [u8; PAYLOAD_BYTES]
{
    let mut payload = [0; PAYLOAD_BYTES];
    insert(frames, &mut payload);

    if position == 0 {
        sync::write(&sync::MS_VOICE, &mut payload);
    } else {
        let lcss = lc.write_fragment(position, &mut payload);
        embedded::write_emb(&mut payload, colour_code, lcss);
    }

    payload
}

//! Mobile-station sync patterns carried in the middle of a burst.
//!
//! Each 48-bit pattern starts on the low nibble of payload byte 13 and ends on the high
//! nibble of byte 19, so the patterns are stored with a zero nibble at either end.

use crate::consts::PAYLOAD_BYTES;

/// Sync pattern of a mobile-station voice burst (burst A of a superframe).
pub const MS_VOICE: [u8; 7] = [0x07, 0xF7, 0xD5, 0xDD, 0x57, 0xDF, 0xD0];
/// Sync pattern of a mobile-station data burst.
pub const MS_DATA: [u8; 7] = [0x0D, 0x5D, 0x7F, 0x77, 0xFD, 0x75, 0x70];

/// Write the given sync pattern into the burst payload, preserving the outer nibbles of
/// bytes 13 and 19.
pub fn write(pattern: &[u8; 7], payload: &mut [u8; PAYLOAD_BYTES]) {
    payload[13] = payload[13] & 0xF0 | pattern[0] & 0x0F;
    payload[14..19].copy_from_slice(&pattern[1..6]);
    payload[19] = pattern[6] & 0xF0 | payload[19] & 0x0F;
}

/// Check if the burst payload carries the given sync pattern.
pub fn matches(pattern: &[u8; 7], payload: &[u8; PAYLOAD_BYTES]) -> bool {
    payload[13] & 0x0F == pattern[0] & 0x0F &&
        payload[14..19] == pattern[1..6] &&
        payload[19] & 0xF0 == pattern[6] & 0xF0
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_write() {
        let mut p = [0xAA; 33];
        write(&MS_VOICE, &mut p);

        assert_eq!(&p[12..21], &[0xAA, 0xA7, 0xF7, 0xD5, 0xDD, 0x57, 0xDF, 0xDA, 0xAA]);
        assert!(matches(&MS_VOICE, &p));
        assert!(!matches(&MS_DATA, &p));

        let mut p = [0; 33];
        write(&MS_DATA, &mut p);
        assert_eq!(&p[13..20], &MS_DATA[..]);
    }
}

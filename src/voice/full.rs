//! Full link control bursts: the voice LC header that opens a call and the terminator
//! with LC that closes it.
//!
//! The 9 LC bytes gain 3 Reed-Solomon parity bytes masked by a CRC mask, and the resulting
//! 12 bytes are BPTC(196, 96) coded around the data sync and the Golay-protected slot type.
//! Outbound terminators carry the same payload as the header, so only the flag byte of
//! the frame tells them apart. Received terminators may also use the terminator data type
//! and mask.

use crate::coding::{bptc, golay, reed_solomon};
use crate::consts::{FULL_LC_BYTES, LINK_CONTROL_BYTES, PAYLOAD_BYTES};
use crate::voice::control::LinkControl;
use crate::voice::sync;

/// Kind of full LC burst.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LcKind {
    /// Voice LC header.
    Header,
    /// Terminator with LC.
    Terminator,
}

impl LcKind {
    /// Slot type data type code of the burst.
    pub fn data_type(&self) -> u8 {
        match *self {
            LcKind::Header => 1,
            LcKind::Terminator => 2,
        }
    }

    /// Try to parse a burst kind from the given slot type data type code.
    pub fn from_data_type(bits: u8) -> Option<LcKind> {
        match bits {
            1 => Some(LcKind::Header),
            2 => Some(LcKind::Terminator),
            _ => None,
        }
    }

    /// Mask applied to the Reed-Solomon parity.
    fn crc_mask(&self) -> u8 {
        match *self {
            LcKind::Header => 0x96,
            LcKind::Terminator => 0x99,
        }
    }
}

/// Build the 33-byte header burst payload carrying the given LC, also sent as the
/// terminator payload.
pub fn encode(lc: &LinkControl, colour_code: u8) -> [u8; PAYLOAD_BYTES] {
    let kind = LcKind::Header;
    let mut payload = [0; PAYLOAD_BYTES];

    sync::write(&sync::MS_DATA, &mut payload);
    write_slot_type(&mut payload, colour_code, kind.data_type());

    let mut word = [0; FULL_LC_BYTES];
    let data = lc.to_bytes();
    word[..LINK_CONTROL_BYTES].copy_from_slice(&data);

    let parity = reed_solomon::encode(&data);

    for (dst, &p) in word[LINK_CONTROL_BYTES..].iter_mut().zip(parity.iter()) {
        *dst = p ^ kind.crc_mask();
    }

    bptc::encode(&word, &mut payload);

    payload
}

/// Try to recover the LC, burst kind, and colour code from the given burst payload.
///
/// Return `None` if the slot type or BPTC code is unrecoverable, the parity doesn't check
/// under the mask of the signalled burst kind, or the LC isn't a voice call.
pub fn decode(payload: &[u8; PAYLOAD_BYTES]) -> Option<(LinkControl, LcKind, u8)> {
    let (colour_code, data_type) = read_slot_type(payload)?;
    let kind = LcKind::from_data_type(data_type)?;
    let (mut word, _) = bptc::decode(payload)?;

    for byte in word[LINK_CONTROL_BYTES..].iter_mut() {
        *byte ^= kind.crc_mask();
    }

    if !reed_solomon::verify(&word) {
        return None;
    }

    let mut data = [0; LINK_CONTROL_BYTES];
    data.copy_from_slice(&word[..LINK_CONTROL_BYTES]);

    LinkControl::from_bytes(&data).map(|lc| (lc, kind, colour_code))
}

/// Golay-encode the slot type `(colour_code, data_type)` and splice it around the sync
/// pattern in payload bytes 12, 13, 19, and 20.
pub fn write_slot_type(payload: &mut [u8; PAYLOAD_BYTES], colour_code: u8, data_type: u8) {
    let st = golay::encode(colour_code << 4 | data_type & 0x0F);

    payload[12] = payload[12] & 0xC0 | st[0] >> 2 & 0x3F;
    payload[13] = payload[13] & 0x0F | st[0] << 6 & 0xC0 | st[1] >> 2 & 0x30;
    payload[19] = payload[19] & 0xF0 | st[1] >> 2 & 0x0F;
    payload[20] = payload[20] & 0x03 | st[1] << 6 & 0xC0 | st[2] >> 2 & 0x3C;
}

/// Try to recover `(colour_code, data_type)` from the slot type in the given payload.
pub fn read_slot_type(payload: &[u8; PAYLOAD_BYTES]) -> Option<(u8, u8)> {
    let st = [
        (payload[12] & 0x3F) << 2 | payload[13] >> 6,
        (payload[13] & 0x30) << 2 | (payload[19] & 0x0F) << 2 | payload[20] >> 6,
        (payload[20] & 0x3C) << 2,
    ];

    golay::decode(st).map(|(bits, _)| (bits >> 4, bits & 0x0F))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frame::CallType;

    const GROUP_HEADER: [u8; 33] = [
        0x02, 0x22, 0x09, 0x6C, 0x13, 0xE4, 0x0E, 0x98, 0x50, 0x00, 0x77,
        0xC0, 0x44, 0x6D, 0x5D, 0x7F, 0x77, 0xFD, 0x75, 0x7E, 0x33, 0x4C,
        0x15, 0x30, 0x12, 0x10, 0x08, 0x80, 0x54, 0x01, 0x96, 0x82, 0x89,
    ];

    const PRIVATE_HEADER: [u8; 33] = [
        0x57, 0x36, 0x17, 0x15, 0x09, 0x06, 0x48, 0x38, 0xA5, 0xF0, 0x56,
        0x03, 0xC4, 0x6D, 0x5D, 0x7F, 0x77, 0xFD, 0x75, 0x7E, 0x31, 0x40,
        0x29, 0xC0, 0x24, 0x71, 0x8A, 0x82, 0x74, 0x13, 0x7B, 0x87, 0x0E,
    ];

    #[test]
    fn test_header() {
        let lc = LinkControl::new(CallType::Group, 1234567, 91);
        assert_eq!(&encode(&lc, 1)[..], &GROUP_HEADER[..]);

        let lc = LinkControl::new(CallType::Private, 3100001, 1234567);
        assert_eq!(&encode(&lc, 1)[..], &PRIVATE_HEADER[..]);
    }

    #[test]
    fn test_decode() {
        let lc = LinkControl::new(CallType::Group, 1234567, 91);
        assert_eq!(decode(&GROUP_HEADER), Some((lc, LcKind::Header, 1)));

        let lc = LinkControl::new(CallType::Private, 3100001, 1234567);
        assert_eq!(decode(&PRIVATE_HEADER), Some((lc, LcKind::Header, 1)));
    }

    #[test]
    fn test_terminator() {
        // Terminator with LC as sent by other equipment: data type 2 and its own mask.
        let lc = LinkControl::new(CallType::Group, 1234567, 91);
        let mut p = GROUP_HEADER;
        write_slot_type(&mut p, 1, 2);

        let mut word = [0; FULL_LC_BYTES];
        word[..LINK_CONTROL_BYTES].copy_from_slice(&lc.to_bytes());
        let parity = reed_solomon::encode(&lc.to_bytes());

        for (dst, &b) in word[LINK_CONTROL_BYTES..].iter_mut().zip(parity.iter()) {
            *dst = b ^ 0x99;
        }

        bptc::encode(&word, &mut p);

        assert_eq!(read_slot_type(&p), Some((1, 2)));
        assert_eq!(decode(&p), Some((lc, LcKind::Terminator, 1)));
    }

    #[test]
    fn test_slot_type() {
        let mut p = [0; 33];
        sync::write(&sync::MS_DATA, &mut p);
        write_slot_type(&mut p, 1, 1);

        assert_eq!(&p[12..21], &[0x04, 0x6D, 0x5D, 0x7F, 0x77, 0xFD, 0x75, 0x7E, 0x30]);
        assert_eq!(read_slot_type(&p), Some((1, 1)));

        for cc in 0..16 {
            write_slot_type(&mut p, cc, 2);
            assert_eq!(read_slot_type(&p), Some((cc, 2)));
        }
    }

    #[test]
    fn test_corrupt() {
        let mut p = GROUP_HEADER;
        p[5] ^= 0x08;
        assert_eq!(decode(&p).map(|(lc, _, _)| lc.dst), Some(91));

        // Signalling a terminator makes the header parity mask wrong.
        write_slot_type(&mut p, 1, 2);
        assert_eq!(decode(&p), None);
    }
}

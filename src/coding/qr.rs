//! Encoding and decoding of the (16, 7, 6) quadratic residue code protecting the DMR
//! embedded signalling (EMB) field.

/// Encode the 7 data bits held in the upper bits of `data` (the LSB is ignored) into a
/// 16-bit codeword, returned MSB first.
pub fn encode(data: u8) -> [u8; 2] {
    let word = ENCODING[(data >> 1 & 0x7F) as usize];
    [(word >> 8) as u8, word as u8]
}

/// Try to decode the given codeword, correcting up to 2 errors.
///
/// If decoding was successful, return `Some((data, err))`, where `data` holds the 7
/// data bits in its upper bits and `err` is the number of corrected bits. Otherwise,
/// return `None` to indicate an unrecoverable error.
pub fn decode(word: [u8; 2]) -> Option<(u8, usize)> {
    let bits = (word[0] as u16) << 8 | word[1] as u16;

    ENCODING.iter()
        .map(|&code| (code, (code ^ bits).count_ones() as usize))
        .min_by_key(|&(_, err)| err)
        .and_then(|(code, err)| if err <= 2 {
            Some(((code >> 8) as u8 & 0xFE, err))
        } else {
            None
        })
}

/// Maps each 7-bit data value to its full codeword.
const ENCODING: [u16; 128] = [
    0x0000, 0x0273, 0x04E5, 0x0696, 0x09C9, 0x0BBA, 0x0D2C, 0x0F5F,
    0x11E2, 0x1391, 0x1507, 0x1774, 0x182B, 0x1A58, 0x1CCE, 0x1EBD,
    0x21B7, 0x23C4, 0x2552, 0x2721, 0x287E, 0x2A0D, 0x2C9B, 0x2EE8,
    0x3055, 0x3226, 0x34B0, 0x36C3, 0x399C, 0x3BEF, 0x3D79, 0x3F0A,
    0x411E, 0x436D, 0x45FB, 0x4788, 0x48D7, 0x4AA4, 0x4C32, 0x4E41,
    0x50FC, 0x528F, 0x5419, 0x566A, 0x5935, 0x5B46, 0x5DD0, 0x5FA3,
    0x60A9, 0x62DA, 0x644C, 0x663F, 0x6960, 0x6B13, 0x6D85, 0x6FF6,
    0x714B, 0x7338, 0x75AE, 0x77DD, 0x7882, 0x7AF1, 0x7C67, 0x7E14,
    0x804F, 0x823C, 0x84AA, 0x86D9, 0x8986, 0x8BF5, 0x8D63, 0x8F10,
    0x91AD, 0x93DE, 0x9548, 0x973B, 0x9864, 0x9A17, 0x9C81, 0x9EF2,
    0xA1F8, 0xA38B, 0xA51D, 0xA76E, 0xA831, 0xAA42, 0xACD4, 0xAEA7,
    0xB01A, 0xB269, 0xB4FF, 0xB68C, 0xB9D3, 0xBBA0, 0xBD36, 0xBF45,
    0xC151, 0xC322, 0xC5B4, 0xC7C7, 0xC898, 0xCAEB, 0xCC7D, 0xCE0E,
    0xD0B3, 0xD2C0, 0xD456, 0xD625, 0xD97A, 0xDB09, 0xDD9F, 0xDFEC,
    0xE0E6, 0xE295, 0xE403, 0xE670, 0xE92F, 0xEB5C, 0xEDCA, 0xEFB9,
    0xF104, 0xF377, 0xF5E1, 0xF792, 0xF8CD, 0xFABE, 0xFC28, 0xFE5B,];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode(0x10), [0x11, 0xE2]);
        assert_eq!(encode(0x11), [0x11, 0xE2]);
        assert_eq!(encode(0x12), [0x13, 0x91]);
        assert_eq!(encode(0x16), [0x17, 0x74]);

        for i in 0..128u8 {
            assert_eq!(encode(i << 1)[0] & 0xFE, i << 1);
        }
    }

    #[test]
    fn test_decode() {
        for i in 0..128u8 {
            let w = encode(i << 1);
            assert_eq!(decode(w), Some((i << 1, 0)));
            assert_eq!(decode([w[0] ^ 0x20, w[1]]), Some((i << 1, 1)));
            assert_eq!(decode([w[0], w[1] ^ 0x81]), Some((i << 1, 2)));
        }
    }
}

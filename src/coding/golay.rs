//! Encoding and decoding of the (20, 8, 7) Golay code protecting the DMR slot type.
//!
//! The code can correct up to 3 errors.

/// Encode the given byte into a 20-bit codeword, returned as `[data, parity low, parity
/// high]`. Only the upper nibble of the last byte is significant.
pub fn encode(data: u8) -> [u8; 3] {
    let parity = ENCODING[data as usize];
    [data, parity as u8, (parity >> 8) as u8]
}

/// Try to decode the given codeword to the nearest valid data byte, correcting up to 3
/// errors.
///
/// If decoding was successful, return `Some((data, err))`, where `err` is the number of
/// corrected bits. Otherwise, return `None` to indicate an unrecoverable error.
pub fn decode(word: [u8; 3]) -> Option<(u8, usize)> {
    let bits = to_word(word);

    (0..=255u8)
        .map(|data| (data, (to_word(encode(data)) ^ bits).count_ones() as usize))
        .min_by_key(|&(_, err)| err)
        .and_then(|(data, err)| if err <= 3 { Some((data, err)) } else { None })
}

/// Pack a codeword into the low 20 bits of a word.
fn to_word(word: [u8; 3]) -> u32 {
    (word[0] as u32) << 12 | (word[1] as u32) << 4 | (word[2] as u32) >> 4
}

/// Maps each data byte to its parity bits, stored as `high << 8 | low`.
const ENCODING: [u16; 256] = [
    0x0000, 0xB08E, 0xE093, 0x501D, 0x70A9, 0xC027, 0x903A, 0x20B4,
    0x60DC, 0xD052, 0x804F, 0x30C1, 0x1075, 0xA0FB, 0xF0E6, 0x4068,
    0x7036, 0xC0B8, 0x90A5, 0x202B, 0x009F, 0xB011, 0xE00C, 0x5082,
    0x10EA, 0xA064, 0xF079, 0x40F7, 0x6043, 0xD0CD, 0x80D0, 0x305E,
    0xD06C, 0x60E2, 0x30FF, 0x8071, 0xA0C5, 0x104B, 0x4056, 0xF0D8,
    0xB0B0, 0x003E, 0x5023, 0xE0AD, 0xC019, 0x7097, 0x208A, 0x9004,
    0xA05A, 0x10D4, 0x40C9, 0xF047, 0xD0F3, 0x607D, 0x3060, 0x80EE,
    0xC086, 0x7008, 0x2015, 0x909B, 0xB02F, 0x00A1, 0x50BC, 0xE032,
    0x90D9, 0x2057, 0x704A, 0xC0C4, 0xE070, 0x50FE, 0x00E3, 0xB06D,
    0xF005, 0x408B, 0x1096, 0xA018, 0x80AC, 0x3022, 0x603F, 0xD0B1,
    0xE0EF, 0x5061, 0x007C, 0xB0F2, 0x9046, 0x20C8, 0x70D5, 0xC05B,
    0x8033, 0x30BD, 0x60A0, 0xD02E, 0xF09A, 0x4014, 0x1009, 0xA087,
    0x40B5, 0xF03B, 0xA026, 0x10A8, 0x301C, 0x8092, 0xD08F, 0x6001,
    0x2069, 0x90E7, 0xC0FA, 0x7074, 0x50C0, 0xE04E, 0xB053, 0x00DD,
    0x3083, 0x800D, 0xD010, 0x609E, 0x402A, 0xF0A4, 0xA0B9, 0x1037,
    0x505F, 0xE0D1, 0xB0CC, 0x0042, 0x20F6, 0x9078, 0xC065, 0x70EB,
    0xA03D, 0x10B3, 0x40AE, 0xF020, 0xD094, 0x601A, 0x3007, 0x8089,
    0xC0E1, 0x706F, 0x2072, 0x90FC, 0xB048, 0x00C6, 0x50DB, 0xE055,
    0xD00B, 0x6085, 0x3098, 0x8016, 0xA0A2, 0x102C, 0x4031, 0xF0BF,
    0xB0D7, 0x0059, 0x5044, 0xE0CA, 0xC07E, 0x70F0, 0x20ED, 0x9063,
    0x7051, 0xC0DF, 0x90C2, 0x204C, 0x00F8, 0xB076, 0xE06B, 0x50E5,
    0x108D, 0xA003, 0xF01E, 0x4090, 0x6024, 0xD0AA, 0x80B7, 0x3039,
    0x0067, 0xB0E9, 0xE0F4, 0x507A, 0x70CE, 0xC040, 0x905D, 0x20D3,
    0x60BB, 0xD035, 0x8028, 0x30A6, 0x1012, 0xA09C, 0xF081, 0x400F,
    0x30E4, 0x806A, 0xD077, 0x60F9, 0x404D, 0xF0C3, 0xA0DE, 0x1050,
    0x5038, 0xE0B6, 0xB0AB, 0x0025, 0x2091, 0x901F, 0xC002, 0x708C,
    0x40D2, 0xF05C, 0xA041, 0x10CF, 0x307B, 0x80F5, 0xD0E8, 0x6066,
    0x200E, 0x9080, 0xC09D, 0x7013, 0x50A7, 0xE029, 0xB034, 0x00BA,
    0xE088, 0x5006, 0x001B, 0xB095, 0x9021, 0x20AF, 0x70B2, 0xC03C,
    0x8054, 0x30DA, 0x60C7, 0xD049, 0xF0FD, 0x4073, 0x106E, 0xA0E0,
    0x90BE, 0x2030, 0x702D, 0xC0A3, 0xE017, 0x5099, 0x0084, 0xB00A,
    0xF062, 0x40EC, 0x10F1, 0xA07F, 0x80CB, 0x3045, 0x6058, 0xD0D6,];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode(0x00), [0x00, 0x00, 0x00]);
        assert_eq!(encode(0x11), [0x11, 0xB8, 0xC0]);
        assert_eq!(encode(0x12), [0x12, 0xA5, 0x90]);

        for i in 0..=255u8 {
            assert_eq!(encode(i)[2] & 0x0F, 0);
        }
    }

    #[test]
    fn test_decode() {
        let w = encode(0x11);
        assert_eq!(decode(w), Some((0x11, 0)));
        assert_eq!(decode([w[0] ^ 0x80, w[1], w[2]]), Some((0x11, 1)));
        assert_eq!(decode([w[0] ^ 0x01, w[1] ^ 0x10, w[2] ^ 0x80]), Some((0x11, 3)));

        for i in 0..=255u8 {
            let w = encode(i);
            assert_eq!(decode([w[0], w[1] ^ 0x41, w[2]]), Some((i, 2)));
        }
    }
}

//! Encoding and decoding of the BPTC(196, 96) block product turbo code used for DMR full
//! link control.
//!
//! The 96 data bits are laid into a 13x15 matrix (plus one reserved bit) whose 9 data rows
//! are protected by the (15, 11) Hamming code and whose 15 columns are protected by the (13,
//! 9) Hamming code. The matrix is then interleaved and split around the 48-bit sync/slot
//! type field in the middle of the burst.

use crate::bits::{bits_to_byte, bits_to_bytes, byte_to_bits, bytes_to_bits, from_word, to_word};
use crate::coding::hamming;
use crate::consts::PAYLOAD_BYTES;

/// Number of data bytes carried by the code.
pub const DATA_BYTES: usize = 12;

/// Number of bits in the coded matrix.
const MATRIX_BITS: usize = 196;
/// Number of bits in each matrix row.
const ROW_BITS: usize = 15;
/// Number of rows carrying data.
const DATA_ROWS: usize = 9;
/// Number of bits in each matrix column.
const COL_BITS: usize = 13;

/// Inclusive ranges of matrix positions holding data bits, in order.
const DATA_RANGES: [(usize, usize); DATA_ROWS] = [
    (4, 11),
    (16, 26),
    (31, 41),
    (46, 56),
    (61, 71),
    (76, 86),
    (91, 101),
    (106, 116),
    (121, 131),
];

fn data_positions() -> impl Iterator<Item = usize> {
    DATA_RANGES.iter().flat_map(|&(start, end)| start..=end)
}

/// Position in the transmitted bit stream of the given matrix position.
fn interleave(pos: usize) -> usize {
    pos * 181 % MATRIX_BITS
}

/// Encode the given 12 data bytes into the burst payload. Payload bits outside the code's
/// positions (the sync and slot type fields) are preserved.
pub fn encode(data: &[u8; DATA_BYTES], payload: &mut [u8; PAYLOAD_BYTES]) {
    let mut bits = [false; DATA_BYTES * 8];
    bytes_to_bits(data, &mut bits);

    let mut matrix = [false; MATRIX_BITS];

    for (pos, &bit) in data_positions().zip(bits.iter()) {
        matrix[pos] = bit;
    }

    for r in 0..DATA_ROWS {
        let row = &mut matrix[r * ROW_BITS + 1..(r + 1) * ROW_BITS + 1];
        let code = hamming::standard::encode(to_word(&row[..11]) as u16);
        from_word(code as u32, row);
    }

    for c in 0..ROW_BITS {
        let mut col = [false; COL_BITS];

        for (a, bit) in col.iter_mut().enumerate() {
            *bit = matrix[c + 1 + a * ROW_BITS];
        }

        let code = hamming::shortened::encode(to_word(&col[..9]) as u16);
        from_word(code as u32, &mut col);

        for (a, &bit) in col.iter().enumerate() {
            matrix[c + 1 + a * ROW_BITS] = bit;
        }
    }

    let mut raw = [false; MATRIX_BITS];

    for (a, &bit) in matrix.iter().enumerate() {
        raw[interleave(a)] = bit;
    }

    bits_to_bytes(&raw[..96], &mut payload[..12]);

    let mid = bits_to_byte(&raw[96..100]);
    payload[12] = payload[12] & 0x3F | mid & 0xC0;
    payload[20] = payload[20] & 0xFC | mid >> 4 & 0x03;

    bits_to_bytes(&raw[100..], &mut payload[21..]);
}

/// Try to decode the 12 data bytes from the given burst payload, correcting up to 1 error
/// in each column and then each row.
///
/// Return `Some((data, err))` with the number of corrected bits on success, or `None` if
/// any codeword was unrecoverable.
pub fn decode(payload: &[u8; PAYLOAD_BYTES]) -> Option<([u8; DATA_BYTES], usize)> {
    let mut raw = [false; MATRIX_BITS];
    bytes_to_bits(&payload[..12], &mut raw[..96]);

    let b12 = byte_to_bits(payload[12]);
    let b20 = byte_to_bits(payload[20]);
    raw[96] = b12[0];
    raw[97] = b12[1];
    raw[98] = b20[6];
    raw[99] = b20[7];

    bytes_to_bits(&payload[21..], &mut raw[100..]);

    let mut matrix = [false; MATRIX_BITS];

    for (a, bit) in matrix.iter_mut().enumerate() {
        *bit = raw[interleave(a)];
    }

    let mut errors = 0;

    for c in 0..ROW_BITS {
        let mut col = [false; COL_BITS];

        for (a, bit) in col.iter_mut().enumerate() {
            *bit = matrix[c + 1 + a * ROW_BITS];
        }

        let (data, err) = hamming::shortened::decode(to_word(&col) as u16)?;
        errors += err;

        from_word(data as u32, &mut col[..9]);

        for (a, &bit) in col[..9].iter().enumerate() {
            matrix[c + 1 + a * ROW_BITS] = bit;
        }
    }

    for r in 0..DATA_ROWS {
        let row = &mut matrix[r * ROW_BITS + 1..(r + 1) * ROW_BITS + 1];
        let (data, err) = hamming::standard::decode(to_word(row) as u16)?;
        errors += err;

        from_word(data as u32, &mut row[..11]);
    }

    let mut bits = [false; DATA_BYTES * 8];

    for (bit, pos) in bits.iter_mut().zip(data_positions()) {
        *bit = matrix[pos];
    }

    let mut data = [0; DATA_BYTES];
    bits_to_bytes(&bits, &mut data);

    Some((data, errors))
}

#[cfg(test)]
mod test {
    use super::*;

    const DATA: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

    const CODED: [u8; 33] = [
        0x07, 0xA4, 0x06, 0x90, 0x04, 0xF1, 0x08, 0x68, 0x20, 0x03, 0xA3,
        0xC3, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x08,
        0x20, 0x08, 0xCB, 0x53, 0x0A, 0x46, 0x02, 0x41, 0x17, 0x94, 0x75,
    ];

    #[test]
    fn test_positions() {
        assert_eq!(data_positions().count(), 96);

        let mut seen = [false; MATRIX_BITS];

        for a in 0..MATRIX_BITS {
            assert!(!seen[interleave(a)]);
            seen[interleave(a)] = true;
        }
    }

    #[test]
    fn test_encode() {
        let mut payload = [0; 33];
        encode(&DATA, &mut payload);
        assert_eq!(payload, CODED);
    }

    #[test]
    fn test_preserve() {
        let mut payload = [0xFF; 33];
        encode(&DATA, &mut payload);

        assert_eq!(&payload[..12], &CODED[..12]);
        assert_eq!(payload[12], 0x7F);
        assert!(payload[13..20].iter().all(|&b| b == 0xFF));
        assert_eq!(payload[20], 0xFD);
        assert_eq!(&payload[21..], &CODED[21..]);
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode(&CODED), Some((DATA, 0)));

        let mut payload = CODED;
        payload[0] ^= 0x40;
        payload[17] ^= 0xFF;
        payload[30] ^= 0x01;
        assert_eq!(decode(&payload), Some((DATA, 2)));
    }

    #[test]
    fn test_sweep() {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        let mut inputs: Vec<[u8; DATA_BYTES]> = (0..DATA_BYTES * 8).map(|bit| {
            let mut data = [0; DATA_BYTES];
            data[bit / 8] = 0x80 >> (bit % 8);
            data
        }).collect();

        inputs.push([0xFF; DATA_BYTES]);
        inputs.extend((0..500).map(|_| rng.gen::<[u8; DATA_BYTES]>()));

        for data in inputs {
            let mut payload = [0; PAYLOAD_BYTES];
            encode(&data, &mut payload);
            assert_eq!(decode(&payload), Some((data, 0)));

            payload[0] ^= 0x40;
            assert_eq!(decode(&payload), Some((data, 1)));
        }
    }
}

//! Encoding and decoding of the (15, 11, 3) standard, (13, 9, 3) shortened, and (16, 11,
//! 4) extended Hamming codes used by DMR block product codes and embedded signalling.
//!
//! Each code can correct up to 1 error. Codewords are packed MSB first, with the data
//! bits in the high part of the word and the parity bits in the low part.

use binfield_matrix::{matrix_mul, matrix_mul_systematic};

/// Encoding and decoding of the (15, 11, 3) code.
pub mod standard {
    use super::*;

    /// Encode the given 11 bits of data into a 15-bit codeword.
    pub fn encode(data: u16) -> u16 {
        assert!(data >> 11 == 0);
        matrix_mul_systematic(data, GEN)
    }

    /// Try to decode the given 15-bit word to the nearest codeword, correcting up to 1
    /// error.
    ///
    /// If decoding was successful, return `Some((data, err))`, where `data` is the 11
    /// data bits and `err` is the number of corrected bits. Otherwise, return `None` to
    /// indicate an unrecoverable error.
    pub fn decode(word: u16) -> Option<(u16, usize)> {
        assert!(word >> 15 == 0);
        super::decode(word, PAR, LOCATIONS).map(|(w, n)| (w >> 4, n))
    }

    /// Generator matrix, without identity part.
    const GEN: &[u16] = &[
        0b11110101100,
        0b01111010110,
        0b00111101011,
        0b11101011001,
    ];

    /// Parity-check matrix derived from generator using standard method.
    const PAR: &[u16] = &[
        0b111101011001000,
        0b011110101100100,
        0b001111010110010,
        0b111010110010001,
    ];

    /// Maps 4-bit syndrome values to bit error locations.
    const LOCATIONS: &[u16] = &[
        0,
        0b0000000000000001,
        0b0000000000000010,
        0b0000000000010000,
        0b0000000000000100,
        0b0000000100000000,
        0b0000000000100000,
        0b0000010000000000,
        0b0000000000001000,
        0b0100000000000000,
        0b0000001000000000,
        0b0000000010000000,
        0b0000000001000000,
        0b0010000000000000,
        0b0000100000000000,
        0b0001000000000000,
    ];
}

/// Encoding and decoding of the (13, 9, 3) code.
pub mod shortened {
    use super::*;

    /// Encode the given 9 data bits into a 13-bit codeword.
    pub fn encode(data: u16) -> u16 {
        assert!(data >> 9 == 0);
        matrix_mul_systematic(data, GEN)
    }

    /// Try to decode the given 13-bit word to the nearest codeword, correcting up to 1
    /// error.
    ///
    /// If decoding was successful, return `Some((data, err))`, where `data` is the 9
    /// data bits and `err` is the number of corrected bits. Otherwise, return `None` to
    /// indicate an unrecoverable error.
    pub fn decode(word: u16) -> Option<(u16, usize)> {
        assert!(word >> 13 == 0);
        super::decode(word, PAR, LOCATIONS).map(|(w, n)| (w >> 4, n))
    }

    const GEN: &[u16] = &[
        0b110101100,
        0b111010110,
        0b111101011,
        0b101011001,
    ];

    const PAR: &[u16] = &[
        0b1101011001000,
        0b1110101100100,
        0b1111010110010,
        0b1010110010001,
    ];

    const LOCATIONS: &[u16] = &[
        0,
        0b0000000000000001,
        0b0000000000000010,
        0b0000000000010000,
        0b0000000000000100,
        0b0000000100000000,
        0b0000000000100000,
        0b0000010000000000,
        0b0000000000001000,
        0,
        0b0000001000000000,
        0b0000000010000000,
        0b0000000001000000,
        0,
        0b0000100000000000,
        0b0001000000000000,
    ];
}

/// Encoding and decoding of the (16, 11, 4) code.
pub mod extended {
    use super::*;

    /// Encode the given 11 data bits into a 16-bit codeword.
    pub fn encode(data: u16) -> u16 {
        assert!(data >> 11 == 0);
        matrix_mul_systematic(data, GEN)
    }

    /// Try to decode the given 16-bit word to the nearest codeword, correcting up to 1
    /// error. Double errors are detected but not corrected.
    ///
    /// If decoding was successful, return `Some((data, err))`, where `data` is the 11
    /// data bits and `err` is the number of corrected bits. Otherwise, return `None` to
    /// indicate an unrecoverable error.
    pub fn decode(word: u16) -> Option<(u16, usize)> {
        super::decode(word, PAR, LOCATIONS).map(|(w, n)| (w >> 5, n))
    }

    const GEN: &[u16] = &[
        0b11110101100,
        0b01111010110,
        0b00111101011,
        0b11101011001,
        0b10100110111,
    ];

    const PAR: &[u16] = &[
        0b1111010110010000,
        0b0111101011001000,
        0b0011110101100100,
        0b1110101100100010,
        0b1010011011100001,
    ];

    /// Maps 5-bit syndrome values to bit error locations.
    const LOCATIONS: &[u16] = &[
        0,
        0b0000000000000001,
        0b0000000000000010,
        0,
        0b0000000000000100,
        0,
        0,
        0b0000000000100000,
        0b0000000000001000,
        0,
        0,
        0b0000001000000000,
        0,
        0b0000000001000000,
        0b0000100000000000,
        0,
        0b0000000000010000,
        0,
        0,
        0b1000000000000000,
        0,
        0b0000010000000000,
        0b0000000100000000,
        0,
        0,
        0b0000000010000000,
        0b0100000000000000,
        0,
        0b0001000000000000,
        0,
        0,
        0b0010000000000000,
    ];
}

fn decode(word: u16, par: &[u16], locs: &[u16]) -> Option<(u16, usize)> {
    let s: usize = matrix_mul(word, par);

    if s == 0 {
        return Some((word, 0));
    }

    locs.get(s).and_then(|&loc| if loc == 0 {
        None
    } else {
        Some((word ^ loc, 1))
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_standard() {
        // Parity bits follow the XOR subsets of the data bits, d0 being the MSB.
        assert_eq!(standard::encode(0b10000000000), 0b100000000001001);
        assert_eq!(standard::encode(0b00000000001), 0b000000000010011);

        let w = 0b10101010101;
        let e = standard::encode(w);

        for i in 0..15 {
            assert_eq!(standard::decode(e ^ 1 << i), Some((w, 1)));
        }

        for i in 0..1<<11 {
            assert_eq!(standard::decode(standard::encode(i)), Some((i, 0)));
        }
    }

    #[test]
    fn test_shortened() {
        assert_eq!(shortened::encode(0b100000000), 0b1000000001111);
        assert_eq!(shortened::encode(0b000000001), 0b0000000010011);

        let w = 0b110011010;
        let e = shortened::encode(w);

        for i in 0..13 {
            assert_eq!(shortened::decode(e ^ 1 << i), Some((w, 1)));
        }

        for i in 0..1<<9 {
            assert_eq!(shortened::decode(shortened::encode(i)), Some((i, 0)));
        }
    }

    #[test]
    fn test_extended() {
        assert_eq!(extended::encode(0b10000000000), 0b1000000000010011);

        let w = 0b01101100101;
        let e = extended::encode(w);

        for i in 0..16 {
            assert_eq!(extended::decode(e ^ 1 << i), Some((w, 1)));
        }

        // Double errors are detected.
        assert_eq!(extended::decode(e ^ 0b11), None);
        assert_eq!(extended::decode(e ^ 0b1000000000000001), None);

        for i in 0..1<<11 {
            assert_eq!(extended::decode(extended::encode(i)), Some((i, 0)));
        }
    }
}

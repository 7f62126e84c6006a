//! Encoding of the (12, 9, 4) shortened Reed-Solomon code protecting DMR full link
//! control.
//!
//! Only the encoder is provided: parity is computed with a linear feedback shift register
//! over GF(2<sup>8</sup>) and emitted highest-order coefficient first.

use crate::coding::galois::Codeword;

/// Number of data bytes in a codeword.
pub const DATA_BYTES: usize = 9;
/// Number of parity bytes in a codeword.
pub const PARITY_BYTES: usize = 3;

/// Generator polynomial coefficients, lowest degree first.
const GEN: [u8; PARITY_BYTES + 1] = [64, 56, 14, 1];

/// Compute the 3 parity bytes for the given 9 data bytes.
pub fn encode(data: &[u8; DATA_BYTES]) -> [u8; PARITY_BYTES] {
    let mut parity = [Codeword::default(); PARITY_BYTES];

    for &byte in data.iter() {
        let feedback = Codeword::new(byte) + parity[PARITY_BYTES - 1];

        for j in (1..PARITY_BYTES).rev() {
            parity[j] = parity[j - 1] + Codeword::new(GEN[j]) * feedback;
        }

        parity[0] = Codeword::new(GEN[0]) * feedback;
    }

    [parity[2].bits(), parity[1].bits(), parity[0].bits()]
}

/// Check if the given 12-byte codeword has consistent parity.
pub fn verify(word: &[u8; DATA_BYTES + PARITY_BYTES]) -> bool {
    let mut data = [0; DATA_BYTES];
    data.copy_from_slice(&word[..DATA_BYTES]);

    encode(&data)[..] == word[DATA_BYTES..]
}

//! Utilities for unpacking bytes into bits and packing bits back into bytes and words.
//!
//! All conversions are MSB first: bit 0 of an unpacked byte is its most significant bit.

/// Unpack a byte into 8 bits, MSB first.
pub fn byte_to_bits(byte: u8) -> [bool; 8] {
    let mut bits = [false; 8];

    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = byte >> (7 - i) & 1 == 1;
    }

    bits
}

/// Pack up to 8 bits, MSB first, into a byte. Missing trailing bits are taken as zero.
pub fn bits_to_byte(bits: &[bool]) -> u8 {
    assert!(bits.len() <= 8);

    bits.iter().enumerate().fold(0, |byte, (i, &bit)| {
        byte | (bit as u8) << (7 - i)
    })
}

/// Unpack each byte of `bytes` into `bits`, which must hold 8 bits per byte.
pub fn bytes_to_bits(bytes: &[u8], bits: &mut [bool]) {
    assert!(bits.len() >= bytes.len() * 8);

    for (&byte, chunk) in bytes.iter().zip(bits.chunks_mut(8)) {
        chunk.copy_from_slice(&byte_to_bits(byte));
    }
}

/// Pack `bits` into `bytes`, 8 bits per byte.
pub fn bits_to_bytes(bits: &[bool], bytes: &mut [u8]) {
    for (byte, chunk) in bytes.iter_mut().zip(bits.chunks(8)) {
        *byte = bits_to_byte(chunk);
    }
}

/// Pack up to 32 bits, MSB first, into the low bits of a word.
pub fn to_word(bits: &[bool]) -> u32 {
    assert!(bits.len() <= 32);
    bits.iter().fold(0, |word, &bit| word << 1 | bit as u32)
}

/// Unpack the low `bits.len()` bits of the given word, MSB first, into `bits`.
pub fn from_word(word: u32, bits: &mut [bool]) {
    let n = bits.len();
    assert!(n <= 32);

    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = word >> (n - 1 - i) & 1 == 1;
    }
}

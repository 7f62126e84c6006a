//! Streaming SHA-256 digest, used to answer the master's login challenge.

/// Number of bytes in a digest.
pub const DIGEST_BYTES: usize = 32;

/// Number of bytes in each compressed block.
const BLOCK_BYTES: usize = 64;

/// Initial hash state.
const INIT: [u32; 8] = [
    0x6A09E667, 0xBB67AE85, 0x3C6EF372, 0xA54FF53A,
    0x510E527F, 0x9B05688C, 0x1F83D9AB, 0x5BE0CD19,
];

/// Per-round additive constants.
const ROUND: [u32; 64] = [
    0x428A2F98, 0x71374491, 0xB5C0FBCF, 0xE9B5DBA5,
    0x3956C25B, 0x59F111F1, 0x923F82A4, 0xAB1C5ED5,
    0xD807AA98, 0x12835B01, 0x243185BE, 0x550C7DC3,
    0x72BE5D74, 0x80DEB1FE, 0x9BDC06A7, 0xC19BF174,
    0xE49B69C1, 0xEFBE4786, 0x0FC19DC6, 0x240CA1CC,
    0x2DE92C6F, 0x4A7484AA, 0x5CB0A9DC, 0x76F988DA,
    0x983E5152, 0xA831C66D, 0xB00327C8, 0xBF597FC7,
    0xC6E00BF3, 0xD5A79147, 0x06CA6351, 0x14292967,
    0x27B70A85, 0x2E1B2138, 0x4D2C6DFC, 0x53380D13,
    0x650A7354, 0x766A0ABB, 0x81C2C92E, 0x92722C85,
    0xA2BFE8A1, 0xA81A664B, 0xC24B8B70, 0xC76C51A3,
    0xD192E819, 0xD6990624, 0xF40E3585, 0x106AA070,
    0x19A4C116, 0x1E376C08, 0x2748774C, 0x34B0BCB5,
    0x391C0CB3, 0x4ED8AA4A, 0x5B9CCA4F, 0x682E6FF3,
    0x748F82EE, 0x78A5636F, 0x84C87814, 0x8CC70208,
    0x90BEFFFA, 0xA4506CEB, 0xBEF9A3F7, 0xC67178F2,];

/// Incremental SHA-256 hasher.
///
/// Data may be fed in any number of `update` calls; partial blocks are buffered until
/// enough input arrives or the digest is finalized.
#[derive(Clone)]
pub struct Sha256 {
    /// Current hash state.
    state: [u32; 8],
    /// Buffered bytes of the current partial block.
    buf: [u8; BLOCK_BYTES],
    /// Number of valid bytes in `buf`.
    buffered: usize,
    /// Total number of message bytes seen.
    len: u64,
}

impl Default for Sha256 {
    fn default() -> Self { Sha256::new() }
}

impl Sha256 {
    /// Construct a new `Sha256` with the standard initial state.
    pub fn new() -> Sha256 {
        Sha256 {
            state: INIT,
            buf: [0; BLOCK_BYTES],
            buffered: 0,
            len: 0,
        }
    }

    /// Compute the digest of the given message in one shot.
    pub fn digest(data: &[u8]) -> [u8; DIGEST_BYTES] {
        let mut h = Sha256::new();
        h.update(data);
        h.finalize()
    }

    /// Feed the given bytes into the hash.
    pub fn update(&mut self, mut data: &[u8]) {
        self.len += data.len() as u64;

        if self.buffered > 0 {
            let take = (BLOCK_BYTES - self.buffered).min(data.len());
            self.buf[self.buffered..self.buffered + take].copy_from_slice(&data[..take]);
            self.buffered += take;
            data = &data[take..];

            if self.buffered < BLOCK_BYTES {
                return;
            }

            let block = self.buf;
            self.compress(&block);
            self.buffered = 0;
        }

        let mut blocks = data.chunks_exact(BLOCK_BYTES);

        for block in &mut blocks {
            self.compress(block);
        }

        let rest = blocks.remainder();
        self.buf[..rest.len()].copy_from_slice(rest);
        self.buffered = rest.len();
    }

    /// Pad the message and produce the final digest.
    pub fn finalize(mut self) -> [u8; DIGEST_BYTES] {
        let bits = self.len.wrapping_mul(8);

        // The terminating 1 bit, then zeros up to the length field.
        let pad = if self.buffered < 56 { 56 - self.buffered } else { 120 - self.buffered };
        let mut tail = [0u8; BLOCK_BYTES + 8];
        tail[0] = 0x80;
        tail[pad..pad + 8].copy_from_slice(&bits.to_be_bytes());

        let len = self.len;
        self.update(&tail[..pad + 8]);
        self.len = len;

        let mut out = [0; DIGEST_BYTES];

        for (chunk, word) in out.chunks_mut(4).zip(self.state.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }

        out
    }

    fn compress(&mut self, block: &[u8]) {
        let mut w = [0u32; 64];

        for (word, chunk) in w.iter_mut().zip(block.chunks(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        for t in 16..64 {
            let s0 = w[t - 15].rotate_right(7) ^ w[t - 15].rotate_right(18) ^ w[t - 15] >> 3;
            let s1 = w[t - 2].rotate_right(17) ^ w[t - 2].rotate_right(19) ^ w[t - 2] >> 10;

            w[t] = w[t - 16]
                .wrapping_add(s0)
                .wrapping_add(w[t - 7])
                .wrapping_add(s1);
        }

        let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = self.state;

        for t in 0..64 {
            let s1 = e.rotate_right(6) ^ e.rotate_right(11) ^ e.rotate_right(25);
            let ch = g ^ (e & (f ^ g));
            let t1 = h
                .wrapping_add(s1)
                .wrapping_add(ch)
                .wrapping_add(ROUND[t])
                .wrapping_add(w[t]);

            let s0 = a.rotate_right(2) ^ a.rotate_right(13) ^ a.rotate_right(22);
            let maj = (a & b) | (c & (a | b));
            let t2 = s0.wrapping_add(maj);

            h = g;
            g = f;
            f = e;
            e = d.wrapping_add(t1);
            d = c;
            c = b;
            b = a;
            a = t1.wrapping_add(t2);
        }

        for (s, x) in self.state.iter_mut().zip([a, b, c, d, e, f, g, h].iter()) {
            *s = s.wrapping_add(*x);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{thread_rng, Rng};
    use sha2::Digest;

    #[test]
    fn test_vectors() {
        assert_eq!(hex::encode(Sha256::digest(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
        assert_eq!(hex::encode(Sha256::digest(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        assert_eq!(hex::encode(Sha256::digest(
                b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq")),
            "248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1");
    }

    #[test]
    fn test_challenge() {
        let mut h = Sha256::new();
        h.update(&[0x01, 0x02, 0x03, 0x04]);
        h.update(b"passw0rd");

        assert_eq!(hex::encode(h.finalize()),
            "3bee14ffd8e5cfe58a54e3420b826556c4a585fb37474ed28db2f653f303213d");
    }

    #[test]
    fn test_streaming() {
        let mut rng = thread_rng();

        for len in [0, 1, 55, 56, 63, 64, 65, 119, 120, 128, 1000].iter() {
            let data: Vec<u8> = (0..*len).map(|_| rng.gen()).collect();
            let expected = sha2::Sha256::digest(&data);

            assert_eq!(&Sha256::digest(&data)[..], &expected[..]);

            let mut h = Sha256::new();

            for chunk in data.chunks(7) {
                h.update(chunk);
            }

            assert_eq!(&h.finalize()[..], &expected[..]);
        }
    }
}

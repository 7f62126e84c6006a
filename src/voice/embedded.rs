//! Embedded signalling in voice bursts B through F: the EMB header and the fragments of
//! the embedded link control.
//!
//! The 72 LC bits and a 5-bit checksum are laid into a 7x16 matrix whose rows are (16,
//! 11) Hamming coded and whose 8th row holds the column parity. The 128 matrix bits are
//! read out column-wise and sent as four 32-bit fragments, one per burst B-E.

use collect_slice::CollectSlice;

use crate::bits::{bits_to_bytes, bytes_to_bits, from_word, to_word};
use crate::coding::{hamming, qr};
use crate::consts::{LINK_CONTROL_BYTES, PAYLOAD_BYTES};
use crate::voice::control::LinkControl;

/// Number of bits in the interleaved embedded LC.
pub const RAW_BITS: usize = 128;
/// Number of embedded LC bits carried in each burst.
pub const FRAGMENT_BITS: usize = 32;
/// Number of fragments making up the embedded LC.
pub const FRAGMENTS: usize = RAW_BITS / FRAGMENT_BITS;

/// Number of bits in each matrix row.
const ROW_BITS: usize = 16;
/// Number of Hamming-coded rows.
const DATA_ROWS: usize = 7;

/// Half-open ranges of matrix positions holding LC bits, in order.
const DATA_RANGES: [(usize, usize); DATA_ROWS] = [
    (0, 11),
    (16, 27),
    (32, 42),
    (48, 58),
    (64, 74),
    (80, 90),
    (96, 106),
];

/// Matrix positions of the checksum bits, MSB first.
const CHECKSUM_POSITIONS: [usize; 5] = [42, 58, 74, 90, 106];

fn data_positions() -> impl Iterator<Item = usize> {
    DATA_RANGES.iter().flat_map(|&(start, end)| start..end)
}

/// Matrix position of each transmitted bit.
fn interleave_order() -> [usize; RAW_BITS] {
    let mut order = [0; RAW_BITS];
    let mut b = 0;

    for pos in order.iter_mut() {
        *pos = b;
        b += ROW_BITS;

        if b > RAW_BITS - 1 {
            b -= RAW_BITS - 1;
        }
    }

    order
}

/// Checksum over the LC bytes: their sum modulo 31.
fn checksum(lc: &[u8; LINK_CONTROL_BYTES]) -> u8 {
    (lc.iter().map(|&b| b as u32).sum::<u32>() % 31) as u8
}

/// Link control start/stop, signalling which fragment of the embedded LC a burst carries.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Lcss {
    /// No embedded LC, or a single-fragment message.
    Single,
    /// First fragment.
    First,
    /// Last fragment.
    Last,
    /// Intermediate fragment.
    Continuation,
}

impl Lcss {
    /// Create a new `Lcss` from the given 2 bits.
    pub fn from_bits(bits: u8) -> Lcss {
        match bits & 0b11 {
            0 => Lcss::Single,
            1 => Lcss::First,
            2 => Lcss::Last,
            _ => Lcss::Continuation,
        }
    }

    /// Wire value of the LCSS.
    pub fn bits(&self) -> u8 {
        match *self {
            Lcss::Single => 0,
            Lcss::First => 1,
            Lcss::Last => 2,
            Lcss::Continuation => 3,
        }
    }
}

/// Coded and interleaved embedded LC, ready to be split across a superframe.
#[derive(Copy, Clone)]
pub struct EmbeddedLc {
    raw: [bool; RAW_BITS],
}

impl EmbeddedLc {
    /// Encode the given LC.
    pub fn new(lc: &LinkControl) -> Self {
        let bytes = lc.to_bytes();

        let mut bits = [false; LINK_CONTROL_BYTES * 8];
        bytes_to_bits(&bytes, &mut bits);

        let mut matrix = [false; RAW_BITS];

        for (pos, &bit) in data_positions().zip(bits.iter()) {
            matrix[pos] = bit;
        }

        let mut crc = [false; 5];
        from_word(checksum(&bytes) as u32, &mut crc);

        for (&pos, &bit) in CHECKSUM_POSITIONS.iter().zip(crc.iter()) {
            matrix[pos] = bit;
        }

        for row in matrix.chunks_mut(ROW_BITS).take(DATA_ROWS) {
            let code = hamming::extended::encode(to_word(&row[..11]) as u16);
            from_word(code as u32, row);
        }

        for a in 0..ROW_BITS {
            matrix[DATA_ROWS * ROW_BITS + a] = (0..DATA_ROWS)
                .fold(false, |parity, r| parity ^ matrix[r * ROW_BITS + a]);
        }

        let mut raw = [false; RAW_BITS];
        interleave_order().iter().map(|&b| matrix[b]).collect_slice_checked(&mut raw[..]);

        EmbeddedLc { raw }
    }

    /// Try to decode the LC from the given fragments, received in order, correcting up to
    /// 1 error per row.
    ///
    /// Return `None` if a row is unrecoverable, the column parity or checksum doesn't
    /// match, or the LC isn't a voice call.
    pub fn decode(fragments: &[[bool; FRAGMENT_BITS]; FRAGMENTS]) -> Option<LinkControl> {
        let mut matrix = [false; RAW_BITS];

        let bits = fragments.iter().flat_map(|f| f.iter());

        for (&pos, &bit) in interleave_order().iter().zip(bits) {
            matrix[pos] = bit;
        }

        for row in matrix.chunks_mut(ROW_BITS).take(DATA_ROWS) {
            let (data, _) = hamming::extended::decode(to_word(row) as u16)?;
            let code = hamming::extended::encode(data);
            from_word(code as u32, row);
        }

        for a in 0..ROW_BITS {
            let parity = (0..DATA_ROWS).fold(false, |p, r| p ^ matrix[r * ROW_BITS + a]);

            if parity != matrix[DATA_ROWS * ROW_BITS + a] {
                return None;
            }
        }

        let mut bits = [false; LINK_CONTROL_BYTES * 8];
        data_positions().map(|pos| matrix[pos]).collect_slice_checked(&mut bits[..]);

        let mut bytes = [0; LINK_CONTROL_BYTES];
        bits_to_bytes(&bits, &mut bytes);

        let mut crc = [false; 5];
        CHECKSUM_POSITIONS.iter().map(|&pos| matrix[pos]).collect_slice_checked(&mut crc[..]);

        if to_word(&crc) as u8 != checksum(&bytes) {
            return None;
        }

        LinkControl::from_bytes(&bytes)
    }

    /// Interleaved bits of the coded LC.
    pub fn raw(&self) -> &[bool; RAW_BITS] { &self.raw }

    /// Write fragment `n` (1 through 4) into the given voice burst payload and return the
    /// LCSS to signal with it. Any other `n` clears the embedded field and returns
    /// `Lcss::Single`.
    pub fn write_fragment(&self, n: usize, payload: &mut [u8; PAYLOAD_BYTES]) -> Lcss {
        if !(1..=FRAGMENTS).contains(&n) {
            payload[14] &= 0xF0;
            payload[15..18].copy_from_slice(&[0; 3]);
            payload[18] &= 0x0F;

            return Lcss::Single;
        }

        let mut bits = [false; 40];
        bits[4..36].copy_from_slice(&self.raw[(n - 1) * FRAGMENT_BITS..n * FRAGMENT_BITS]);

        let mut bytes = [0; 5];
        bits_to_bytes(&bits, &mut bytes);

        payload[14] = payload[14] & 0xF0 | bytes[0] & 0x0F;
        payload[15..18].copy_from_slice(&bytes[1..4]);
        payload[18] = payload[18] & 0x0F | bytes[4] & 0xF0;

        match n {
            1 => Lcss::First,
            FRAGMENTS => Lcss::Last,
            _ => Lcss::Continuation,
        }
    }
}

/// Read the 32 embedded LC bits carried by the given voice burst payload.
pub fn read_fragment(payload: &[u8; PAYLOAD_BYTES]) -> [bool; FRAGMENT_BITS] {
    let mut bits = [false; 40];
    bytes_to_bits(&payload[14..19], &mut bits);

    let mut fragment = [false; FRAGMENT_BITS];
    fragment.copy_from_slice(&bits[4..36]);

    fragment
}

/// QR-encode the EMB header `(colour_code, lcss)` and splice it around the embedded
/// signalling field in payload bytes 13, 14, 18, and 19.
pub fn write_emb(payload: &mut [u8; PAYLOAD_BYTES], colour_code: u8, lcss: Lcss) {
    let emb = qr::encode(colour_code << 4 | lcss.bits() << 1 & 0x06);

    payload[13] = payload[13] & 0xF0 | emb[0] >> 4;
    payload[14] = payload[14] & 0x0F | emb[0] << 4;
    payload[18] = payload[18] & 0xF0 | emb[1] >> 4;
    payload[19] = payload[19] & 0x0F | emb[1] << 4;
}

/// Try to recover `(colour_code, lcss)` from the EMB header in the given payload.
pub fn read_emb(payload: &[u8; PAYLOAD_BYTES]) -> Option<(u8, Lcss)> {
    let emb = [
        payload[13] << 4 | payload[14] >> 4,
        payload[18] << 4 | payload[19] >> 4,
    ];

    qr::decode(emb).map(|(bits, _)| (bits >> 4, Lcss::from_bits(bits >> 1)))
}

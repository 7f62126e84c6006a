//! Big-endian field helpers for frame buffers.

pub fn slice_u16(bytes: &[u8]) -> u16 {
    (bytes[0] as u16) << 8 | bytes[1] as u16
}

pub fn slice_u24(bytes: &[u8]) -> u32 {
    (slice_u16(bytes) as u32) << 8 | bytes[2] as u32
}

pub fn slice_u32(bytes: &[u8]) -> u32 {
    (slice_u16(bytes) as u32) << 16 | slice_u16(&bytes[2..]) as u32
}

/// Write the low 24 bits of the given value into the first 3 bytes of `bytes`.
pub fn put_u24(bytes: &mut [u8], val: u32) {
    bytes[..3].copy_from_slice(&val.to_be_bytes()[1..]);
}

/// Write the given value into the first 4 bytes of `bytes`.
pub fn put_u32(bytes: &mut [u8], val: u32) {
    bytes[..4].copy_from_slice(&val.to_be_bytes());
}

/// Format bytes as space-separated hex for debug logging.
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_slice() {
        assert_eq!(slice_u16(&[0xDE, 0xAD]), 0xDEAD);
        assert_eq!(slice_u24(&[0x12, 0xD6, 0x87, 0xFF]), 1234567);
        assert_eq!(slice_u32(&[0xB6, 0x01, 0x00, 0x00]), 0xB6010000);
    }

    #[test]
    fn test_put() {
        let mut buf = [0xFF; 5];
        put_u24(&mut buf[1..], 0xAB12D687);
        assert_eq!(buf, [0xFF, 0x12, 0xD6, 0x87, 0xFF]);

        put_u32(&mut buf, 0x01020304);
        assert_eq!(buf, [0x01, 0x02, 0x03, 0x04, 0xFF]);
    }

    #[test]
    fn test_hex_dump() {
        assert_eq!(hex_dump(&[0x44, 0x4D, 0x00]), "44 4d 00");
        assert_eq!(hex_dump(&[]), "");
    }
}

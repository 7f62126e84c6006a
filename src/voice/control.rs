//! Encode and decode Link Control (LC) words.

use crate::consts::LINK_CONTROL_BYTES;
use crate::frame::CallType;
use crate::util::{put_u24, slice_u24};

/// Buffer of bytes that represents a link control word.
pub type Buf = [u8; LINK_CONTROL_BYTES];

/// Full link control opcode for a group voice call.
const FLCO_GROUP: u8 = 0x00;
/// Full link control opcode for a unit-to-unit (private) voice call.
const FLCO_USER_USER: u8 = 0x03;

/// Voice link control word identifying the parties of a call.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LinkControl {
    /// Whether the call is group or private.
    pub call_type: CallType,
    /// Protect flag.
    pub protect: bool,
    /// Reserved flag following the protect flag.
    pub reserved: bool,
    /// Feature set ID.
    pub feature: u8,
    /// Service options.
    pub options: u8,
    /// Destination talkgroup or unit.
    pub dst: u32,
    /// Source unit.
    pub src: u32,
}

impl LinkControl {
    /// Create a new voice LC with the given parties and all flags and options clear.
    pub fn new(call_type: CallType, src: u32, dst: u32) -> Self {
        LinkControl {
            call_type,
            protect: false,
            reserved: false,
            feature: 0,
            options: 0,
            dst,
            src,
        }
    }

    /// Interpret the given bytes as a voice LC. Return `None` if the opcode isn't a voice
    /// call.
    pub fn from_bytes(buf: &Buf) -> Option<Self> {
        let call_type = match buf[0] & 0x3F {
            FLCO_GROUP => CallType::Group,
            FLCO_USER_USER => CallType::Private,
            _ => return None,
        };

        Some(LinkControl {
            call_type,
            protect: buf[0] & 0x80 != 0,
            reserved: buf[0] & 0x40 != 0,
            feature: buf[1],
            options: buf[2],
            dst: slice_u24(&buf[3..]),
            src: slice_u24(&buf[6..]),
        })
    }

    /// Serialize into the 9-byte wire form.
    pub fn to_bytes(&self) -> Buf {
        let mut buf = [0; LINK_CONTROL_BYTES];

        buf[0] = match self.call_type {
            CallType::Group => FLCO_GROUP,
            CallType::Private => FLCO_USER_USER,
        };

        if self.protect {
            buf[0] |= 0x80;
        }

        if self.reserved {
            buf[0] |= 0x40;
        }

        buf[1] = self.feature;
        buf[2] = self.options;
        put_u24(&mut buf[3..], self.dst);
        put_u24(&mut buf[6..], self.src);

        buf
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_group() {
        let lc = LinkControl::new(CallType::Group, 1234567, 91);
        assert_eq!(lc.to_bytes(), [0x00, 0x00, 0x00, 0x00, 0x00, 0x5B, 0x12, 0xD6, 0x87]);
        assert_eq!(LinkControl::from_bytes(&lc.to_bytes()), Some(lc));
    }

    #[test]
    fn test_private() {
        let mut lc = LinkControl::new(CallType::Private, 3100001, 1234567);
        assert_eq!(lc.to_bytes(), [0x03, 0x00, 0x00, 0x12, 0xD6, 0x87, 0x2F, 0x4D, 0x61]);

        lc.protect = true;
        lc.reserved = true;
        assert_eq!(lc.to_bytes()[0], 0xC3);
        assert_eq!(LinkControl::from_bytes(&lc.to_bytes()), Some(lc));
    }

    #[test]
    fn test_unknown_opcode() {
        assert_eq!(LinkControl::from_bytes(&[0x30, 0, 0, 0, 0, 0, 0, 0, 0]), None);
    }
}

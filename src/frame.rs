//! Parse and build the `DMRD` data frames exchanged with the repeater-network master.

use crate::consts::{DATA_FRAME_BYTES, PAYLOAD_BYTES, PAYLOAD_OFFSET};
use crate::util::{put_u24, put_u32, slice_u24, slice_u32};

/// Tag opening every data frame.
pub const TAG: &[u8; 4] = b"DMRD";

/// TDMA timeslot a frame belongs to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Slot {
    One,
    Two,
}

/// Whether a call is addressed to a talkgroup or a single unit.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CallType {
    Group,
    Private,
}

/// Kind of burst carried by a frame.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FrameType {
    /// Voice burst B-F, with the superframe position as data type.
    Voice,
    /// Voice burst A, carrying the voice sync pattern.
    VoiceSync,
    /// Data burst, with the slot type data type as data type.
    DataSync,
}

impl FrameType {
    /// Try to parse a frame type from the given 2 bits.
    pub fn from_bits(bits: u8) -> Option<FrameType> {
        match bits {
            0 => Some(FrameType::Voice),
            1 => Some(FrameType::VoiceSync),
            2 => Some(FrameType::DataSync),
            _ => None,
        }
    }

    /// Wire value of the frame type.
    pub fn bits(&self) -> u8 {
        match *self {
            FrameType::Voice => 0,
            FrameType::VoiceSync => 1,
            FrameType::DataSync => 2,
        }
    }
}

/// Data type of a voice LC header burst.
pub const DATA_TYPE_HEADER: u8 = 1;
/// Data type of a terminator with LC burst.
pub const DATA_TYPE_TERMINATOR: u8 = 2;

/// A repeater data frame.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DataFrame {
    /// Sequence number.
    pub seq: u8,
    /// Source unit.
    pub src: u32,
    /// Destination talkgroup or unit.
    pub dst: u32,
    /// ID of the repeater carrying the call.
    pub repeater: u32,
    pub slot: Slot,
    pub call_type: CallType,
    pub frame_type: FrameType,
    /// Slot type data type for data bursts, or superframe position for voice bursts.
    pub data_type: u8,
    /// Identifies all frames of one transmission.
    pub stream: u32,
    /// Coded burst.
    pub payload: [u8; PAYLOAD_BYTES],
}

impl DataFrame {
    /// Try to parse a data frame from the given datagram. Return `None` unless the
    /// datagram is exactly one tagged frame with a known frame type.
    pub fn parse(buf: &[u8]) -> Option<DataFrame> {
        if buf.len() != DATA_FRAME_BYTES || &buf[..4] != TAG {
            return None;
        }

        let flags = buf[15];
        let mut payload = [0; PAYLOAD_BYTES];
        payload.copy_from_slice(&buf[PAYLOAD_OFFSET..PAYLOAD_OFFSET + PAYLOAD_BYTES]);

        Some(DataFrame {
            seq: buf[4],
            src: slice_u24(&buf[5..]),
            dst: slice_u24(&buf[8..]),
            repeater: slice_u32(&buf[11..]),
            slot: if flags & 0x80 == 0 { Slot::One } else { Slot::Two },
            call_type: if flags & 0x40 == 0 { CallType::Group } else { CallType::Private },
            frame_type: FrameType::from_bits(flags >> 4 & 0b11)?,
            data_type: flags & 0x0F,
            stream: slice_u32(&buf[16..]),
            payload,
        })
    }

    /// Flag byte combining slot, call type, frame type, and data type.
    pub fn flags(&self) -> u8 {
        let slot = match self.slot {
            Slot::One => 0,
            Slot::Two => 0x80,
        };

        let call = match self.call_type {
            CallType::Group => 0,
            CallType::Private => 0x40,
        };

        slot | call | self.frame_type.bits() << 4 | self.data_type & 0x0F
    }

    /// Serialize into the 55-byte wire form. The two trailing bytes are zero.
    pub fn to_bytes(&self) -> [u8; DATA_FRAME_BYTES] {
        let mut buf = [0; DATA_FRAME_BYTES];

        buf[..4].copy_from_slice(TAG);
        buf[4] = self.seq;
        put_u24(&mut buf[5..], self.src);
        put_u24(&mut buf[8..], self.dst);
        put_u32(&mut buf[11..], self.repeater);
        buf[15] = self.flags();
        put_u32(&mut buf[16..], self.stream);
        buf[PAYLOAD_OFFSET..PAYLOAD_OFFSET + PAYLOAD_BYTES].copy_from_slice(&self.payload);

        buf
    }

    /// Whether the frame is a voice LC header.
    pub fn is_header(&self) -> bool {
        self.frame_type == FrameType::DataSync && self.data_type == DATA_TYPE_HEADER
    }

    /// Whether the frame is a terminator with LC.
    pub fn is_terminator(&self) -> bool {
        self.frame_type == FrameType::DataSync && self.data_type == DATA_TYPE_TERMINATOR
    }

    /// Whether the frame is a voice burst.
    pub fn is_voice(&self) -> bool {
        self.frame_type != FrameType::DataSync
    }
}

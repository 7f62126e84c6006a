//! Packets exchanged with the DV3000-style vocoder server.
//!
//! Every packet starts with the start byte, a big-endian 16-bit length covering the
//! bytes after the type byte, and the packet type.

use crate::consts::{AMBE_FRAME_BYTES, PCM_BYTES, PCM_SAMPLES};
use crate::voice::burst::AmbeFrame;

/// First byte of every packet.
const START: u8 = 0x61;

/// Packet type of a configuration packet.
const TYPE_CONTROL: u8 = 0x00;
/// Packet type of a compressed channel packet.
const TYPE_CHANNEL: u8 = 0x01;
/// Packet type of an uncompressed speech packet.
const TYPE_SPEECH: u8 = 0x02;

/// Number of bytes in a speech reply.
const SPEECH_REPLY_BYTES: usize = 6 + PCM_BYTES;
/// Number of bytes in a channel reply.
const CHANNEL_REPLY_BYTES: usize = 6 + AMBE_FRAME_BYTES;

/// Output gain configured on the vocoder, in dB.
const OUTPUT_GAIN: i8 = -15;
/// Input gain configured on the vocoder, in dB.
const INPUT_GAIN: i8 = 10;

/// Rate parameters selecting the AMBE+2 3600/2450 mode.
const RATE_PARAMS: [u8; 12] = [
    0x04, 0x31, 0x07, 0x54, 0x24, 0x00, 0x00, 0x00, 0x00, 0x00, 0x6F, 0x48,
];

fn packet(len: usize, kind: u8) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + len);
    buf.push(START);
    buf.extend_from_slice(&(len as u16).to_be_bytes());
    buf.push(kind);
    buf
}

/// Build the gain configuration packet.
pub fn gain() -> Vec<u8> {
    let mut buf = packet(3, TYPE_CONTROL);
    buf.extend_from_slice(&[0x4B, OUTPUT_GAIN as u8, INPUT_GAIN as u8]);
    buf
}

/// Build the rate configuration packet.
pub fn rate() -> Vec<u8> {
    let mut buf = packet(1 + RATE_PARAMS.len(), TYPE_CONTROL);
    buf.push(0x0A);
    buf.extend_from_slice(&RATE_PARAMS);
    buf
}

/// Build a channel packet asking the vocoder to decode the given compressed frame.
pub fn channel(frame: &AmbeFrame) -> Vec<u8> {
    let mut buf = packet(2 + AMBE_FRAME_BYTES, TYPE_CHANNEL);
    buf.push(0x01);
    buf.push((AMBE_FRAME_BYTES * 8) as u8);
    buf.extend_from_slice(frame);
    buf
}

/// Build a speech packet asking the vocoder to encode the given samples.
pub fn speech(samples: &[i16; PCM_SAMPLES]) -> Vec<u8> {
    let mut buf = packet(2 + PCM_BYTES, TYPE_SPEECH);
    buf.push(0x00);
    buf.push(PCM_SAMPLES as u8);

    for s in samples.iter() {
        buf.extend_from_slice(&s.to_be_bytes());
    }

    buf
}

/// A datagram received from the vocoder.
#[derive(Copy, Clone)]
pub enum VocoderReply {
    /// Decoded block of speech samples.
    Pcm([i16; PCM_SAMPLES]),
    /// Encoded compressed frame.
    Ambe(AmbeFrame),
    /// Configuration reply or anything else.
    Unknown,
}

impl VocoderReply {
    /// Classify the given datagram.
    pub fn parse(buf: &[u8]) -> VocoderReply {
        if buf.len() < 4 || buf[0] != START {
            return VocoderReply::Unknown;
        }

        match (buf[3], buf.len()) {
            (TYPE_SPEECH, SPEECH_REPLY_BYTES) => {
                let mut samples = [0; PCM_SAMPLES];

                for (s, b) in samples.iter_mut().zip(buf[6..].chunks(2)) {
                    *s = i16::from_be_bytes([b[0], b[1]]);
                }

                VocoderReply::Pcm(samples)
            },
            (TYPE_CHANNEL, CHANNEL_REPLY_BYTES) => {
                let mut frame = [0; AMBE_FRAME_BYTES];
                frame.copy_from_slice(&buf[6..]);

                VocoderReply::Ambe(frame)
            },
            _ => VocoderReply::Unknown,
        }
    }
}

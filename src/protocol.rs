//! Control frames of the repeater-network login and keepalive protocol.
//!
//! All outbound control frames start with an ASCII tag followed by the 4-byte big-endian
//! repeater ID. Inbound traffic is classified by its tag.

use log::warn;

use crate::config::StationInfo;
use crate::digest::Sha256;
use crate::frame::DataFrame;

/// Tag of a login request.
pub const LOGIN: &[u8] = b"RPTL";
/// Tag of a challenge response.
pub const AUTH: &[u8] = b"RPTK";
/// Tag of a station configuration.
pub const CONFIG: &[u8] = b"RPTC";
/// Tag of a keepalive.
pub const PING: &[u8] = b"RPTPING";
/// Tag of a logout.
pub const CLOSE: &[u8] = b"RPTCL";
/// Tag of a master acknowledgement.
pub const ACK: &[u8] = b"RPTACK";
/// Tag of a master keepalive reply.
pub const PONG: &[u8] = b"MSTPONG";

/// Number of bytes in a station configuration frame.
pub const CONFIG_BYTES: usize = 302;

/// A datagram received from the master.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MasterMessage {
    /// Acknowledgement of the last login step. The login acknowledgement carries the
    /// 4-byte authentication challenge.
    Ack(Option<[u8; 4]>),
    /// Keepalive reply.
    Pong,
    /// Voice or data frame.
    Data(DataFrame),
    /// Anything else.
    Unknown,
}

impl MasterMessage {
    /// Classify the given datagram.
    pub fn parse(buf: &[u8]) -> MasterMessage {
        if buf.starts_with(ACK) {
            let salt = buf.get(6..10).map(|s| [s[0], s[1], s[2], s[3]]);
            MasterMessage::Ack(salt)
        } else if buf.starts_with(PONG) {
            MasterMessage::Pong
        } else {
            DataFrame::parse(buf).map_or(MasterMessage::Unknown, MasterMessage::Data)
        }
    }
}

fn tagged(tag: &[u8], id: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(tag.len() + 4);
    buf.extend_from_slice(tag);
    buf.extend_from_slice(&id.to_be_bytes());
    buf
}

/// Build a login request for the given repeater ID.
pub fn login(id: u32) -> Vec<u8> { tagged(LOGIN, id) }

/// Build a keepalive for the given repeater ID.
pub fn ping(id: u32) -> Vec<u8> { tagged(PING, id) }

/// Build a logout for the given repeater ID.
pub fn close(id: u32) -> Vec<u8> { tagged(CLOSE, id) }

/// Build the response to the given login challenge: the SHA-256 digest of the challenge
/// followed by the shared secret.
pub fn auth(id: u32, salt: &[u8; 4], secret: &[u8]) -> Vec<u8> {
    let mut h = Sha256::new();
    h.update(salt);
    h.update(secret);

    let mut buf = tagged(AUTH, id);
    buf.extend_from_slice(&h.finalize());
    buf
}

/// Alignment of a fixed-width text field.
#[derive(Copy, Clone)]
enum Align {
    Left,
    Right,
}

/// Append the given text, truncated or space-padded to exactly `width` bytes.
fn push_field(buf: &mut Vec<u8>, text: &str, width: usize, align: Align) {
    let bytes = &text.as_bytes()[..text.len().min(width)];
    let pad = width - bytes.len();

    if let Align::Right = align {
        buf.extend(std::iter::repeat(b' ').take(pad));
    }

    buf.extend_from_slice(bytes);

    if let Align::Left = align {
        buf.extend(std::iter::repeat(b' ').take(pad));
    }
}

/// Largest antenna height the configuration frame can carry.
const MAX_HEIGHT: u16 = 999;

fn clamp_height(height: u16) -> u16 {
    if height > MAX_HEIGHT {
        warn!("antenna height {}m sent as {}m", height, MAX_HEIGHT);
        MAX_HEIGHT
    } else {
        height
    }
}

/// Build the station configuration frame describing this endpoint.
pub fn config(id: u32, info: &StationInfo) -> Vec<u8> {
    use self::Align::*;

    let mut buf = tagged(CONFIG, id);

    push_field(&mut buf, &info.callsign, 8, Left);
    push_field(&mut buf, &format!("{:09}", info.rx_freq), 9, Left);
    push_field(&mut buf, &format!("{:09}", info.tx_freq), 9, Left);
    push_field(&mut buf, &format!("{:02}", info.power), 2, Left);
    push_field(&mut buf, &format!("{:02}", info.colour_code), 2, Left);
    push_field(&mut buf, &format!("{:08.6}", info.latitude), 8, Right);
    push_field(&mut buf, &format!("{:09.6}", info.longitude), 9, Right);
    push_field(&mut buf, &format!("{:03}", clamp_height(info.height)), 3, Left);
    push_field(&mut buf, &info.location, 20, Left);
    push_field(&mut buf, &info.description, 19, Left);
    push_field(&mut buf, &info.slots.to_string(), 1, Left);
    push_field(&mut buf, &info.url, 124, Left);
    push_field(&mut buf, &info.software, 40, Left);
    push_field(&mut buf, &info.package, 40, Left);

    buf
}

//! Runtime configuration of the relay.

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{RelayError, Result};
use crate::frame::CallType;

/// Address of a UDP peer, as `host:port`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PeerSpec {
    pub host: String,
    pub port: u16,
}

impl PeerSpec {
    /// Resolve the peer to a socket address, preferring IPv4.
    pub fn resolve(&self) -> Result<SocketAddr> {
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|_| RelayError::Resolve(self.host.clone()))?
            .collect();

        addrs.iter()
            .find(|a| a.is_ipv4())
            .or_else(|| addrs.first())
            .cloned()
            .ok_or_else(|| RelayError::Resolve(self.host.clone()))
    }
}

fn parse_port(s: &str, spec: &str) -> Result<u16> {
    s.parse().map_err(|_| RelayError::InvalidPeer(format!("bad port in {}", spec)))
}

impl FromStr for PeerSpec {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(2, ':');

        match (parts.next(), parts.next()) {
            (Some(host), Some(port)) if !host.is_empty() => Ok(PeerSpec {
                host: host.to_string(),
                port: parse_port(port, s)?,
            }),
            _ => Err(RelayError::InvalidPeer(format!("expected HOST:PORT, got {}", s))),
        }
    }
}

/// Repeater-network master, as `host:port:talkgroup:secret`. The secret may itself
/// contain colons.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MasterSpec {
    pub peer: PeerSpec,
    /// Talkgroup keyed on connect and used for group-call replies. Zero disables both.
    pub talkgroup: u32,
    /// Shared login secret.
    pub secret: String,
}

impl FromStr for MasterSpec {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(4, ':');

        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(host), Some(port), Some(tg), Some(secret)) if !host.is_empty() => {
                Ok(MasterSpec {
                    peer: PeerSpec {
                        host: host.to_string(),
                        port: parse_port(port, s)?,
                    },
                    talkgroup: tg.parse().map_err(|_| {
                        RelayError::InvalidPeer(format!("bad talkgroup in {}", s))
                    })?,
                    secret: secret.to_string(),
                })
            },
            _ => Err(RelayError::InvalidPeer(
                format!("expected HOST:PORT:TG:PASSWORD, got {}", s))),
        }
    }
}

/// Which finished calls are answered with the voice message.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CallFilter {
    /// Answer group and private calls.
    Any,
    /// Answer only private calls.
    PrivateOnly,
}

impl CallFilter {
    /// Whether a call of the given type should be answered.
    pub fn accepts(&self, call_type: CallType) -> bool {
        match *self {
            CallFilter::Any => true,
            CallFilter::PrivateOnly => call_type == CallType::Private,
        }
    }
}

/// Station details announced to the master during login.
#[derive(Clone, Debug, PartialEq)]
pub struct StationInfo {
    pub callsign: String,
    /// Receive frequency in Hz.
    pub rx_freq: u32,
    /// Transmit frequency in Hz.
    pub tx_freq: u32,
    /// Transmit power in watts.
    pub power: u8,
    pub colour_code: u8,
    pub latitude: f32,
    pub longitude: f32,
    /// Antenna height in meters.
    pub height: u16,
    pub location: String,
    pub description: String,
    /// Timeslots in use: '1', '2', '3' for both, or '4' for a simplex hotspot.
    pub slots: char,
    pub url: String,
    pub software: String,
    pub package: String,
}

impl StationInfo {
    /// Create a new `StationInfo` with the given callsign and colour code and the
    /// remaining fields set to a generic hotspot.
    pub fn new(callsign: &str, colour_code: u8) -> Self {
        StationInfo {
            callsign: callsign.to_string(),
            rx_freq: 435_000_000,
            tx_freq: 435_000_000,
            power: 1,
            colour_code,
            latitude: 0.0,
            longitude: 0.0,
            height: 0,
            location: "Nowhere".to_string(),
            description: "Portugal".to_string(),
            slots: '4',
            url: "www.google.com".to_string(),
            software: "20210101".to_string(),
            package: "MMDVM".to_string(),
        }
    }
}

/// Default path of the voice message played back after a call.
pub const DEFAULT_MESSAGE: &str = "txmsg.wav";
/// Default path of the ID to callsign lookup file.
pub const DEFAULT_IDS: &str = "DMRIds.dat";
/// Default minimum number of received audio blocks (20ms each) that triggers a reply.
pub const DEFAULT_MIN_REPLY_FRAMES: usize = 50;
/// Default colour code.
pub const DEFAULT_COLOUR_CODE: u8 = 1;

/// Complete relay configuration.
#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub callsign: String,
    /// ID the endpoint logs in with.
    pub repeater_id: u32,
    pub master: MasterSpec,
    pub vocoder: PeerSpec,
    /// Directory receiving call recordings.
    pub recordings: PathBuf,
    /// Voice message played back after a call.
    pub message: PathBuf,
    /// ID to callsign lookup file.
    pub ids: PathBuf,
    /// Minimum number of received audio blocks that triggers a reply.
    pub min_reply_frames: usize,
    pub filter: CallFilter,
    pub colour_code: u8,
}

impl RelayConfig {
    /// Create a new `RelayConfig` with the given required parameters and defaults for
    /// the rest.
    pub fn new(callsign: &str, repeater_id: u32, master: MasterSpec, vocoder: PeerSpec)
        -> Self
    {
        RelayConfig {
            callsign: callsign.to_string(),
            repeater_id,
            master,
            vocoder,
            recordings: PathBuf::from("."),
            message: PathBuf::from(DEFAULT_MESSAGE),
            ids: PathBuf::from(DEFAULT_IDS),
            min_reply_frames: DEFAULT_MIN_REPLY_FRAMES,
            filter: CallFilter::Any,
            colour_code: DEFAULT_COLOUR_CODE,
        }
    }

    /// Source ID used in transmitted frames.
    pub fn radio_id(&self) -> u32 { radio_id(self.repeater_id) }

    /// Station details announced during login.
    pub fn station(&self) -> StationInfo {
        StationInfo::new(&self.callsign, self.colour_code)
    }
}

/// Map a repeater ID to the 24-bit radio ID it transmits as: 9-digit repeater IDs (a
/// radio ID with a 2-digit suffix) drop the suffix.
pub fn radio_id(repeater_id: u32) -> u32 {
    if repeater_id > 99_999_999 {
        repeater_id / 100
    } else {
        repeater_id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_peer() {
        assert_eq!("127.0.0.1:2460".parse::<PeerSpec>().unwrap(), PeerSpec {
            host: "127.0.0.1".to_string(),
            port: 2460,
        });

        assert!("127.0.0.1".parse::<PeerSpec>().is_err());
        assert!(":2460".parse::<PeerSpec>().is_err());
        assert!("localhost:port".parse::<PeerSpec>().is_err());
        assert!("localhost:70000".parse::<PeerSpec>().is_err());
    }

    #[test]
    fn test_master() {
        let m: MasterSpec = "master.example.net:62031:91:s3cr:et".parse().unwrap();

        assert_eq!(m.peer.host, "master.example.net");
        assert_eq!(m.peer.port, 62031);
        assert_eq!(m.talkgroup, 91);
        assert_eq!(m.secret, "s3cr:et");

        let m: MasterSpec = "10.0.0.1:62031:0:".parse().unwrap();
        assert_eq!(m.talkgroup, 0);
        assert_eq!(m.secret, "");

        assert!("10.0.0.1:62031:91".parse::<MasterSpec>().is_err());
        assert!("10.0.0.1:62031:tg:pw".parse::<MasterSpec>().is_err());
    }

    #[test]
    fn test_resolve() {
        let p = PeerSpec { host: "127.0.0.1".to_string(), port: 2460 };
        assert_eq!(p.resolve().unwrap(), "127.0.0.1:2460".parse().unwrap());

        let p = PeerSpec { host: "no such host.invalid".to_string(), port: 1 };
        assert!(p.resolve().is_err());
    }

    #[test]
    fn test_radio_id() {
        assert_eq!(radio_id(3100001), 3100001);
        assert_eq!(radio_id(99_999_999), 99_999_999);
        assert_eq!(radio_id(310000101), 3100001);
    }

    #[test]
    fn test_filter() {
        assert!(CallFilter::Any.accepts(CallType::Group));
        assert!(CallFilter::Any.accepts(CallType::Private));
        assert!(!CallFilter::PrivateOnly.accepts(CallType::Group));
        assert!(CallFilter::PrivateOnly.accepts(CallType::Private));
    }

    #[test]
    fn test_defaults() {
        let cfg = RelayConfig::new("N0CALL", 310000101,
                                   "127.0.0.1:62031:91:pw".parse().unwrap(),
                                   "127.0.0.1:2460".parse().unwrap());

        assert_eq!(cfg.radio_id(), 3100001);
        assert_eq!(cfg.min_reply_frames, 50);
        assert_eq!(cfg.filter, CallFilter::Any);
        assert_eq!(cfg.message, PathBuf::from("txmsg.wav"));
        assert_eq!(cfg.station().colour_code, 1);
    }
}

//! Login and keepalive state machine for the link to the repeater-network master.

use std::time::Instant;

use log::{info, warn};

use crate::config::{RelayConfig, StationInfo};
use crate::consts::{PING_INTERVAL, SESSION_TIMEOUT};
use crate::frame::{CallType, DataFrame, FrameType, Slot, DATA_TYPE_HEADER};
use crate::outbox::Outbox;
use crate::protocol;
use crate::voice::control::LinkControl;
use crate::voice::full;

/// Stream ID of the header sent to key the talkgroup after login.
const KEYUP_STREAM: u32 = 0xB6010000;

/// Connection state of the session.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum State {
    /// No login in progress. A login is sent at the next tick.
    Disconnected,
    /// Login sent, waiting for the challenge.
    Connecting,
    /// Challenge answered, waiting for acceptance.
    Authenticating,
    /// Station configuration sent, waiting for acceptance.
    Configuring,
    /// Logged in with traffic flowing both ways.
    Connected,
    /// Logged in, receiving only. Never entered by this endpoint.
    ConnectedReadOnly,
}

/// Session with the master, owning the login state and keepalive timers.
pub struct Session {
    /// ID the endpoint logs in with.
    id: u32,
    /// Source ID for transmitted frames.
    radio_id: u32,
    /// Talkgroup keyed after login, or 0 for none.
    talkgroup: u32,
    colour_code: u8,
    secret: Vec<u8>,
    station: StationInfo,
    state: State,
    /// Time of the last login progress or keepalive reply.
    last_reply: Instant,
    /// Deadline of the next keepalive.
    next_ping: Instant,
}

impl Session {
    /// Create a new `Session` in the disconnected state.
    pub fn new(cfg: &RelayConfig, now: Instant) -> Session {
        Session {
            id: cfg.repeater_id,
            radio_id: cfg.radio_id(),
            talkgroup: cfg.master.talkgroup,
            colour_code: cfg.colour_code,
            secret: cfg.master.secret.as_bytes().to_vec(),
            station: cfg.station(),
            state: State::Disconnected,
            last_reply: now,
            next_ping: now,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> State { self.state }

    /// Whether traffic may be exchanged with the master.
    pub fn connected(&self) -> bool { self.state == State::Connected }

    /// Advance timers: start a login when disconnected, reset a silent session, and send
    /// keepalives while connected.
    pub fn tick(&mut self, now: Instant, out: &mut Outbox) {
        if self.state == State::Disconnected {
            info!("connecting to master as {}", self.id);

            out.master(protocol::login(self.id));
            self.state = State::Connecting;
            self.last_reply = now;

            return;
        }

        if now.duration_since(self.last_reply) > SESSION_TIMEOUT {
            warn!("master connection timed out in state {:?}, reconnecting", self.state);
            self.state = State::Disconnected;

            return;
        }

        if self.state == State::Connected && now >= self.next_ping {
            out.master(protocol::ping(self.id));
            self.next_ping = now + PING_INTERVAL;
        }
    }

    /// Handle an acknowledgement from the master, advancing the login. Acknowledgements
    /// once connected are ignored.
    pub fn on_ack(&mut self, salt: Option<[u8; 4]>, now: Instant, out: &mut Outbox) {
        use self::State::*;

        let next = match self.state {
            Connecting => match salt {
                Some(salt) => {
                    info!("sending authentication");
                    out.master(protocol::auth(self.id, &salt, &self.secret));
                    Authenticating
                },
                None => {
                    warn!("login acknowledgement without challenge, ignoring");
                    return;
                },
            },
            Authenticating => {
                info!("sending configuration");
                out.master(protocol::config(self.id, &self.station));
                Configuring
            },
            Configuring => {
                info!("connected to master");

                if self.talkgroup != 0 {
                    out.master(self.keyup().to_bytes().to_vec());
                }

                self.next_ping = now + PING_INTERVAL;
                Connected
            },
            Disconnected | Connected | ConnectedReadOnly => return,
        };

        self.state = next;
        self.last_reply = now;
    }

    /// Handle a keepalive reply from the master.
    pub fn on_pong(&mut self, now: Instant) {
        if self.connected() {
            self.last_reply = now;
        }
    }

    /// Log out from the master.
    pub fn close(&mut self, out: &mut Outbox) {
        if self.state != State::Disconnected {
            info!("closing master connection");
            out.master(protocol::close(self.id));
        }

        self.state = State::Disconnected;
    }

    /// Group voice header that keys the configured talkgroup.
    fn keyup(&self) -> DataFrame {
        let lc = LinkControl::new(CallType::Group, self.radio_id, self.talkgroup);

        DataFrame {
            seq: 0,
            src: self.radio_id,
            dst: self.talkgroup,
            repeater: self.id,
            slot: Slot::Two,
            call_type: CallType::Group,
            frame_type: FrameType::DataSync,
            data_type: DATA_TYPE_HEADER,
            stream: KEYUP_STREAM,
            payload: full::encode(&lc, self.colour_code),
        }
    }
}

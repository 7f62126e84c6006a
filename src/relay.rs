//! Event loop tying the master and vocoder sockets to the session and multiplexer.

use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;

use log::{debug, info, warn};

use crate::config::RelayConfig;
use crate::consts::POLL_INTERVAL;
use crate::error::Result;
use crate::mux::Multiplexer;
use crate::outbox::{Outbox, Peer};
use crate::protocol::MasterMessage;
use crate::session::Session;
use crate::util::hex_dump;
use crate::vocoder::VocoderReply;

/// Size of the datagram receive buffer.
const RECV_BYTES: usize = 1024;

/// Non-blocking UDP socket bound to an ephemeral port and talking to a single peer.
struct Link {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl Link {
    fn new(peer: SocketAddr) -> Result<Link> {
        let local = if peer.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };

        let socket = UdpSocket::bind(local)?;
        socket.set_nonblocking(true)?;

        Ok(Link { socket, peer })
    }

    /// Receive the next datagram from the peer into the given buffer, skipping datagrams
    /// from other hosts. Return `None` when nothing is waiting.
    fn recv(&self, buf: &mut [u8]) -> Option<usize> {
        loop {
            match self.socket.recv_from(buf) {
                Ok((n, src)) if src.ip() == self.peer.ip() => return Some(n),
                Ok((_, src)) => debug!("ignoring datagram from {}", src),
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => return None,
                Err(e) => {
                    warn!("receive from {} failed: {}", self.peer, e);
                    return None;
                },
            }
        }
    }

    fn send(&self, data: &[u8]) {
        if let Err(e) = self.socket.send_to(data, self.peer) {
            warn!("send to {} failed: {}", self.peer, e);
        }
    }
}

/// The relay endpoint: a session with the master, a vocoder link, and the voice
/// multiplexer between them.
pub struct Relay {
    master: Link,
    vocoder: Link,
    session: Session,
    mux: Multiplexer,
    out: Outbox,
}

impl Relay {
    /// Resolve both peers and open their sockets.
    pub fn new(cfg: &RelayConfig) -> Result<Relay> {
        let master = cfg.master.peer.resolve()?;
        let vocoder = cfg.vocoder.resolve()?;

        info!("master at {}, vocoder at {}", master, vocoder);

        Ok(Relay {
            master: Link::new(master)?,
            vocoder: Link::new(vocoder)?,
            session: Session::new(cfg, Instant::now()),
            mux: Multiplexer::new(cfg),
            out: Outbox::new(),
        })
    }

    /// Run until the given flag is raised, then close any recording and log out.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<()> {
        while !stop.load(Ordering::Relaxed) {
            if !self.step(Instant::now()) {
                thread::sleep(POLL_INTERVAL);
            }
        }

        info!("shutting down");

        self.mux.close();
        self.session.close(&mut self.out);
        self.flush();

        Ok(())
    }

    /// Handle all waiting datagrams, advance timers, and send what they produced. Return
    /// whether any datagram arrived.
    pub fn step(&mut self, now: Instant) -> bool {
        let mut buf = [0; RECV_BYTES];
        let mut busy = false;

        while let Some(n) = self.master.recv(&mut buf) {
            self.on_master(&buf[..n], now);
            busy = true;
        }

        while let Some(n) = self.vocoder.recv(&mut buf) {
            self.on_vocoder(&buf[..n]);
            busy = true;
        }

        self.session.tick(now, &mut self.out);
        self.mux.tick(now, &mut self.out);

        if !self.session.connected() {
            let dropped = self.out.drop_voice();

            if dropped > 0 {
                debug!("dropped {} voice frames while logged out", dropped);
            }
        }

        self.flush();

        busy
    }

    fn on_master(&mut self, data: &[u8], now: Instant) {
        match MasterMessage::parse(data) {
            MasterMessage::Ack(salt) => self.session.on_ack(salt, now, &mut self.out),
            MasterMessage::Pong => self.session.on_pong(now),
            MasterMessage::Data(ref f) if self.session.connected() => {
                self.mux.on_repeater_frame(f, now, &mut self.out)
            },
            MasterMessage::Data(_) => debug!("ignoring data frame before login"),
            MasterMessage::Unknown => debug!("master: {}", hex_dump(data)),
        }
    }

    fn on_vocoder(&mut self, data: &[u8]) {
        let reply = VocoderReply::parse(data);

        if let VocoderReply::Unknown = reply {
            debug!("vocoder: {}", hex_dump(data));
        }

        self.mux.on_vocoder_reply(&reply, &mut self.out);
    }

    /// Send all queued datagrams.
    fn flush(&mut self) {
        for d in self.out.drain() {
            let link = match d.peer {
                Peer::Master => &self.master,
                Peer::Vocoder => &self.vocoder,
            };

            debug!("{:?} <- {}", d.peer, hex_dump(&d.data));
            link.send(&d.data);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;
    use crate::frame::TAG;
    use crate::protocol;

    #[test]
    fn test_voice_while_logged_out() {
        let master = UdpSocket::bind("127.0.0.1:0").unwrap();
        master.set_read_timeout(Some(Duration::from_millis(200))).unwrap();
        let vocoder = UdpSocket::bind("127.0.0.1:0").unwrap();

        let cfg = RelayConfig::new(
            "N0CALL", 3100001,
            format!("127.0.0.1:{}:91:pw", master.local_addr().unwrap().port()).parse().unwrap(),
            format!("127.0.0.1:{}", vocoder.local_addr().unwrap().port()).parse().unwrap());

        let mut relay = Relay::new(&cfg).unwrap();

        let mut frame = TAG.to_vec();
        frame.resize(55, 0);
        relay.out.master(frame);

        relay.step(Instant::now());
        assert!(!relay.session.connected());
        assert!(relay.out.is_empty());

        let mut buf = [0; RECV_BYTES];
        let (n, _) = master.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..n], &protocol::login(3100001)[..]);

        assert!(master.recv_from(&mut buf).is_err());
    }
}

//! Queue of datagrams produced by the protocol state machines, flushed by the event loop.

use std::collections::VecDeque;

use crate::frame::TAG;

/// Destination of an outbound datagram.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Peer {
    /// Repeater-network master.
    Master,
    /// Vocoder server.
    Vocoder,
}

/// Datagram waiting to be sent.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Datagram {
    pub peer: Peer,
    pub data: Vec<u8>,
}

/// FIFO of outbound datagrams. Order is preserved per peer and across peers.
#[derive(Default, Debug)]
pub struct Outbox(VecDeque<Datagram>);

impl Outbox {
    pub fn new() -> Self { Outbox::default() }

    /// Queue a datagram for the master.
    pub fn master(&mut self, data: Vec<u8>) {
        self.0.push_back(Datagram { peer: Peer::Master, data });
    }

    /// Queue a datagram for the vocoder.
    pub fn vocoder(&mut self, data: Vec<u8>) {
        self.0.push_back(Datagram { peer: Peer::Vocoder, data });
    }

    /// Remove and return the oldest queued datagram.
    pub fn pop(&mut self) -> Option<Datagram> { self.0.pop_front() }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Drop the data frames queued for the master and return how many were dropped.
    pub fn drop_voice(&mut self) -> usize {
        let before = self.0.len();
        self.0.retain(|d| d.peer != Peer::Master || !d.data.starts_with(TAG));
        before - self.0.len()
    }

    /// Remove and return all queued datagrams, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = Datagram> + '_ {
        self.0.drain(..)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_order() {
        let mut out = Outbox::new();
        assert!(out.is_empty());

        out.master(vec![1]);
        out.vocoder(vec![2]);
        out.master(vec![3]);
        assert_eq!(out.len(), 3);

        assert_eq!(out.pop(), Some(Datagram { peer: Peer::Master, data: vec![1] }));

        let rest: Vec<Datagram> = out.drain().collect();
        assert_eq!(rest, vec![
            Datagram { peer: Peer::Vocoder, data: vec![2] },
            Datagram { peer: Peer::Master, data: vec![3] },
        ]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_drop_voice() {
        let mut out = Outbox::new();

        out.master(b"DMRD\x01".to_vec());
        out.vocoder(b"DMRD\x02".to_vec());
        out.master(b"RPTPING".to_vec());
        out.master(b"DMRD\x03".to_vec());

        assert_eq!(out.drop_voice(), 2);
        assert_eq!(out.drop_voice(), 0);

        let rest: Vec<Datagram> = out.drain().collect();
        assert_eq!(rest, vec![
            Datagram { peer: Peer::Vocoder, data: b"DMRD\x02".to_vec() },
            Datagram { peer: Peer::Master, data: b"RPTPING".to_vec() },
        ]);
    }
}

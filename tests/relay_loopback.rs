use std::fs;
use std::net::{SocketAddr, UdpSocket};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use sha2::{Digest, Sha256};

use dmrvmsg::config::RelayConfig;
use dmrvmsg::frame::{CallType, DataFrame, FrameType, Slot};
use dmrvmsg::relay::Relay;
use dmrvmsg::vocoder;
use dmrvmsg::voice::control::LinkControl;
use dmrvmsg::voice::full;

const SALT: [u8; 4] = [0xDE, 0xAD, 0xBE, 0xEF];

struct Peer(UdpSocket);

impl Peer {
    fn bind() -> Peer {
        let s = UdpSocket::bind("127.0.0.1:0").unwrap();
        s.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        Peer(s)
    }

    fn port(&self) -> u16 { self.0.local_addr().unwrap().port() }

    fn recv(&self) -> (Vec<u8>, SocketAddr) {
        let mut buf = [0; 1024];
        let (n, src) = self.0.recv_from(&mut buf).unwrap();
        (buf[..n].to_vec(), src)
    }

    /// Receive datagrams until one starts with the given tag.
    fn expect(&self, tag: &[u8]) -> (Vec<u8>, SocketAddr) {
        loop {
            let (buf, src) = self.recv();

            if buf.starts_with(tag) {
                return (buf, src);
            }
        }
    }
}

fn call_frame(data_type: u8) -> [u8; 55] {
    let lc = LinkControl::new(CallType::Private, 2680001, 3100001);

    DataFrame {
        seq: 0,
        src: 2680001,
        dst: 3100001,
        repeater: 2680099,
        slot: Slot::Two,
        call_type: CallType::Private,
        frame_type: FrameType::DataSync,
        data_type,
        stream: 0x01020304,
        payload: full::encode(&lc, 1),
    }.to_bytes()
}

#[test]
fn test_login_and_record() {
    let master = Peer::bind();
    let vocoder_peer = Peer::bind();
    let dir = tempfile::tempdir().unwrap();

    let mut cfg = RelayConfig::new(
        "N0CALL", 3100001,
        format!("127.0.0.1:{}:91:passw0rd", master.port()).parse().unwrap(),
        format!("127.0.0.1:{}", vocoder_peer.port()).parse().unwrap());
    cfg.recordings = dir.path().to_path_buf();
    cfg.ids = dir.path().join("ids.dat");
    cfg.message = dir.path().join("missing.wav");

    let stop = Arc::new(AtomicBool::new(false));

    let handle = {
        let stop = stop.clone();

        thread::spawn(move || {
            let mut relay = Relay::new(&cfg).unwrap();
            relay.run(&stop).unwrap();
        })
    };

    let (login, relay_addr) = master.expect(b"RPTL");
    assert_eq!(login, b"RPTL\x00\x2F\x4D\x61");

    let mut ack = b"RPTACK".to_vec();
    ack.extend_from_slice(&SALT);
    master.0.send_to(&ack, relay_addr).unwrap();

    let (auth, _) = master.expect(b"RPTK");
    let mut h = Sha256::new();
    h.update(SALT);
    h.update(b"passw0rd");
    assert_eq!(&auth[8..], &h.finalize()[..]);

    master.0.send_to(b"RPTACK\x00\x2F\x4D\x61", relay_addr).unwrap();

    let (conf, _) = master.expect(b"RPTC");
    assert_eq!(conf.len(), 302);
    assert_eq!(&conf[8..16], b"N0CALL  ");

    master.0.send_to(b"RPTACK\x00\x2F\x4D\x61", relay_addr).unwrap();

    let (keyup, _) = master.expect(b"DMRD");
    assert_eq!(keyup.len(), 55);
    assert_eq!(keyup[15], 0xA1);
    assert_eq!(&keyup[8..11], &[0x00, 0x00, 0x5B]);

    // Call in: header configures the vocoder.
    master.0.send_to(&call_frame(1), relay_addr).unwrap();

    let (gain, vocoder_relay) = vocoder_peer.recv();
    assert_eq!(gain, vocoder::gain());
    let (rate, _) = vocoder_peer.recv();
    assert_eq!(rate, vocoder::rate());

    // Decoded audio comes back and is recorded.
    let pcm = vocoder::speech(&[0x0100; 160]);
    for _ in 0..4 {
        vocoder_peer.0.send_to(&pcm, vocoder_relay).unwrap();
    }

    thread::sleep(Duration::from_millis(100));
    master.0.send_to(&call_frame(2), relay_addr).unwrap();
    thread::sleep(Duration::from_millis(100));

    stop.store(true, Ordering::Relaxed);

    let (close, _) = master.expect(b"RPTCL");
    assert_eq!(close, b"RPTCL\x00\x2F\x4D\x61");

    handle.join().unwrap();

    let files: Vec<PathBuf> = fs::read_dir(dir.path()).unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().map_or(false, |e| e == "wav"))
        .collect();

    assert_eq!(files.len(), 1);
    assert!(files[0].to_str().unwrap().ends_with("_2680001_.wav"));
    assert_eq!(fs::metadata(&files[0]).unwrap().len(), 44 + 4 * 320);
}

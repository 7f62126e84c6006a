//! Multiplexing of voice traffic between the master and the vocoder.
//!
//! Received calls are forwarded to the vocoder as compressed frames and the decoded audio
//! is recorded. When a long enough call ends, the voice message is encoded by the vocoder
//! and transmitted back as a new call, paced at one audio block per 20ms.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use log::{debug, info, warn};
use rand::Rng;

use crate::audio::{self, WavSink, WavSource};
use crate::config::{CallFilter, RelayConfig};
use crate::consts::{
    AMBE_PER_BURST, AMBE_FRAME_BYTES, BLOCK_PERIOD, CALL_GRACE, MAX_DRIFT, PAYLOAD_BYTES,
    PCM_SAMPLES, REPLY_DELAY, SUPERFRAME_BURSTS, TERMINATOR_GRACE,
};
use crate::error::Result;
use crate::frame::{CallType, DataFrame, FrameType, Slot, DATA_TYPE_HEADER,
                   DATA_TYPE_TERMINATOR};
use crate::ids;
use crate::outbox::Outbox;
use crate::vocoder::{self, VocoderReply};
use crate::voice::burst::{self, AmbeFrame};
use crate::voice::control::LinkControl;
use crate::voice::embedded::EmbeddedLc;
use crate::voice::full;

/// Call being received from the master.
struct RxCall {
    src: u32,
    call_type: CallType,
    /// Recording of the call, if it could be created.
    sink: Option<WavSink>,
}

impl RxCall {
    /// Number of audio blocks recorded.
    fn frames(&self) -> usize {
        self.sink.as_ref().map_or(0, WavSink::frames)
    }

    /// Close the recording.
    fn finish(self) {
        let frames = self.frames();

        if let Some(sink) = self.sink {
            let path = sink.path().to_path_buf();

            if let Err(e) = sink.finalize() {
                warn!("unable to finalize {}: {}", path.display(), e);
            }
        }

        info!("call from {} ended after {} blocks", self.src, frames);
    }
}

/// Destination of a voice message transmission.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Reply {
    pub dst: u32,
    pub call_type: CallType,
}

/// Voice message being transmitted to the master.
struct TxCall {
    source: WavSource,
    reply: Reply,
    stream: u32,
    lc: LinkControl,
    emb: EmbeddedLc,
    /// Compressed frames of the burst being assembled.
    ambe: [AmbeFrame; AMBE_PER_BURST],
    /// Number of compressed frames received from the vocoder.
    frames: usize,
    /// Deadline of the next audio block.
    next_block: Option<Instant>,
}

impl TxCall {
    /// Sequence number of the next frame.
    fn seq(&self) -> u8 {
        ((self.frames / AMBE_PER_BURST + 1) % 256) as u8
    }
}

/// Routes voice traffic between the master and the vocoder and schedules replies.
pub struct Multiplexer {
    repeater: u32,
    radio_id: u32,
    talkgroup: u32,
    colour_code: u8,
    recordings: PathBuf,
    message: PathBuf,
    ids: PathBuf,
    min_reply_frames: usize,
    filter: CallFilter,
    /// Stream ID of the call in progress, cleared by its terminator.
    rx_stream: Option<u32>,
    rx: Option<RxCall>,
    /// End of the current call, and afterwards the start of the reply.
    deadline: Option<Instant>,
    pending: Option<Reply>,
    tx: Option<TxCall>,
}

impl Multiplexer {
    /// Create a new `Multiplexer` with no call in progress.
    pub fn new(cfg: &RelayConfig) -> Self {
        Multiplexer {
            repeater: cfg.repeater_id,
            radio_id: cfg.radio_id(),
            talkgroup: cfg.master.talkgroup,
            colour_code: cfg.colour_code,
            recordings: cfg.recordings.clone(),
            message: cfg.message.clone(),
            ids: cfg.ids.clone(),
            min_reply_frames: cfg.min_reply_frames,
            filter: cfg.filter,
            rx_stream: None,
            rx: None,
            deadline: None,
            pending: None,
            tx: None,
        }
    }

    /// Whether a call is being received or recorded.
    pub fn receiving(&self) -> bool { self.rx.is_some() }

    /// Whether the voice message is being transmitted.
    pub fn transmitting(&self) -> bool { self.tx.is_some() }

    /// Reply waiting to be transmitted.
    pub fn pending(&self) -> Option<Reply> { self.pending }

    /// Handle a data frame received from the master.
    pub fn on_repeater_frame(&mut self, f: &DataFrame, now: Instant, out: &mut Outbox) {
        if f.is_header() {
            self.on_header(f, now, out);
        } else if f.is_terminator() {
            debug!("terminator for stream {:08X}", f.stream);

            self.rx_stream = None;
            self.deadline = Some(now + TERMINATOR_GRACE);
        } else if f.is_voice() {
            for frame in burst::extract(&f.payload).iter() {
                out.vocoder(vocoder::channel(frame));
            }

            self.deadline = Some(now + CALL_GRACE);
        }
    }

    fn on_header(&mut self, f: &DataFrame, now: Instant, out: &mut Outbox) {
        if self.rx_stream == Some(f.stream) {
            return;
        }

        self.rx_stream = Some(f.stream);

        if let Some(call) = self.rx.take() {
            call.finish();
        }

        match full::decode(&f.payload) {
            Some((lc, _, cc)) => debug!("header {:?} colour code {}", lc, cc),
            None => debug!("undecodable header for stream {:08X}", f.stream),
        }

        let callsign = ids::lookup(&self.ids, f.src).unwrap_or_default();
        let path = audio::recording_path(&self.recordings, Utc::now(), f.src, &callsign);

        let sink = match WavSink::create(&path) {
            Ok(sink) => Some(sink),
            Err(e) => {
                warn!("unable to record to {}: {}", path.display(), e);
                None
            },
        };

        info!("call from {} ({}) to {} started", f.src, callsign, f.dst);

        self.rx = Some(RxCall {
            src: f.src,
            call_type: f.call_type,
            sink,
        });

        out.vocoder(vocoder::gain());
        out.vocoder(vocoder::rate());

        self.deadline = Some(now + CALL_GRACE);
    }

    /// Handle a datagram received from the vocoder.
    pub fn on_vocoder_reply(&mut self, reply: &VocoderReply, out: &mut Outbox) {
        match *reply {
            VocoderReply::Pcm(ref samples) => self.record(samples),
            VocoderReply::Ambe(ref frame) => self.transmit(frame, out),
            VocoderReply::Unknown => {},
        }
    }

    fn record(&mut self, samples: &[i16; PCM_SAMPLES]) {
        let call = match self.rx.as_mut() {
            Some(call) => call,
            None => {
                debug!("discarding audio with no call in progress");
                return;
            },
        };

        let failed = match call.sink {
            Some(ref mut sink) => sink.write(samples).err(),
            None => return,
        };

        if let Some(e) = failed {
            warn!("recording failed, continuing without it: {}", e);
            call.sink = None;
        }
    }

    fn transmit(&mut self, frame: &AmbeFrame, out: &mut Outbox) {
        let colour_code = self.colour_code;
        let header = self.frame_header();

        let tx = match self.tx.as_mut() {
            Some(tx) => tx,
            None => {
                debug!("discarding compressed frame with no transmission in progress");
                return;
            },
        };

        tx.ambe[tx.frames % AMBE_PER_BURST] = *frame;

        if tx.frames % AMBE_PER_BURST == AMBE_PER_BURST - 1 {
            let pos = tx.frames / AMBE_PER_BURST % SUPERFRAME_BURSTS;

            out.master(DataFrame {
                seq: tx.seq(),
                dst: tx.reply.dst,
                call_type: tx.reply.call_type,
                frame_type: if pos == 0 { FrameType::VoiceSync } else { FrameType::Voice },
                data_type: pos as u8,
                stream: tx.stream,
                payload: burst::build(&tx.ambe, pos, &tx.emb, colour_code),
                ..header
            }.to_bytes().to_vec());
        }

        tx.frames += 1;
    }

    /// Advance timers: end a silent call, start a due reply, and pace the message audio.
    pub fn tick(&mut self, now: Instant, out: &mut Outbox) {
        match self.deadline {
            Some(d) if now > d => {},
            _ => return,
        }

        if let Some(call) = self.rx.take() {
            self.end_call(call, now);
            return;
        }

        if self.tx.is_none() {
            if let Some(reply) = self.pending.take() {
                if let Err(e) = self.start(reply, out) {
                    warn!("unable to play {}: {}", self.message.display(), e);
                    self.deadline = None;
                }
            }
        }

        if self.tx.is_some() {
            self.pace(now, out);
        } else if self.pending.is_none() {
            self.deadline = None;
        }
    }

    fn end_call(&mut self, call: RxCall, now: Instant) {
        let frames = call.frames();
        let src = call.src;
        let call_type = call.call_type;

        call.finish();
        self.rx_stream = None;

        if self.pending.is_none() {
            self.pending = self.reply_to(src, call_type, frames);
        }

        // Playback resumes at once, a new reply waits out the delay.
        self.deadline = if self.tx.is_some() {
            Some(now)
        } else {
            self.pending.map(|_| now + REPLY_DELAY)
        };
    }

    /// Destination of the reply to a finished call, if it warrants one.
    fn reply_to(&self, src: u32, call_type: CallType, frames: usize) -> Option<Reply> {
        if frames < self.min_reply_frames {
            debug!("call too short to reply to ({} blocks)", frames);
            return None;
        }

        if !self.filter.accepts(call_type) {
            debug!("not replying to {:?} call", call_type);
            return None;
        }

        let reply = match call_type {
            CallType::Private => Reply { dst: src, call_type },
            CallType::Group => Reply { dst: self.talkgroup, call_type },
        };

        info!("reply to {} scheduled", reply.dst);

        Some(reply)
    }

    /// Open the message and send the voice header of the reply.
    fn start(&mut self, reply: Reply, out: &mut Outbox) -> Result<()> {
        let source = WavSource::open(&self.message)?;
        let stream = rand::thread_rng().gen_range(1..=u32::MAX);

        let lc = LinkControl::new(reply.call_type, self.radio_id, reply.dst);

        info!("transmitting message to {} on stream {:08X}", reply.dst, stream);

        out.master(DataFrame {
            seq: 0,
            dst: reply.dst,
            call_type: reply.call_type,
            frame_type: FrameType::DataSync,
            data_type: DATA_TYPE_HEADER,
            stream,
            payload: full::encode(&lc, self.colour_code),
            ..self.frame_header()
        }.to_bytes().to_vec());

        out.vocoder(vocoder::gain());
        out.vocoder(vocoder::rate());

        self.tx = Some(TxCall {
            source,
            reply,
            stream,
            lc,
            emb: EmbeddedLc::new(&lc),
            ambe: [[0; AMBE_FRAME_BYTES]; AMBE_PER_BURST],
            frames: 0,
            next_block: None,
        });

        Ok(())
    }

    /// Send the next audio block to the vocoder if it's due, or the terminator once the
    /// message is exhausted.
    fn pace(&mut self, now: Instant, out: &mut Outbox) {
        let header = self.frame_header();
        let colour_code = self.colour_code;

        let tx = match self.tx.as_mut() {
            Some(tx) => tx,
            None => return,
        };

        let due = match tx.next_block {
            Some(due) if due <= now + MAX_DRIFT && now <= due + MAX_DRIFT => due,
            _ => now,
        };

        if now < due {
            tx.next_block = Some(due);
            return;
        }

        tx.next_block = Some(due + BLOCK_PERIOD);

        let block = match tx.source.read_block() {
            Ok(block) => block,
            Err(e) => {
                warn!("message read failed: {}", e);
                None
            },
        };

        if let Some(samples) = block {
            out.vocoder(vocoder::speech(&samples));
            return;
        }

        out.master(DataFrame {
            seq: tx.seq(),
            dst: tx.reply.dst,
            call_type: tx.reply.call_type,
            frame_type: FrameType::DataSync,
            data_type: DATA_TYPE_TERMINATOR,
            stream: tx.stream,
            payload: full::encode(&tx.lc, colour_code),
            ..header
        }.to_bytes().to_vec());

        info!("message to {} complete after {} frames", tx.reply.dst, tx.frames);

        self.tx = None;
        self.deadline = self.pending.map(|_| now + REPLY_DELAY);
    }

    /// Close any recording in progress and drop the transmission.
    pub fn close(&mut self) {
        if let Some(call) = self.rx.take() {
            call.finish();
        }

        self.rx_stream = None;
        self.tx = None;
        self.pending = None;
        self.deadline = None;
    }

    /// Template of an outbound frame with the fields common to all frames of a reply.
    fn frame_header(&self) -> DataFrame {
        DataFrame {
            seq: 0,
            src: self.radio_id,
            dst: 0,
            repeater: self.repeater,
            slot: Slot::Two,
            call_type: CallType::Group,
            frame_type: FrameType::DataSync,
            data_type: 0,
            stream: 0,
            payload: [0; PAYLOAD_BYTES],
        }
    }
}

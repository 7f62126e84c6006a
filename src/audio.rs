//! WAV recordings of received calls and playback of the outbound voice message.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::consts::{PCM_SAMPLES, SAMPLE_RATE};
use crate::error::{RelayError, Result};

/// Format of recordings and of the message audio.
pub const SPEC: WavSpec = WavSpec {
    channels: 1,
    sample_rate: SAMPLE_RATE,
    bits_per_sample: 16,
    sample_format: SampleFormat::Int,
};

/// Path of the recording of a call from `src` starting at `start`, named by UTC
/// timestamp with millisecond precision, source ID, and callsign.
pub fn recording_path(dir: &Path, start: DateTime<Utc>, src: u32, callsign: &str) -> PathBuf {
    dir.join(format!("{}_{}_{}.wav", start.format("%Y-%m-%d_%H.%M.%S%.3f"), src, callsign))
}

/// WAV file receiving the decoded audio of one call.
pub struct WavSink {
    writer: WavWriter<BufWriter<File>>,
    path: PathBuf,
    /// Number of 20ms blocks written.
    frames: usize,
}

impl WavSink {
    /// Create a new recording at the given path, replacing any existing file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<WavSink> {
        let path = path.as_ref().to_path_buf();

        Ok(WavSink {
            writer: WavWriter::create(&path, SPEC)?,
            path,
            frames: 0,
        })
    }

    /// Append one block of samples.
    pub fn write(&mut self, samples: &[i16; PCM_SAMPLES]) -> Result<()> {
        for &s in samples.iter() {
            self.writer.write_sample(s)?;
        }

        self.frames += 1;

        Ok(())
    }

    /// Number of blocks written so far.
    pub fn frames(&self) -> usize { self.frames }

    pub fn path(&self) -> &Path { &self.path }

    /// Patch the container sizes and close the file.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize().map_err(RelayError::from)
    }
}

/// Voice message read back in 20ms blocks.
pub struct WavSource {
    reader: WavReader<BufReader<File>>,
}

impl WavSource {
    /// Open the message at the given path. Fail unless it's 8kHz 16-bit integer mono.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<WavSource> {
        let reader = WavReader::open(path)?;
        let spec = reader.spec();

        if spec != SPEC {
            return Err(RelayError::UnsupportedAudio {
                sample_rate: spec.sample_rate,
                channels: spec.channels,
                bits: spec.bits_per_sample,
            });
        }

        Ok(WavSource { reader })
    }

    /// Read the next block of samples. Return `Ok(None)` at the end of the audio,
    /// including when fewer than a full block remain.
    pub fn read_block(&mut self) -> Result<Option<[i16; PCM_SAMPLES]>> {
        let mut block = [0; PCM_SAMPLES];
        let mut n = 0;

        for (dst, s) in block.iter_mut().zip(self.reader.samples::<i16>()) {
            *dst = s?;
            n += 1;
        }

        Ok(if n == PCM_SAMPLES { Some(block) } else { None })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    fn write_message(path: &Path, spec: WavSpec, samples: usize) {
        let mut w = WavWriter::create(path, spec).unwrap();

        for i in 0..samples {
            w.write_sample(i as i16).unwrap();
        }

        w.finalize().unwrap();
    }

    #[test]
    fn test_recording_path() {
        let t = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap()
            + chrono::Duration::milliseconds(42);

        assert_eq!(recording_path(Path::new("/rec"), t, 1234567, "N0CALL"),
                   PathBuf::from("/rec/2024-03-09_07.05.02.042_1234567_N0CALL.wav"));
    }

    #[test]
    fn test_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("call.wav");

        let mut sink = WavSink::create(&path).unwrap();
        assert_eq!(sink.path(), path.as_path());

        let mut block = [0; PCM_SAMPLES];
        block[0] = -1;
        block[159] = 0x0102;

        sink.write(&block).unwrap();
        sink.write(&block).unwrap();
        sink.write(&block).unwrap();
        assert_eq!(sink.frames(), 3);
        sink.finalize().unwrap();

        assert_eq!(std::fs::metadata(&path).unwrap().len(), 44 + 3 * 320);

        let mut r = WavReader::open(&path).unwrap();
        assert_eq!(r.spec(), SPEC);
        let samples: Vec<i16> = r.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), 480);
        assert_eq!(samples[160], -1);
        assert_eq!(samples[319], 0x0102);
    }

    #[test]
    fn test_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msg.wav");
        write_message(&path, SPEC, 2 * PCM_SAMPLES + 100);

        let mut src = WavSource::open(&path).unwrap();

        let b = src.read_block().unwrap().unwrap();
        assert_eq!(b[0], 0);
        assert_eq!(b[159], 159);

        let b = src.read_block().unwrap().unwrap();
        assert_eq!(b[0], 160);

        // Trailing partial block is dropped.
        assert!(src.read_block().unwrap().is_none());
        assert!(src.read_block().unwrap().is_none());
    }

    #[test]
    fn test_metadata_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msg.wav");

        let info = b"INFOISFT\x06\x00\x00\x00Lavf60";
        let samples = 2 * PCM_SAMPLES;

        let mut buf = b"RIFF".to_vec();
        buf.extend_from_slice(&((4 + 24 + 8 + info.len() + 8 + samples * 2) as u32)
            .to_le_bytes());
        buf.extend_from_slice(b"WAVEfmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&8000u32.to_le_bytes());
        buf.extend_from_slice(&16000u32.to_le_bytes());
        buf.extend_from_slice(&2u16.to_le_bytes());
        buf.extend_from_slice(&16u16.to_le_bytes());
        buf.extend_from_slice(b"LIST");
        buf.extend_from_slice(&(info.len() as u32).to_le_bytes());
        buf.extend_from_slice(info);
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&((samples * 2) as u32).to_le_bytes());

        for i in 0..samples {
            buf.extend_from_slice(&(i as i16).to_le_bytes());
        }

        std::fs::write(&path, &buf).unwrap();

        let mut src = WavSource::open(&path).unwrap();

        let b = src.read_block().unwrap().unwrap();
        assert_eq!(b[0], 0);
        assert_eq!(b[159], 159);

        let b = src.read_block().unwrap().unwrap();
        assert_eq!(b[0], 160);

        assert!(src.read_block().unwrap().is_none());
    }

    #[test]
    fn test_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msg.wav");

        write_message(&path, WavSpec { sample_rate: 16000, ..SPEC }, 10);

        match WavSource::open(&path) {
            Err(RelayError::UnsupportedAudio { sample_rate, channels, bits }) => {
                assert_eq!((sample_rate, channels, bits), (16000, 1, 16));
            },
            _ => panic!(),
        }

        write_message(&path, WavSpec { channels: 2, ..SPEC }, 10);
        assert!(WavSource::open(&path).is_err());

        assert!(matches!(WavSource::open(dir.path().join("missing.wav")),
                         Err(RelayError::Wav(_))));
    }
}

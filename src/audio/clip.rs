use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

/// Format details read from a RIFF/WAVE header.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WavFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub duration: Duration,
}

/// In-memory handle to one synthesized audio payload.
///
/// Cloning shares the bytes; the payload is freed once the last clone drops.
#[derive(Clone, Debug)]
pub struct AudioClip {
    bytes: Arc<[u8]>,
    content_type: Option<String>,
    wav: Option<WavFormat>,
}

impl AudioClip {
    /// Wrap a response body, probing WAV headers for format and duration.
    pub fn from_bytes(bytes: Vec<u8>, content_type: Option<String>) -> Self {
        let bytes: Arc<[u8]> = Arc::from(bytes);
        let wav = if looks_like_wav(&bytes) {
            probe_wav(&bytes)
        } else {
            None
        };
        Self {
            bytes,
            content_type,
            wav,
        }
    }

    /// Shared handle to the raw bytes.
    pub fn bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn wav_format(&self) -> Option<WavFormat> {
        self.wav
    }

    /// Playback length, when the header allowed it to be computed.
    pub fn duration(&self) -> Option<Duration> {
        self.wav.map(|format| format.duration)
    }

    /// Downgrade to a weak reference, used to check release of superseded clips.
    pub fn downgrade(&self) -> std::sync::Weak<[u8]> {
        Arc::downgrade(&self.bytes)
    }
}

/// True when the buffer starts with a RIFF/WAVE header.
pub(crate) fn looks_like_wav(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}

fn probe_wav(bytes: &Arc<[u8]>) -> Option<WavFormat> {
    let reader = hound::WavReader::new(Cursor::new(Arc::clone(bytes))).ok()?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return None;
    }
    // `duration` counts frames, independent of channel count.
    let seconds = reader.duration() as f64 / spec.sample_rate as f64;
    Some(WavFormat {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        duration: Duration::from_secs_f64(seconds),
    })
}

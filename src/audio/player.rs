use std::io::Cursor;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use thiserror::Error;

use super::AudioClip;

/// Errors raised while opening the output device or starting playback.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The default output device could not be opened.
    #[error("Audio output unavailable: {0}")]
    Output(String),
    /// The clip could not be decoded by the playback backend.
    #[error("Audio decode failed: {0}")]
    Decode(String),
    /// Playback was requested with no clip loaded.
    #[error("No audio loaded")]
    NoClip,
}

/// Plays the current synthesis result on the default output device.
pub struct AudioPlayer {
    stream: OutputStream,
    sink: Option<Sink>,
    clip: Option<AudioClip>,
    volume: f32,
}

impl AudioPlayer {
    /// Open the default output device.
    pub fn new(volume: f32) -> Result<Self, PlaybackError> {
        let stream = OutputStreamBuilder::open_default_stream()
            .map_err(|err| PlaybackError::Output(err.to_string()))?;
        Ok(Self {
            stream,
            sink: None,
            clip: None,
            volume: volume.clamp(0.0, 1.0),
        })
    }

    /// Replace the loaded clip, stopping whatever was playing.
    pub fn set_clip(&mut self, clip: AudioClip) {
        self.stop();
        self.clip = Some(clip);
    }

    /// Stop playback and release the loaded clip.
    pub fn clear(&mut self) {
        self.stop();
        self.clip = None;
    }

    /// Start playback of the loaded clip from the beginning.
    pub fn play(&mut self) -> Result<(), PlaybackError> {
        let clip = self.clip.as_ref().ok_or(PlaybackError::NoClip)?;
        let decoder = Decoder::new(Cursor::new(clip.bytes()))
            .map_err(|err| PlaybackError::Decode(err.to_string()))?;
        self.stop();
        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.volume);
        sink.append(decoder);
        sink.play();
        self.sink = Some(sink);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    /// True while queued audio remains in the sink.
    pub fn is_playing(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| !sink.empty())
    }

    /// Elapsed playback time of the current run.
    pub fn position(&self) -> Option<Duration> {
        self.sink
            .as_ref()
            .filter(|sink| !sink.empty())
            .map(|sink| sink.get_pos())
    }

    /// Fraction played (0.0 - 1.0) when the clip length is known.
    pub fn progress(&self) -> Option<f32> {
        let total = self.clip.as_ref()?.duration()?;
        let position = self.position()?;
        playback_fraction(position, total)
    }

    /// Adjust output volume for current and future playback.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(self.volume);
        }
    }
}

fn playback_fraction(position: Duration, total: Duration) -> Option<f32> {
    if total.is_zero() {
        return None;
    }
    Some((position.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_fraction_is_clamped() {
        let total = Duration::from_secs(4);
        assert_eq!(playback_fraction(Duration::from_secs(1), total), Some(0.25));
        assert_eq!(playback_fraction(Duration::from_secs(9), total), Some(1.0));
        assert_eq!(playback_fraction(Duration::from_secs(1), Duration::ZERO), None);
    }
}

use std::time::Duration;

use crate::audio::AudioClip;

/// Summary of the current synthesis result for display.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipInfo {
    pub bytes: usize,
    pub duration: Option<Duration>,
    pub content_type: Option<String>,
}

impl From<&AudioClip> for ClipInfo {
    fn from(clip: &AudioClip) -> Self {
        Self {
            bytes: clip.len(),
            duration: clip.duration(),
            content_type: clip.content_type().map(str::to_string),
        }
    }
}

/// Output panel state: the current clip, a failure, and the player.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultState {
    pub clip: Option<ClipInfo>,
    /// Error from the last request; offered with a retry action.
    pub failure: Option<String>,
    pub playing: bool,
    pub position: Option<Duration>,
    pub progress: Option<f32>,
    pub volume: f32,
}

impl Default for ResultState {
    fn default() -> Self {
        Self {
            clip: None,
            failure: None,
            playing: false,
            position: None,
            progress: None,
            volume: 1.0,
        }
    }
}

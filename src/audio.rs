//! Synthesized audio handles and inline playback.

mod clip;
mod player;

pub use clip::{AudioClip, WavFormat};
pub use player::{AudioPlayer, PlaybackError};

//! Synthesis request lifecycle: validation, the pending token, and results.
//!
//! At most one request is pending. Every request gets a fresh [`RequestId`];
//! a completion carrying any other id is reported as stale and ignored.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::audio::AudioClip;
use crate::backend::SynthesisRequestError;
use crate::selection::{Selection, ValidationError};

/// Monotonic token identifying one background request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues strictly increasing request ids.
#[derive(Debug, Default)]
pub struct RequestSequence {
    last: u64,
}

impl RequestSequence {
    pub fn next_id(&mut self) -> RequestId {
        self.last += 1;
        RequestId(self.last)
    }
}

/// A voice recording uploaded for the personalized model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoiceSample {
    pub file_name: String,
    pub bytes: Arc<[u8]>,
}

impl VoiceSample {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a sample from disk, naming it after the file.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "voice.wav".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Everything sent to the backend for one synthesis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub selection: Selection,
    pub text: String,
    pub voice_sample: Option<VoiceSample>,
}

impl SynthesisRequest {
    /// Validate the selection and assemble a request carrying any attached sample.
    pub fn build(
        selection: &Selection,
        text: &str,
        voice_sample: Option<&VoiceSample>,
    ) -> Result<Self, ValidationError> {
        selection.validate()?;
        Ok(Self {
            selection: selection.clone(),
            text: text.to_string(),
            voice_sample: voice_sample.cloned(),
        })
    }
}

/// Reasons a submit is refused before anything is sent.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("A synthesis request is already in progress")]
    AlreadyPending,
    #[error("Nothing to retry")]
    NothingToRetry,
    #[error("Backend not configured: {0}")]
    BackendUnavailable(String),
}

/// Current state of the synthesis output.
#[derive(Clone, Debug, Default)]
pub enum SynthesisPhase {
    /// No result and nothing in flight.
    #[default]
    Idle,
    /// A request is in flight.
    Pending {
        request_id: RequestId,
        request: SynthesisRequest,
    },
    /// The latest request produced audio.
    Ready(AudioClip),
    /// The latest request failed; it can be retried as-is.
    Failed {
        message: String,
        request: SynthesisRequest,
    },
}

/// What happened to a completion handed to [`SynthesisState::complete`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The completion belonged to the pending request and was applied.
    Applied,
    /// The completion belonged to an older or cancelled request.
    Stale,
}

/// Owns the synthesis phase and request sequence for one session.
#[derive(Debug, Default)]
pub struct SynthesisState {
    phase: SynthesisPhase,
    sequence: RequestSequence,
}

impl SynthesisState {
    pub fn phase(&self) -> &SynthesisPhase {
        &self.phase
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, SynthesisPhase::Pending { .. })
    }

    pub fn pending_id(&self) -> Option<RequestId> {
        match &self.phase {
            SynthesisPhase::Pending { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }

    /// The current audio result, if any.
    pub fn result(&self) -> Option<&AudioClip> {
        match &self.phase {
            SynthesisPhase::Ready(clip) => Some(clip),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match &self.phase {
            SynthesisPhase::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Validate and start a request from the form contents.
    ///
    /// On error the phase is left untouched, including any current result.
    pub fn submit(
        &mut self,
        selection: &Selection,
        text: &str,
        voice_sample: Option<&VoiceSample>,
    ) -> Result<(RequestId, SynthesisRequest), SubmitError> {
        if self.is_pending() {
            return Err(SubmitError::AlreadyPending);
        }
        let request = SynthesisRequest::build(selection, text, voice_sample)?;
        Ok(self.begin(request))
    }

    /// Resend the request that last failed.
    pub fn retry(&mut self) -> Result<(RequestId, SynthesisRequest), SubmitError> {
        match &self.phase {
            SynthesisPhase::Failed { request, .. } => {
                let request = request.clone();
                Ok(self.begin(request))
            }
            SynthesisPhase::Pending { .. } => Err(SubmitError::AlreadyPending),
            _ => Err(SubmitError::NothingToRetry),
        }
    }

    /// Apply a worker completion if it belongs to the pending request.
    pub fn complete(
        &mut self,
        request_id: RequestId,
        result: Result<AudioClip, SynthesisRequestError>,
    ) -> Completion {
        if self.pending_id() != Some(request_id) {
            return Completion::Stale;
        }
        let previous = std::mem::take(&mut self.phase);
        let SynthesisPhase::Pending { request, .. } = previous else {
            return Completion::Stale;
        };
        self.phase = match result {
            Ok(clip) => SynthesisPhase::Ready(clip),
            Err(err) => SynthesisPhase::Failed {
                message: err.to_string(),
                request,
            },
        };
        Completion::Applied
    }

    /// Drop any pending request and result, returning to idle.
    pub fn reset(&mut self) {
        self.phase = SynthesisPhase::Idle;
    }

    fn begin(&mut self, request: SynthesisRequest) -> (RequestId, SynthesisRequest) {
        let request_id = self.sequence.next_id();
        self.phase = SynthesisPhase::Pending {
            request_id,
            request: request.clone(),
        };
        (request_id, request)
    }
}

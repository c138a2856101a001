//! Backend REST calls: the model catalog and speech synthesis.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use url::Url;

use super::multipart::{MultipartForm, mime_for_file_name};
use crate::audio::AudioClip;
use crate::catalog::ModelEntry;
use crate::http_client::{self, AgentTimeouts, RetryConfig};
use crate::selection::SelectionField;
use crate::synthesis::SynthesisRequest;

pub const CATALOG_PATH: &str = "all_models";
pub const SYNTHESIS_PATH: &str = "tts";
pub const VOICE_SAMPLE_FIELD: &str = "file";
pub const TEXT_FIELD: &str = "text";

const MAX_ERROR_BODY_BYTES: usize = 16 * 1024;
const ERROR_SNIPPET_CHARS: usize = 300;

/// Size caps and retry policy for backend calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackendLimits {
    pub max_catalog_bytes: usize,
    pub max_audio_bytes: usize,
    pub catalog_retry: RetryConfig,
}

impl Default for BackendLimits {
    fn default() -> Self {
        Self {
            max_catalog_bytes: 4 * 1024 * 1024,
            max_audio_bytes: 100 * 1024 * 1024,
            catalog_retry: RetryConfig {
                max_attempts: 3,
                base_delay: Duration::from_millis(400),
                max_delay: Duration::from_secs(4),
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendUrlError {
    #[error("Backend URL is not set")]
    Missing,
    #[error("Invalid backend URL '{url}': {source}")]
    Invalid {
        url: String,
        source: url::ParseError,
    },
    #[error("Backend URL '{0}' must use http or https")]
    UnsupportedScheme(String),
}

/// Failure to load the model catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogFetchError {
    #[error("Backend unreachable: {0}")]
    Transport(String),
    #[error("Backend returned HTTP {code}: {body}")]
    Status { code: u16, body: String },
    #[error("Malformed model list: {0}")]
    Json(String),
    #[error("Model list too large: {0}")]
    TooLarge(String),
    #[error("Model list request cancelled")]
    Cancelled,
}

impl CatalogFetchError {
    /// Transport failures and server errors may succeed on another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { code, .. } => (500..=599).contains(code),
            Self::Json(_) | Self::TooLarge(_) | Self::Cancelled => false,
        }
    }
}

/// Failure to obtain audio for a synthesis request.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisRequestError {
    #[error("Backend unreachable: {0}")]
    Transport(String),
    #[error("Backend returned HTTP {code}: {body}")]
    Status { code: u16, body: String },
    #[error("Backend returned an empty audio response")]
    EmptyBody,
    #[error("Backend returned {content_type} instead of audio: {body}")]
    UnexpectedContentType { content_type: String, body: String },
    #[error("Audio response too large: {0}")]
    TooLarge(String),
    #[error("Failed to read audio response: {0}")]
    Io(String),
}

/// Blocking client bound to one backend base URL.
#[derive(Clone, Debug)]
pub struct BackendClient {
    base_url: Url,
    agent: ureq::Agent,
    limits: BackendLimits,
}

impl BackendClient {
    pub fn new(
        base_url: &str,
        timeouts: AgentTimeouts,
        limits: BackendLimits,
    ) -> Result<Self, BackendUrlError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            agent: http_client::build_agent(timeouts),
            limits,
        })
    }

    /// `{base}/all_models?user={user}`
    pub fn catalog_url(&self, user: &str) -> Url {
        let mut url = self.endpoint(CATALOG_PATH);
        url.query_pairs_mut().append_pair("user", user);
        url
    }

    /// `{base}/tts`
    pub fn synthesis_url(&self) -> Url {
        self.endpoint(SYNTHESIS_PATH)
    }

    /// Load the models available to `user`, retrying transient failures.
    pub fn fetch_catalog(&self, user: &str) -> Result<Vec<ModelEntry>, CatalogFetchError> {
        self.fetch_catalog_with_cancel(user, &AtomicBool::new(false))
    }

    /// Like [`BackendClient::fetch_catalog`], but stops between attempts once `cancel` is set.
    pub fn fetch_catalog_with_cancel(
        &self,
        user: &str,
        cancel: &AtomicBool,
    ) -> Result<Vec<ModelEntry>, CatalogFetchError> {
        let result = http_client::retry_with_backoff(
            self.limits.catalog_retry,
            || {
                if cancel.load(Ordering::Relaxed) {
                    return Err(CatalogFetchError::Cancelled);
                }
                self.fetch_catalog_once(user)
            },
            |err| {
                let retry = err.is_retryable() && !cancel.load(Ordering::Relaxed);
                if retry {
                    tracing::warn!("Catalog fetch failed, retrying: {err}");
                }
                retry
            },
        );
        match result {
            Err(_) if cancel.load(Ordering::Relaxed) => Err(CatalogFetchError::Cancelled),
            other => other,
        }
    }

    fn fetch_catalog_once(&self, user: &str) -> Result<Vec<ModelEntry>, CatalogFetchError> {
        let url = self.catalog_url(user);
        let response = match self
            .agent
            .get(url.as_str())
            .set("Accept", "application/json")
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = http_client::read_error_body(response, MAX_ERROR_BODY_BYTES);
                return Err(CatalogFetchError::Status {
                    code,
                    body: snippet(&body),
                });
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(CatalogFetchError::Transport(err.to_string()));
            }
        };
        let bytes = http_client::read_response_bytes(response, self.limits.max_catalog_bytes)
            .map_err(|err| {
                if http_client::is_too_large(&err) {
                    CatalogFetchError::TooLarge(err.to_string())
                } else {
                    CatalogFetchError::Transport(err.to_string())
                }
            })?;
        parse_catalog(&bytes)
    }

    /// Send one multipart synthesis request and return the audio it produced.
    pub fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioClip, SynthesisRequestError> {
        let form = encode_request(request);
        let content_type = form.content_type();
        let body = form.finish();
        let url = self.synthesis_url();
        tracing::info!(
            url = %url,
            model = %request.selection,
            text_chars = request.text.chars().count(),
            voice_sample = request.voice_sample.is_some(),
            "Sending synthesis request"
        );
        let response = match self
            .agent
            .post(url.as_str())
            .set("Content-Type", &content_type)
            .set("Accept", "audio/*, application/octet-stream")
            .send_bytes(&body)
        {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = http_client::read_error_body(response, MAX_ERROR_BODY_BYTES);
                return Err(SynthesisRequestError::Status {
                    code,
                    body: snippet(&body),
                });
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(SynthesisRequestError::Transport(err.to_string()));
            }
        };

        let content_type = response.header("Content-Type").map(str::to_string);
        if let Some(kind) = content_type.as_deref()
            && is_textual(kind)
        {
            let body = http_client::read_error_body(response, MAX_ERROR_BODY_BYTES);
            return Err(SynthesisRequestError::UnexpectedContentType {
                content_type: kind.to_string(),
                body: snippet(&body),
            });
        }
        let bytes = http_client::read_response_bytes(response, self.limits.max_audio_bytes)
            .map_err(|err| {
                if http_client::is_too_large(&err) {
                    SynthesisRequestError::TooLarge(err.to_string())
                } else {
                    SynthesisRequestError::Io(err.to_string())
                }
            })?;
        if bytes.is_empty() {
            return Err(SynthesisRequestError::EmptyBody);
        }
        Ok(AudioClip::from_bytes(bytes, content_type))
    }

    fn endpoint(&self, segment: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(segment);
        }
        url
    }
}

/// Build the multipart body for a synthesis request.
pub fn encode_request(request: &SynthesisRequest) -> MultipartForm {
    let mut form = MultipartForm::new();
    if let Some(sample) = &request.voice_sample {
        form.file(
            VOICE_SAMPLE_FIELD,
            &sample.file_name,
            mime_for_file_name(&sample.file_name),
            &sample.bytes,
        );
    }
    for field in SelectionField::ALL {
        form.text(field.form_name(), request.selection.get(field));
    }
    form.text(TEXT_FIELD, &request.text);
    form
}

fn parse_base_url(raw: &str) -> Result<Url, BackendUrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BackendUrlError::Missing);
    }
    let mut url = Url::parse(trimmed).map_err(|source| BackendUrlError::Invalid {
        url: trimmed.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(BackendUrlError::UnsupportedScheme(trimmed.to_string()));
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn parse_catalog(bytes: &[u8]) -> Result<Vec<ModelEntry>, CatalogFetchError> {
    serde_json::from_slice(bytes).map_err(|err| {
        let body = String::from_utf8_lossy(bytes);
        CatalogFetchError::Json(format!("{err}: {}", snippet(&body)))
    })
}

fn is_textual(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime.starts_with("text/") || mime == "application/json" || mime.ends_with("+json")
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= ERROR_SNIPPET_CHARS {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(ERROR_SNIPPET_CHARS).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Selection;
    use crate::synthesis::VoiceSample;

    fn client(base: &str) -> BackendClient {
        BackendClient::new(base, AgentTimeouts::default(), BackendLimits::default()).unwrap()
    }

    #[test]
    fn endpoints_append_to_base_path() {
        assert_eq!(
            client("http://localhost:5000").synthesis_url().as_str(),
            "http://localhost:5000/tts"
        );
        assert_eq!(
            client("https://example.com/api/").synthesis_url().as_str(),
            "https://example.com/api/tts"
        );
        assert_eq!(
            client("https://example.com/api?x=1#frag").synthesis_url().as_str(),
            "https://example.com/api/tts"
        );
    }

    #[test]
    fn catalog_url_encodes_user() {
        let url = client("http://localhost:5000").catalog_url("ana maria&co");
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/all_models?user=ana+maria%26co"
        );
    }

    #[test]
    fn rejects_unusable_base_urls() {
        let limits = BackendLimits::default();
        let timeouts = AgentTimeouts::default();
        assert!(matches!(
            BackendClient::new("  ", timeouts, limits),
            Err(BackendUrlError::Missing)
        ));
        assert!(matches!(
            BackendClient::new("not a url", timeouts, limits),
            Err(BackendUrlError::Invalid { .. })
        ));
        assert!(matches!(
            BackendClient::new("ftp://host/", timeouts, limits),
            Err(BackendUrlError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn encodes_fields_without_file_when_no_sample() {
        let request = SynthesisRequest {
            selection: Selection {
                language: "en".into(),
                dataset: "ds1".into(),
                model_name: "m1".into(),
            },
            text: "hello".into(),
            voice_sample: None,
        };
        let body = String::from_utf8(encode_request(&request).finish()).unwrap();
        for (name, value) in [
            ("language", "en"),
            ("dataset", "ds1"),
            ("model_name", "m1"),
            ("text", "hello"),
        ] {
            assert!(body.contains(&format!("name=\"{name}\"\r\n\r\n{value}\r\n")));
        }
        assert!(!body.contains("name=\"file\""));
    }

    #[test]
    fn encodes_voice_sample_as_file_part() {
        let request = SynthesisRequest {
            selection: Selection {
                language: "multilingual".into(),
                dataset: "multi-dataset".into(),
                model_name: "your_tts".into(),
            },
            text: "hi".into(),
            voice_sample: Some(VoiceSample::new("me.wav", b"RIFFdata".to_vec())),
        };
        let body = encode_request(&request).finish();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("name=\"file\"; filename=\"me.wav\"\r\nContent-Type: audio/wav"));
        assert!(text.contains("RIFFdata"));
    }

    #[test]
    fn catalog_json_errors_are_reported() {
        let err = parse_catalog(b"{\"error\":\"nope\"}").unwrap_err();
        assert!(matches!(err, CatalogFetchError::Json(_)));
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn retryable_statuses_are_server_errors() {
        let server = CatalogFetchError::Status {
            code: 503,
            body: String::new(),
        };
        let client_err = CatalogFetchError::Status {
            code: 404,
            body: String::new(),
        };
        assert!(server.is_retryable());
        assert!(!client_err.is_retryable());
        assert!(CatalogFetchError::Transport("refused".into()).is_retryable());
    }

    #[test]
    fn textual_content_types_are_detected() {
        assert!(is_textual("application/json; charset=utf-8"));
        assert!(is_textual("text/html"));
        assert!(is_textual("application/problem+json"));
        assert!(!is_textual("audio/wav"));
        assert!(!is_textual("application/octet-stream"));
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let long = "x".repeat(1000);
        let cut = snippet(&long);
        assert_eq!(cut.chars().count(), ERROR_SNIPPET_CHARS + 1);
        assert!(cut.ends_with('…'));
    }
}

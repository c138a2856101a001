use std::net::TcpListener;
use std::sync::atomic::Ordering;

use tempfile::{TempDir, tempdir};

use super::jobs::{CatalogLoadResult, JobMessage, SynthesisJobResult};
use super::*;
use crate::audio::AudioClip;
use crate::backend::{CatalogFetchError, SynthesisRequestError};
use crate::catalog::ModelEntry;
use crate::synthesis::{RequestId, SubmitError, SynthesisPhase};

/// Accepts connections into the backlog but never answers, so workers stay in flight.
fn silent_backend() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    (listener, url)
}

struct Harness {
    controller: TtsController,
    config_path: PathBuf,
    _dir: TempDir,
    _backend: TcpListener,
}

fn harness(user: Option<&str>) -> Harness {
    let dir = tempdir().unwrap();
    let (backend, url) = silent_backend();
    let mut settings = AppSettings::default();
    settings.backend.api_base_url = url;
    settings.backend.user = user.map(str::to_string);
    settings.backend.catalog_retry_attempts = 1;
    settings.backend.request_timeout_secs = 30;
    settings.download.directory = Some(dir.path().join("downloads"));
    let config_path = dir.path().join("config.toml");
    let controller = TtsController::with_effective_settings(
        settings.clone(),
        settings,
        Some(config_path.clone()),
    );
    Harness {
        controller,
        config_path,
        _dir: dir,
        _backend: backend,
    }
}

fn sample_catalog() -> Catalog {
    Catalog::new(vec![
        ModelEntry::new("en", "ds1", "m1"),
        ModelEntry::new("en", "ds1", "m2"),
        ModelEntry::new("fr", "ds2", "m3"),
        ModelEntry::new("multilingual", "multi-dataset", "your_tts"),
    ])
}

fn select(controller: &mut TtsController, language: &str, dataset: &str, model: &str) {
    controller.catalog = sample_catalog();
    controller.set_language(language);
    controller.set_dataset(dataset);
    controller.set_model_name(model);
}

fn finish(controller: &mut TtsController, request_id: RequestId, bytes: &[u8]) {
    controller
        .jobs
        .inject(JobMessage::SynthesisFinished(SynthesisJobResult {
            request_id,
            result: Ok(AudioClip::from_bytes(bytes.to_vec(), Some("audio/wav".into()))),
        }));
    controller.poll_background_jobs();
}

#[test]
fn missing_user_requires_login_without_loading() {
    let mut h = harness(None);
    h.controller.start_session();
    assert_eq!(h.controller.ui.catalog, CatalogPhase::LoginRequired);
    assert!(h.controller.ui.login.open);
    assert!(h.controller.jobs.pending_catalog().is_none());
}

#[test]
fn known_user_starts_catalog_load() {
    let mut h = harness(Some("alice"));
    h.controller.start_session();
    assert_eq!(h.controller.ui.catalog, CatalogPhase::Loading);
    assert!(h.controller.jobs.pending_catalog().is_some());
    assert_eq!(h.controller.ui.login.signed_in_as.as_deref(), Some("alice"));
}

#[test]
fn login_persists_user_and_loads() {
    let mut h = harness(None);
    h.controller.start_session();

    h.controller.submit_login("   ");
    assert!(h.controller.ui.login.last_error.is_some());
    assert!(h.controller.settings().backend.user.is_none());

    h.controller.submit_login(" bob ");
    assert!(!h.controller.ui.login.open);
    assert_eq!(h.controller.ui.catalog, CatalogPhase::Loading);
    let saved = config::load_from(&h.config_path).unwrap();
    assert_eq!(saved.backend.user.as_deref(), Some("bob"));
}

#[test]
fn catalog_result_populates_options() {
    let mut h = harness(Some("alice"));
    h.controller.start_session();
    let request_id = h.controller.jobs.pending_catalog().unwrap();
    h.controller
        .jobs
        .inject(JobMessage::CatalogLoaded(CatalogLoadResult {
            request_id,
            user: "alice".into(),
            result: Ok(sample_catalog().entries().to_vec()),
        }));
    h.controller.poll_background_jobs();

    assert_eq!(h.controller.ui.catalog, CatalogPhase::Ready { count: 4 });
    assert_eq!(
        h.controller.ui.generator.options.languages,
        vec!["en", "fr", "multilingual"]
    );
    assert_eq!(h.controller.ui.status.tone, StatusTone::Info);
}

#[test]
fn stale_catalog_result_is_ignored() {
    let mut h = harness(Some("alice"));
    h.controller.start_session();
    let first = h.controller.jobs.pending_catalog().unwrap();
    h.controller.retry_catalog();
    let second = h.controller.jobs.pending_catalog().unwrap();
    assert_ne!(first, second);

    h.controller
        .jobs
        .inject(JobMessage::CatalogLoaded(CatalogLoadResult {
            request_id: first,
            user: "alice".into(),
            result: Ok(vec![ModelEntry::new("xx", "old", "old")]),
        }));
    h.controller.poll_background_jobs();
    assert_eq!(h.controller.ui.catalog, CatalogPhase::Loading);
    assert!(h.controller.catalog().is_empty());

    h.controller
        .jobs
        .inject(JobMessage::CatalogLoaded(CatalogLoadResult {
            request_id: second,
            user: "alice".into(),
            result: Err(CatalogFetchError::Status {
                code: 500,
                body: "boom".into(),
            }),
        }));
    h.controller.poll_background_jobs();
    assert!(matches!(h.controller.ui.catalog, CatalogPhase::Failed { .. }));
    assert_eq!(h.controller.ui.status.tone, StatusTone::Error);
}

#[test]
fn cascade_resets_dependent_fields_and_toggles_upload() {
    let mut h = harness(Some("alice"));
    select(&mut h.controller, "en", "ds1", "m1");
    assert_eq!(h.controller.ui.generator.options.model_names, vec!["m1", "m2"]);
    assert!(!h.controller.ui.generator.show_upload);

    h.controller.set_language("fr");
    assert_eq!(h.controller.selection().dataset, "");
    assert_eq!(h.controller.selection().model_name, "");
    assert_eq!(h.controller.ui.generator.options.datasets, vec!["ds2"]);
    assert!(h.controller.ui.generator.options.model_names.is_empty());

    select(&mut h.controller, "multilingual", "multi-dataset", "your_tts");
    assert!(h.controller.ui.generator.show_upload);
}

#[test]
fn incomplete_submit_opens_dialog_and_sends_nothing() {
    let mut h = harness(Some("alice"));
    h.controller.catalog = sample_catalog();
    h.controller.set_language("en");
    let err = h.controller.submit().unwrap_err();
    assert!(matches!(err, SubmitError::Validation(_)));
    assert_eq!(
        h.controller.ui.validation_message.as_deref(),
        Some("Language, Dataset and Model name are required to generate the output speech.")
    );
    assert!(!h.controller.synthesis().is_pending());
    assert!(h.controller.jobs.synthesis_cancel_flag().is_none());

    h.controller.dismiss_validation();
    assert!(h.controller.ui.validation_message.is_none());
}

#[test]
fn double_submit_is_rejected() {
    let mut h = harness(Some("alice"));
    select(&mut h.controller, "en", "ds1", "m1");
    h.controller.ui.generator.text = "hello".into();
    h.controller.submit().unwrap();
    assert!(h.controller.ui.generator.submitting);
    assert!(matches!(
        h.controller.submit(),
        Err(SubmitError::AlreadyPending)
    ));
}

#[test]
fn stale_synthesis_result_is_ignored_and_retry_recovers() {
    let mut h = harness(Some("alice"));
    select(&mut h.controller, "en", "ds1", "m1");
    let first = h.controller.submit().unwrap();
    h.controller
        .jobs
        .inject(JobMessage::SynthesisFinished(SynthesisJobResult {
            request_id: first,
            result: Err(SynthesisRequestError::Status {
                code: 500,
                body: "engine down".into(),
            }),
        }));
    h.controller.poll_background_jobs();
    assert!(h.controller.ui.result.failure.is_some());
    assert!(!h.controller.ui.generator.submitting);

    let second = h.controller.retry().unwrap();
    finish(&mut h.controller, first, b"late");
    assert!(h.controller.synthesis().is_pending());

    finish(&mut h.controller, second, b"fresh");
    assert!(matches!(
        h.controller.synthesis().phase(),
        SynthesisPhase::Ready(_)
    ));
    assert_eq!(h.controller.ui.result.clip.as_ref().unwrap().bytes, 5);
    assert!(h.controller.ui.result.failure.is_none());
}

#[test]
fn new_result_releases_previous_clip() {
    let mut h = harness(Some("alice"));
    select(&mut h.controller, "en", "ds1", "m1");
    let first = h.controller.submit().unwrap();
    finish(&mut h.controller, first, b"first");
    let weak = h.controller.synthesis().result().unwrap().downgrade();

    let second = h.controller.submit().unwrap();
    assert!(h.controller.ui.result.clip.is_none());
    finish(&mut h.controller, second, b"second");
    assert!(weak.upgrade().is_none());
}

#[test]
fn download_writes_current_clip() {
    let mut h = harness(Some("alice"));
    select(&mut h.controller, "en", "ds1", "m1");
    assert!(h.controller.download_result().is_none());

    let id = h.controller.submit().unwrap();
    finish(&mut h.controller, id, b"RIFF-bytes");
    let path = h.controller.download_result().unwrap();
    assert!(path.ends_with(crate::download::DOWNLOAD_FILE_NAME));
    assert_eq!(std::fs::read(&path).unwrap(), b"RIFF-bytes");
    assert_eq!(
        h.controller.ui.status.open_folder.as_deref(),
        path.parent()
    );
}

#[test]
fn dropped_files_only_attach_for_personalized_model() {
    let mut h = harness(Some("alice"));
    select(&mut h.controller, "en", "ds1", "m1");
    let drop = || {
        vec![egui::DroppedFile {
            name: "me.wav".into(),
            bytes: Some(std::sync::Arc::from(&b"RIFF"[..])),
            ..Default::default()
        }]
    };
    h.controller.handle_dropped_files(drop());
    assert!(h.controller.voice_sample().is_none());

    select(&mut h.controller, "multilingual", "multi-dataset", "your_tts");
    h.controller.handle_dropped_files(drop());
    let info = h.controller.ui.generator.voice_sample.clone().unwrap();
    assert_eq!(info.file_name, "me.wav");
    assert_eq!(info.bytes, 4);

    h.controller.clear_voice_sample();
    assert!(h.controller.ui.generator.voice_sample.is_none());
}

#[test]
fn leaving_personalized_model_detaches_voice_sample() {
    let mut h = harness(Some("alice"));
    select(&mut h.controller, "multilingual", "multi-dataset", "your_tts");
    h.controller
        .attach_voice_sample(crate::synthesis::VoiceSample::new("me.wav", vec![1u8, 2, 3]));
    assert!(h.controller.ui.generator.voice_sample.is_some());

    select(&mut h.controller, "en", "ds1", "m1");
    assert!(h.controller.voice_sample().is_none());
    assert!(h.controller.ui.generator.voice_sample.is_none());
    assert!(!h.controller.ui.generator.show_upload);

    h.controller.submit().unwrap();
    let SynthesisPhase::Pending { request, .. } = h.controller.synthesis().phase() else {
        panic!("expected a pending request");
    };
    assert!(request.voice_sample.is_none());
}

#[test]
fn personalized_submit_carries_voice_sample() {
    let mut h = harness(Some("alice"));
    select(&mut h.controller, "multilingual", "multi-dataset", "your_tts");
    h.controller
        .attach_voice_sample(crate::synthesis::VoiceSample::new("me.wav", vec![1u8, 2, 3]));
    h.controller.submit().unwrap();
    let SynthesisPhase::Pending { request, .. } = h.controller.synthesis().phase() else {
        panic!("expected a pending request");
    };
    assert_eq!(request.voice_sample.as_ref().unwrap().file_name, "me.wav");
}

#[test]
fn reselecting_language_resets_descendants() {
    let mut h = harness(Some("alice"));
    select(&mut h.controller, "en", "ds1", "m1");
    h.controller.set_language("en");
    assert_eq!(h.controller.selection().language, "en");
    assert!(h.controller.selection().dataset.is_empty());
    assert!(h.controller.selection().model_name.is_empty());
    assert!(h.controller.ui.generator.options.model_names.is_empty());
}

#[test]
fn sign_out_resets_session() {
    let mut h = harness(Some("alice"));
    select(&mut h.controller, "en", "ds1", "m1");
    let id = h.controller.submit().unwrap();
    finish(&mut h.controller, id, b"audio");

    h.controller.sign_out();
    assert_eq!(h.controller.ui.catalog, CatalogPhase::LoginRequired);
    assert_eq!(h.controller.selection(), &crate::selection::Selection::default());
    assert!(h.controller.synthesis().result().is_none());
    assert!(h.controller.ui.result.clip.is_none());
    assert!(h.controller.catalog().is_empty());
    let saved = config::load_from(&h.config_path).unwrap();
    assert!(saved.backend.user.is_none());
}

#[test]
fn dropping_controller_cancels_in_flight_jobs() {
    let mut h = harness(Some("alice"));
    h.controller.start_session();
    select(&mut h.controller, "en", "ds1", "m1");
    h.controller.submit().unwrap();
    let synthesis = h.controller.jobs.synthesis_cancel_flag().unwrap();
    let catalog = h.controller.jobs.catalog_cancel_flag().unwrap();
    assert!(!synthesis.load(Ordering::Relaxed));

    drop(h.controller);
    assert!(synthesis.load(Ordering::Relaxed));
    assert!(catalog.load(Ordering::Relaxed));
}

#[test]
fn volume_is_clamped_and_persisted_on_commit() {
    let mut h = harness(Some("alice"));
    h.controller.set_volume(1.7);
    assert_eq!(h.controller.ui.result.volume, 1.0);
    h.controller.set_volume(0.25);
    h.controller.commit_volume();
    let saved = config::load_from(&h.config_path).unwrap();
    assert_eq!(saved.playback.volume, 0.25);
}

#[test]
fn invalid_backend_url_blocks_submit() {
    let mut settings = AppSettings::default();
    settings.backend.api_base_url = "not a url".into();
    settings.backend.user = Some("alice".into());
    let mut controller = TtsController::with_effective_settings(settings.clone(), settings, None);
    controller.start_session();
    assert!(matches!(controller.ui.catalog, CatalogPhase::Failed { .. }));
    select(&mut controller, "en", "ds1", "m1");
    assert!(matches!(
        controller.submit(),
        Err(SubmitError::BackendUnavailable(_))
    ));
    assert!(!controller.synthesis().is_pending());
}

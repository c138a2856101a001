use super::*;
use crate::download;

impl TtsController {
    /// Play the current result from the start, opening the output device on first use.
    pub fn play(&mut self) {
        let Some(clip) = self.synthesis.result().cloned() else {
            self.set_status("Nothing to play yet", StatusTone::Info);
            return;
        };
        let player = match self.ensure_player() {
            Ok(player) => player,
            Err(err) => {
                tracing::warn!("Audio output unavailable: {err}");
                self.set_status(err.to_string(), StatusTone::Error);
                return;
            }
        };
        let result = {
            let mut player = player.borrow_mut();
            player.set_clip(clip);
            player.play()
        };
        if let Err(err) = result {
            self.set_status(format!("Playback failed: {err}"), StatusTone::Error);
        }
        self.refresh_playback_ui();
    }

    pub fn stop(&mut self) {
        if let Some(player) = self.player.as_ref() {
            player.borrow_mut().stop();
        }
        self.refresh_playback_ui();
    }

    pub fn is_playing(&self) -> bool {
        self.player
            .as_ref()
            .is_some_and(|player| player.borrow().is_playing())
    }

    /// Change the volume of current and future playback.
    ///
    /// Call [`TtsController::commit_volume`] to persist it.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.ui.result.volume = volume;
        self.settings.playback.volume = volume;
        if let Some(player) = self.player.as_ref() {
            player.borrow_mut().set_volume(volume);
        }
    }

    /// Persist the current volume.
    pub fn commit_volume(&mut self) {
        let volume = self.ui.result.volume;
        self.update_settings(move |settings| settings.playback.volume = volume);
    }

    /// Save the current result as `yov-audio.wav` in the download folder.
    pub fn download_result(&mut self) -> Option<PathBuf> {
        let Some(clip) = self.synthesis.result().cloned() else {
            self.set_status("Nothing to download yet", StatusTone::Info);
            return None;
        };
        let saved = download::resolve_download_dir(self.settings.download.directory.as_deref())
            .and_then(|dir| download::save_clip(&clip, &dir));
        match saved {
            Ok(path) => {
                self.set_status(format!("Saved {}", path.display()), StatusTone::Info);
                self.ui.status.open_folder = path.parent().map(Path::to_path_buf);
                Some(path)
            }
            Err(err) => {
                tracing::error!("Download failed: {err}");
                self.set_status(format!("Download failed: {err}"), StatusTone::Error);
                None
            }
        }
    }

    /// Open the folder of the last download in the file manager.
    pub fn open_download_folder(&mut self) {
        let Some(folder) = self.ui.status.open_folder.clone() else {
            return;
        };
        if let Err(err) = open::that(&folder) {
            self.set_status(
                format!("Could not open {}: {err}", folder.display()),
                StatusTone::Warning,
            );
        }
    }

    /// Stop playback and drop every handle to the current clip outside the synthesis state.
    pub(super) fn release_clip(&mut self) {
        if let Some(player) = self.player.as_ref() {
            player.borrow_mut().clear();
        }
        self.ui.result.clip = None;
        self.refresh_playback_ui();
    }

    pub(super) fn refresh_playback_ui(&mut self) {
        let (playing, position, progress) = match self.player.as_ref() {
            Some(player) => {
                let player = player.borrow();
                (player.is_playing(), player.position(), player.progress())
            }
            None => (false, None, None),
        };
        self.ui.result.playing = playing;
        self.ui.result.position = position;
        self.ui.result.progress = progress;
    }

    fn ensure_player(&mut self) -> Result<Rc<RefCell<AudioPlayer>>, crate::audio::PlaybackError> {
        if let Some(player) = self.player.as_ref() {
            return Ok(Rc::clone(player));
        }
        let player = Rc::new(RefCell::new(AudioPlayer::new(self.settings.playback.volume)?));
        self.player = Some(Rc::clone(&player));
        Ok(player)
    }
}

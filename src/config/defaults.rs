pub(super) const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub(super) const DEFAULT_LOGIN_URL: &str = "http://localhost:3000/login";

pub(super) fn clamp_volume(volume: f32) -> f32 {
    if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        default_volume()
    }
}

pub(super) fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

pub(super) fn default_login_url() -> String {
    DEFAULT_LOGIN_URL.to_string()
}

pub(super) fn default_connect_timeout_secs() -> u64 {
    10
}

pub(super) fn default_request_timeout_secs() -> u64 {
    120
}

pub(super) fn default_catalog_retry_attempts() -> usize {
    3
}

pub(super) fn default_max_catalog_bytes() -> usize {
    4 * 1024 * 1024
}

pub(super) fn default_max_audio_bytes() -> usize {
    100 * 1024 * 1024
}

pub(super) fn default_volume() -> f32 {
    1.0
}

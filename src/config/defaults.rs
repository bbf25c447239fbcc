use super::constants::*;

pub(crate) fn log_level() -> Option<String> {
    Some("info".to_string())
}

pub(crate) fn log_file_path() -> String {
    LOG_FILE_PATH.to_string()
}

pub(crate) fn base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

pub(crate) fn request_timeout_secs() -> u64 {
    REQUEST_TIMEOUT_SECS
}

pub(crate) fn response_timeout_secs() -> u64 {
    RESPONSE_TIMEOUT_SECS
}

pub(crate) fn notice_duration_secs() -> u64 {
    NOTICE_DURATION_SECS
}

pub(crate) fn allowed_extensions() -> Vec<String> {
    ALLOWED_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

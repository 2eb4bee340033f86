//! Runtime configuration.
//!
//! Constants and environment-backed settings. `.env` files are loaded by
//! `main` via dotenv before any of the getters run.

/// Maximum number of subnets a single `split` call may produce.
pub const SPLIT_LIMIT: usize = 4096;

/// Maximum payload size accepted by the QR encoder (version 40, EC level L).
pub const QR_MAX_BYTES: usize = 2953;

/// Environment variable naming the render service base URL.
pub const ENV_RENDER_URL: &str = "OPS_TOOLBOX_RENDER_URL";

/// Environment variable overriding the render request timeout in seconds.
pub const ENV_HTTP_TIMEOUT: &str = "OPS_TOOLBOX_HTTP_TIMEOUT";

/// Environment variable naming the per-tool state directory.
pub const ENV_STATE_DIR: &str = "OPS_TOOLBOX_STATE_DIR";

/// Base URL of the Kroki-style render service.
pub fn render_url() -> String {
    std::env::var(ENV_RENDER_URL).unwrap_or_else(|_| "https://kroki.io".to_string())
}

/// Timeout applied to the single render fetch, in seconds.
pub fn http_timeout_secs() -> u64 {
    std::env::var(ENV_HTTP_TIMEOUT)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10)
}

/// Directory holding per-tool state files.
pub fn state_dir() -> String {
    std::env::var(ENV_STATE_DIR).unwrap_or_else(|_| ".toolbox_state".to_string())
}

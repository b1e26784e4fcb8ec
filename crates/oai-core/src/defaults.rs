//! Default values and environment variable names.

// ─── Endpoint ──────────────────────────────────────────────────────────────

/// Default base URI. The API version is appended without a separator.
pub const URI_BASE: &str = "https://api.openai.com/";

/// Default API version path segment.
pub const API_VERSION: &str = "v1";

/// Default request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

// ─── Headers ───────────────────────────────────────────────────────────────

/// Organization header name.
pub const ORGANIZATION_HEADER: &str = "OpenAI-Organization";

// ─── Environment variables ─────────────────────────────────────────────────

pub const ENV_ACCESS_TOKEN: &str = "OPENAI_ACCESS_TOKEN";
pub const ENV_ORGANIZATION_ID: &str = "OPENAI_ORGANIZATION_ID";
pub const ENV_URI_BASE: &str = "OPENAI_URI_BASE";
pub const ENV_API_VERSION: &str = "OPENAI_API_VERSION";
pub const ENV_REQUEST_TIMEOUT: &str = "OPENAI_REQUEST_TIMEOUT";

// ─── Config file ───────────────────────────────────────────────────────────

/// Directory under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "oai";

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

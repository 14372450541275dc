//! Client configuration.

use url::Url;

/// Default base URL of the Mambo TTS service.
pub const DEFAULT_BASE_URL: &str = "https://api.milorapart.top/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`MamboClient`](crate::MamboClient).
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the service.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            // The constant is a valid URL; this cannot fail.
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

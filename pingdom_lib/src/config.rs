//! Client configuration and the shared default transport.

use reqwest::Client as HttpClient;
use std::fmt;
use std::sync::OnceLock;

/// Endpoint used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.pingdom.com/api/2.1";

static DEFAULT_HTTP: OnceLock<HttpClient> = OnceLock::new();

/// Process-wide shared HTTP client, used when a config carries none.
///
/// No timeout is set; configure one on an injected client if needed.
/// Panics if the TLS backend cannot be initialized.
pub fn default_http_client() -> HttpClient {
    DEFAULT_HTTP
        .get_or_init(|| {
            HttpClient::builder()
                .user_agent(format!("pingdom-rs/{}", crate::VERSION))
                .build()
                .expect("reqwest client")
        })
        .clone()
}

/// Settings for [`crate::Client::with_config`].
///
/// Empty `account_email` and `base_url` strings count as unset.
#[derive(Clone, Default)]
pub struct ClientConfig {
    pub user: String,
    pub password: String,
    pub api_key: String,
    pub account_email: Option<String>,
    pub base_url: Option<String>,
    pub http_client: Option<HttpClient>,
}

impl ClientConfig {
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Act on behalf of a sub-account (multi-user authentication).
    pub fn with_account_email(mut self, email: impl Into<String>) -> Self {
        self.account_email = Some(email.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Inject the HTTP client used for round trips.
    pub fn with_http_client(mut self, http: HttpClient) -> Self {
        self.http_client = Some(http);
        self
    }

    pub(crate) fn account_email(&self) -> Option<&str> {
        self.account_email.as_deref().filter(|s| !s.is_empty())
    }

    pub(crate) fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("api_key", &"<redacted>")
            .field("account_email", &self.account_email)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

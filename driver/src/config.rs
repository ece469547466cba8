//! # Driver Configuration & Constants
//!
//! Two kinds of configuration live here:
//!
//! - **Protocol constants** — values fixed by the remote ledger's schema
//!   (transaction version, condition type, API prefix). Changing one of these
//!   produces transactions the ledger will reject, so they are not knobs.
//! - **[`ClientConfig`]** — where the ledger lives and how to authenticate.
//!   It is an explicit value handed to [`crate::api::TransactionsApi::new`],
//!   never process-global state.

use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Url;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Protocol constants
// ---------------------------------------------------------------------------

/// Transaction schema version written into every transaction.
pub const TRANSACTION_VERSION: &str = "2.0";

/// The only crypto-condition type this driver produces or accepts.
pub const CONDITION_TYPE: &str = "ed25519-sha-256";

/// Fixed cost of an ed25519-sha-256 condition.
pub const CONDITION_COST: u64 = 131_072;

/// Amount assigned to an output when the caller does not add one.
pub const DEFAULT_OUTPUT_AMOUNT: u64 = 1;

/// Path prefix of the ledger's HTTP API.
pub const API_PREFIX: &str = "/api/v1";

/// Transactions collection below [`API_PREFIX`].
pub const TRANSACTIONS_PATH: &str = "/transactions";

/// Request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Environment variables read by `ClientConfig::from_env`
// ---------------------------------------------------------------------------

pub const ENV_BASE_URL: &str = "TESSERA_BASE_URL";
pub const ENV_APP_ID: &str = "TESSERA_APP_ID";
pub const ENV_APP_KEY: &str = "TESSERA_APP_KEY";
pub const ENV_TIMEOUT_SECS: &str = "TESSERA_TIMEOUT_SECS";

/// Header names the ledger's hosted offering uses for credentials.
pub const APP_ID_HEADER: &str = "app_id";
pub const APP_KEY_HEADER: &str = "app_key";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The client cannot be used until its configuration is corrected.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// No base URL was set. There is deliberately no default host.
    #[error("ledger base URL is not configured")]
    MissingBaseUrl,

    #[error("invalid ledger base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// A credential token cannot be sent as an HTTP header.
    #[error("invalid credential header {name:?}: {reason}")]
    InvalidToken { name: String, reason: String },

    #[error("invalid timeout {value:?}: expected a positive number of seconds")]
    InvalidTimeout { value: String },
}

// ---------------------------------------------------------------------------
// SubmitMode
// ---------------------------------------------------------------------------

/// How long the ledger holds the HTTP response before answering a POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitMode {
    /// Answer once the transaction passes validation and is queued.
    Async,
    /// Answer once the transaction is checked against the mempool.
    Sync,
    /// Answer once the transaction is committed to a block.
    #[default]
    Commit,
}

impl SubmitMode {
    /// Value of the `mode` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmitMode::Async => "async",
            SubmitMode::Sync => "sync",
            SubmitMode::Commit => "commit",
        }
    }
}

impl fmt::Display for SubmitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Connection settings for a ledger node.
///
/// # Example
///
/// ```
/// use tessera_driver::config::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("https://test.ipdb.io")
///     .add_token("app_id", "2bbaf3ff")
///     .add_token("app_key", "c929b708177dcc8b9d58180082029b8d")
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     config.transactions_url(),
///     "https://test.ipdb.io/api/v1/transactions"
/// );
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    tokens: Vec<(HeaderName, HeaderValue)>,
    timeout: Duration,
    submit_mode: SubmitMode,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Reads the configuration from `TESSERA_*` environment variables.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::MissingBaseUrl`] if `TESSERA_BASE_URL` is unset,
    /// plus anything [`ClientConfigBuilder::build`] rejects.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a caller-supplied lookup, so
    /// configuration can come from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();
        if let Some(url) = lookup(ENV_BASE_URL) {
            builder = builder.base_url(url);
        }
        if let Some(app_id) = lookup(ENV_APP_ID) {
            builder = builder.add_token(APP_ID_HEADER, app_id);
        }
        if let Some(app_key) = lookup(ENV_APP_KEY) {
            builder = builder.add_token(APP_KEY_HEADER, app_key);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigurationError::InvalidTimeout { value: raw.clone() })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn submit_mode(&self) -> SubmitMode {
        self.submit_mode
    }

    /// Credential headers sent with every request.
    pub fn tokens(&self) -> &[(HeaderName, HeaderValue)] {
        &self.tokens
    }

    /// `{base}/api/v1/transactions`
    pub fn transactions_url(&self) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, TRANSACTIONS_PATH)
    }

    /// `{base}/api/v1/transactions/{id}`, with `id` percent-encoded as a
    /// single path segment.
    pub fn transaction_url(&self, id: &str) -> Result<Url, ConfigurationError> {
        let base = self.transactions_url();
        let mut url = Url::parse(&base).map_err(|e| ConfigurationError::InvalidBaseUrl {
            url: base.clone(),
            reason: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|()| ConfigurationError::InvalidBaseUrl {
                url: base.clone(),
                reason: "cannot carry a path".into(),
            })?
            .push(id);
        Ok(url)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Token values are credentials; print names only.
        let token_names: Vec<&str> = self.tokens.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("tokens", &token_names)
            .field("timeout", &self.timeout)
            .field("submit_mode", &self.submit_mode)
            .finish()
    }
}

/// Builder for [`ClientConfig`]. Validation happens in [`build`](Self::build).
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    tokens: Vec<(String, String)>,
    timeout: Option<Duration>,
    submit_mode: SubmitMode,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Adds a credential header. Adding the same name twice keeps the last value.
    pub fn add_token(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.tokens.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.tokens.push((name, value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn submit_mode(mut self, mode: SubmitMode) -> Self {
        self.submit_mode = mode;
        self
    }

    /// Validates and produces the configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::MissingBaseUrl`] — no (or a blank) base URL.
    /// - [`ConfigurationError::InvalidBaseUrl`] — unparseable, or not http(s).
    /// - [`ConfigurationError::InvalidToken`] — a token that is not a legal header.
    /// - [`ConfigurationError::InvalidTimeout`] — a zero timeout.
    pub fn build(self) -> Result<ClientConfig, ConfigurationError> {
        let raw_url = self
            .base_url
            .map(|u| u.trim().to_owned())
            .filter(|u| !u.is_empty())
            .ok_or(ConfigurationError::MissingBaseUrl)?;

        let parsed = Url::parse(&raw_url).map_err(|e| ConfigurationError::InvalidBaseUrl {
            url: raw_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigurationError::InvalidBaseUrl {
                url: raw_url,
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
            });
        }

        let tokens = self
            .tokens
            .into_iter()
            .map(|(name, value)| {
                let header = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                    ConfigurationError::InvalidToken {
                        name: name.clone(),
                        reason: e.to_string(),
                    }
                })?;
                let mut header_value = HeaderValue::from_str(&value).map_err(|e| {
                    ConfigurationError::InvalidToken {
                        name: name.clone(),
                        reason: e.to_string(),
                    }
                })?;
                header_value.set_sensitive(true);
                Ok((header, header_value))
            })
            .collect::<Result<Vec<_>, ConfigurationError>>()?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigurationError::InvalidTimeout {
                value: format!("{:?}", timeout),
            });
        }

        Ok(ClientConfig {
            base_url: raw_url.trim_end_matches('/').to_owned(),
            tokens,
            timeout,
            submit_mode: self.submit_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_base_url_is_a_configuration_error() {
        assert!(matches!(
            ClientConfig::builder().build(),
            Err(ConfigurationError::MissingBaseUrl)
        ));
        assert!(matches!(
            ClientConfig::builder().base_url("   ").build(),
            Err(ConfigurationError::MissingBaseUrl)
        ));
    }

    #[test]
    fn invalid_base_urls_are_rejected() {
        assert!(matches!(
            ClientConfig::builder().base_url("not a url").build(),
            Err(ConfigurationError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ClientConfig::builder().base_url("ftp://ledger.example").build(),
            Err(ConfigurationError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let config = ClientConfig::builder()
            .base_url("http://localhost:9984/")
            .build()
            .unwrap();
        assert_eq!(config.base_url(), "http://localhost:9984");
        assert_eq!(
            config.transaction_url("abc").unwrap().as_str(),
            "http://localhost:9984/api/v1/transactions/abc"
        );
    }

    #[test]
    fn transaction_id_stays_one_path_segment() {
        let config = ClientConfig::builder()
            .base_url("http://localhost:9984")
            .build()
            .unwrap();
        let url = config.transaction_url("a/../b?mode=x#frag").unwrap();
        assert_eq!(url.path_segments().unwrap().count(), 4);
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
        assert!(url.as_str().ends_with("/api/v1/transactions/a%2F..%2Fb%3Fmode=x%23frag"));
    }

    #[test]
    fn tokens_become_sensitive_headers() {
        let config = ClientConfig::builder()
            .base_url("http://localhost:9984")
            .add_token("app_id", "first")
            .add_token("app_id", "second")
            .add_token("app_key", "secret")
            .build()
            .unwrap();

        assert_eq!(config.tokens().len(), 2);
        let (name, value) = &config.tokens()[0];
        assert_eq!(name.as_str(), "app_id");
        assert_eq!(value.to_str().unwrap(), "second");
        assert!(value.is_sensitive());

        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("app_key"));
    }

    #[test]
    fn illegal_header_is_rejected() {
        let err = ClientConfig::builder()
            .base_url("http://localhost:9984")
            .add_token("app id", "x")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidToken { .. }));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(matches!(
            ClientConfig::builder()
                .base_url("http://localhost:9984")
                .timeout(Duration::ZERO)
                .build(),
            Err(ConfigurationError::InvalidTimeout { .. })
        ));
    }

    #[test]
    fn lookup_loading() {
        let vars: HashMap<&str, &str> = [
            (ENV_BASE_URL, "https://test.ipdb.io"),
            (ENV_APP_ID, "2bbaf3ff"),
            (ENV_APP_KEY, "c929b708177dcc8b9d58180082029b8d"),
            (ENV_TIMEOUT_SECS, "5"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.base_url(), "https://test.ipdb.io");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.tokens().len(), 2);
        assert_eq!(config.submit_mode(), SubmitMode::Commit);
    }

    #[test]
    fn lookup_without_base_url_fails_fast() {
        let result = ClientConfig::from_lookup(|k| (k == ENV_APP_ID).then(|| "id".to_string()));
        assert!(matches!(result, Err(ConfigurationError::MissingBaseUrl)));
    }

    #[test]
    fn lookup_with_bad_timeout_fails() {
        let result = ClientConfig::from_lookup(|k| match k {
            ENV_BASE_URL => Some("http://localhost:9984".to_string()),
            ENV_TIMEOUT_SECS => Some("soon".to_string()),
            _ => None,
        });
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidTimeout { .. })
        ));
    }
}

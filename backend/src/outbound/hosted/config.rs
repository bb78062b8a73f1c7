//! Connection settings for the hosted backend.
//!
//! The URL and key come from the environment rather than the layered server
//! configuration so the key never lands in a config file or CLI history.

use mockable::Env;
use url::Url;
use zeroize::Zeroizing;

/// Variable holding the backend base URL.
pub const BACKEND_URL_ENV: &str = "MAILROOM_BACKEND_URL";
/// Variable holding the backend API key.
pub const BACKEND_KEY_ENV: &str = "MAILROOM_BACKEND_KEY";

/// Validated base URL and API key.
#[derive(Clone)]
pub struct HostedBackendSettings {
    url: Url,
    key: Zeroizing<String>,
}

/// Raised when the backend connection cannot be configured.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostedConfigError {
    /// One or more required variables are unset or blank.
    #[error("missing required environment variables: {}", missing.join(", "))]
    Missing { missing: Vec<&'static str> },
    /// The URL variable does not hold an absolute http(s) URL.
    #[error("invalid value for {BACKEND_URL_ENV}: {reason}")]
    InvalidUrl { reason: String },
}

impl HostedConfigError {
    /// Names of the variables that need attention.
    pub fn variables(&self) -> Vec<&'static str> {
        match self {
            Self::Missing { missing } => missing.clone(),
            Self::InvalidUrl { .. } => vec![BACKEND_URL_ENV],
        }
    }
}

impl HostedBackendSettings {
    /// Build settings from explicit values.
    ///
    /// # Examples
    /// ```
    /// use mailroom::outbound::hosted::HostedBackendSettings;
    ///
    /// let settings = HostedBackendSettings::new("https://abc.example.co", "anon-key")
    ///     .expect("valid settings");
    /// assert_eq!(settings.url().as_str(), "https://abc.example.co/");
    /// ```
    pub fn new(url: &str, key: impl Into<String>) -> Result<Self, HostedConfigError> {
        let url = Url::parse(url.trim()).map_err(|err| HostedConfigError::InvalidUrl {
            reason: err.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(HostedConfigError::InvalidUrl {
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(Self {
            url,
            key: Zeroizing::new(key.into()),
        })
    }

    /// Read both variables, reporting every missing one at once.
    pub fn from_env<E: Env>(env: &E) -> Result<Self, HostedConfigError> {
        let url = non_blank(env, BACKEND_URL_ENV);
        let key = non_blank(env, BACKEND_KEY_ENV);
        match (url, key) {
            (Some(url), Some(key)) => Self::new(&url, key),
            (url, key) => {
                let missing = [(BACKEND_URL_ENV, url.is_none()), (BACKEND_KEY_ENV, key.is_none())]
                    .into_iter()
                    .filter_map(|(name, absent)| absent.then_some(name))
                    .collect();
                Err(HostedConfigError::Missing { missing })
            }
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }
}

impl std::fmt::Debug for HostedBackendSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedBackendSettings")
            .field("url", &self.url.as_str())
            .field("key", &"<redacted>")
            .finish()
    }
}

fn non_blank<E: Env>(env: &E, name: &str) -> Option<String> {
    env.string(name).filter(|value| !value.trim().is_empty())
}

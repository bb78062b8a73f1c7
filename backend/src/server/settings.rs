//! Runtime settings loaded via OrthoConfig.
//!
//! Non-secret knobs come from `MAILROOM_*` environment variables, CLI flags
//! or a config file. Secrets (backend key, admin digest, session key) are
//! read separately through `mockable::Env`.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};
use url::Url;

use mailroom::domain::DEFAULT_SENDING_DELAY;
use mailroom::outbound::hosted::{
    DEFAULT_BUCKET, DEFAULT_REQUEST_TIMEOUT, DEFAULT_TABLE, HostedResources,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ADMIN_USERNAME: &str = "santa";

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MAILROOM")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Letters table name.
    pub table: Option<String>,
    /// Photo bucket name.
    pub bucket: Option<String>,
    /// Pause between a stored letter and the `sent` answer, in milliseconds.
    pub sending_delay_ms: Option<u64>,
    /// Hosted backend request timeout, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Username of the admin account.
    pub admin_username: Option<String>,
    /// Origins allowed to open the live board. The environment form is
    /// comma separated.
    #[serde(default, deserialize_with = "one_or_many")]
    pub allowed_origins: Option<Vec<String>>,
    /// Also allow `http://localhost:<port>` origins.
    #[ortho_config(default = false)]
    pub allow_localhost_origin: bool,
}

/// A lone environment value arrives as a string, a comma-separated one as a
/// sequence.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<OneOrMany>::deserialize(deserializer)?.map(|value| match value {
            OneOrMany::One(origin) => vec![origin],
            OneOrMany::Many(origins) => origins,
        }),
    )
}

/// Raised for settings that are present but unusable.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid allowed origin '{value}': {source}")]
    Origin {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn resources(&self) -> HostedResources {
        HostedResources {
            table: self.table.clone().unwrap_or_else(|| DEFAULT_TABLE.to_owned()),
            bucket: self.bucket.clone().unwrap_or_else(|| DEFAULT_BUCKET.to_owned()),
            request_timeout: self
                .request_timeout_secs
                .map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs),
        }
    }

    pub fn sending_delay(&self) -> Duration {
        self.sending_delay_ms
            .map_or(DEFAULT_SENDING_DELAY, Duration::from_millis)
    }

    pub fn admin_username(&self) -> &str {
        self.admin_username
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_USERNAME)
    }

    pub fn allowed_origins(&self) -> Result<Vec<Url>, SettingsError> {
        self.allowed_origins
            .iter()
            .flatten()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(|value| {
                Url::parse(value).map_err(|source| SettingsError::Origin {
                    value: value.to_owned(),
                    source,
                })
            })
            .collect()
    }
}

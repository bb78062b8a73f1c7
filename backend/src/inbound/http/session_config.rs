//! Cookie settings for the admin session.
//!
//! Read from `MAILROOM_SESSION_*` variables. Debug builds substitute
//! defaults (logging each one); release builds insist on every variable and
//! on a signing key of at least [`MIN_KEY_BYTES`].

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroizing;

pub const KEY_FILE_ENV: &str = "MAILROOM_SESSION_KEY_FILE";
pub const COOKIE_SECURE_ENV: &str = "MAILROOM_SESSION_COOKIE_SECURE";
pub const SAMESITE_ENV: &str = "MAILROOM_SESSION_SAMESITE";
pub const ALLOW_EPHEMERAL_ENV: &str = "MAILROOM_SESSION_ALLOW_EPHEMERAL";

/// Shortest signing key a release build accepts.
pub const MIN_KEY_BYTES: usize = 64;

const DEFAULT_KEY_FILE: &str = "/var/run/secrets/mailroom_session_key";

/// Whether missing settings are fatal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_strict(self) -> bool {
        self == Self::Release
    }
}

/// What the session middleware needs.
#[derive(Clone)]
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("{var} is not set")]
    MissingEnv { var: &'static str },
    #[error("{var}='{value}' is not one of {accepted}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        accepted: &'static str,
    },
    #[error("cannot read session key {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key {path} has {length} bytes; at least {min} are required", min = MIN_KEY_BYTES)]
    KeyTooShort { path: PathBuf, length: usize },
    #[error("MAILROOM_SESSION_SAMESITE=None needs MAILROOM_SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("MAILROOM_SESSION_ALLOW_EPHEMERAL cannot be enabled in a release build")]
    EphemeralNotAllowed,
}

/// Resolve the session cookie settings.
///
/// # Examples
///
/// ```rust
/// use mailroom::inbound::http::session_config::{BuildMode, session_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|var| match var {
///     "MAILROOM_SESSION_KEY_FILE" => Some("/nonexistent/mailroom-key".to_owned()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings_from_env(
    env: &impl Env,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let source = Source { env, mode };

    let cookie_secure = source.flag(COOKIE_SECURE_ENV, true)?;
    let same_site = source.same_site(cookie_secure)?;
    let ephemeral = source.flag(ALLOW_EPHEMERAL_ENV, false)?;
    if ephemeral && mode.is_strict() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }

    Ok(SessionSettings {
        key: source.key(ephemeral)?,
        cookie_secure,
        same_site,
    })
}

struct Source<'a, E> {
    env: &'a E,
    mode: BuildMode,
}

impl<E: Env> Source<'_, E> {
    fn or_default<T>(
        &self,
        default: T,
        problem: SessionConfigError,
    ) -> Result<T, SessionConfigError> {
        if self.mode.is_strict() {
            return Err(problem);
        }
        warn!(problem = %problem, "using default session setting");
        Ok(default)
    }

    fn flag(&self, var: &'static str, default: bool) -> Result<bool, SessionConfigError> {
        let Some(value) = self.env.string(var) else {
            return self.or_default(default, SessionConfigError::MissingEnv { var });
        };
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            _ => self.or_default(
                default,
                SessionConfigError::InvalidEnv {
                    var,
                    value,
                    accepted: "1, 0, true, false, yes, no",
                },
            ),
        }
    }

    fn same_site(&self, cookie_secure: bool) -> Result<SameSite, SessionConfigError> {
        let default = if self.mode.is_strict() {
            SameSite::Strict
        } else {
            SameSite::Lax
        };
        let Some(value) = self.env.string(SAMESITE_ENV) else {
            return self.or_default(default, SessionConfigError::MissingEnv { var: SAMESITE_ENV });
        };
        let parsed = match value.trim().to_ascii_lowercase().as_str() {
            "strict" => SameSite::Strict,
            "lax" => SameSite::Lax,
            "none" => SameSite::None,
            _ => {
                return self.or_default(
                    default,
                    SessionConfigError::InvalidEnv {
                        var: SAMESITE_ENV,
                        value,
                        accepted: "Strict, Lax, None",
                    },
                );
            }
        };
        if parsed == SameSite::None && !cookie_secure {
            return self.or_default(parsed, SessionConfigError::InsecureSameSiteNone);
        }
        Ok(parsed)
    }

    fn key(&self, ephemeral: bool) -> Result<Key, SessionConfigError> {
        let path: PathBuf = self
            .env
            .string(KEY_FILE_ENV)
            .unwrap_or_else(|| DEFAULT_KEY_FILE.to_owned())
            .into();
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => Zeroizing::new(bytes),
            Err(source) if ephemeral || !self.mode.is_strict() => {
                warn!(path = %path.display(), error = %source, "session key unreadable; cookies will not survive a restart");
                return Ok(Key::generate());
            }
            Err(source) => return Err(SessionConfigError::KeyRead { path, source }),
        };
        if self.mode.is_strict() && bytes.len() < MIN_KEY_BYTES {
            return Err(SessionConfigError::KeyTooShort {
                path,
                length: bytes.len(),
            });
        }
        Ok(Key::derive_from(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockEnv;
    use rstest::{fixture, rstest};
    use std::collections::HashMap;
    use std::io::Write;

    const MISSING_KEY: &str = "/nonexistent/mailroom-session-key";

    fn env_with(vars: &[(&'static str, &str)]) -> MockEnv {
        let vars: HashMap<&'static str, String> =
            vars.iter().map(|(k, v)| (*k, (*v).to_owned())).collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .returning(move |var| vars.get(var).cloned());
        env
    }

    #[fixture]
    fn long_key() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp key file");
        file.write_all(&[b'r'; MIN_KEY_BYTES]).expect("write key");
        file
    }

    fn release(vars: &[(&'static str, &str)]) -> Result<SessionSettings, SessionConfigError> {
        session_settings_from_env(&env_with(vars), BuildMode::Release)
    }

    #[rstest]
    fn release_accepts_a_full_configuration(long_key: tempfile::NamedTempFile) {
        let path = long_key.path().to_string_lossy().into_owned();
        let settings = release(&[
            (KEY_FILE_ENV, &path),
            (COOKIE_SECURE_ENV, "yes"),
            (SAMESITE_ENV, "strict"),
            (ALLOW_EPHEMERAL_ENV, "0"),
        ])
        .expect("complete configuration");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Strict);
    }

    #[test]
    fn debug_fills_in_every_default() {
        let env = env_with(&[(KEY_FILE_ENV, MISSING_KEY)]);
        let settings = session_settings_from_env(&env, BuildMode::Debug).expect("defaults");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[test]
    fn debug_tolerates_typos() {
        let env = env_with(&[
            (KEY_FILE_ENV, MISSING_KEY),
            (COOKIE_SECURE_ENV, "nope"),
            (SAMESITE_ENV, "loose"),
        ]);
        let settings = session_settings_from_env(&env, BuildMode::Debug).expect("defaults");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[rstest]
    #[case::secure(&[], COOKIE_SECURE_ENV)]
    #[case::same_site(&[(COOKIE_SECURE_ENV, "1")], SAMESITE_ENV)]
    #[case::ephemeral(&[(COOKIE_SECURE_ENV, "1"), (SAMESITE_ENV, "Lax")], ALLOW_EPHEMERAL_ENV)]
    fn release_names_the_first_missing_variable(
        #[case] vars: &[(&'static str, &str)],
        #[case] expected: &str,
    ) {
        let Err(SessionConfigError::MissingEnv { var }) = release(vars) else {
            panic!("expected {expected} to be reported missing");
        };
        assert_eq!(var, expected);
    }

    #[test]
    fn release_rejects_an_unparseable_flag() {
        assert!(matches!(
            release(&[(COOKIE_SECURE_ENV, "sometimes")]),
            Err(SessionConfigError::InvalidEnv { var: COOKIE_SECURE_ENV, .. })
        ));
    }

    #[test]
    fn release_rejects_same_site_none_over_http() {
        assert!(matches!(
            release(&[(COOKIE_SECURE_ENV, "0"), (SAMESITE_ENV, "None")]),
            Err(SessionConfigError::InsecureSameSiteNone)
        ));
    }

    #[test]
    fn release_refuses_ephemeral_keys() {
        assert!(matches!(
            release(&[
                (COOKIE_SECURE_ENV, "1"),
                (SAMESITE_ENV, "Strict"),
                (ALLOW_EPHEMERAL_ENV, "true"),
            ]),
            Err(SessionConfigError::EphemeralNotAllowed)
        ));
    }

    #[test]
    fn release_refuses_a_short_key() {
        let mut short = tempfile::NamedTempFile::new().expect("temp key file");
        short.write_all(b"too-short").expect("write key");
        let path = short.path().to_string_lossy().into_owned();
        assert!(matches!(
            release(&[
                (KEY_FILE_ENV, &path),
                (COOKIE_SECURE_ENV, "1"),
                (SAMESITE_ENV, "Lax"),
                (ALLOW_EPHEMERAL_ENV, "0"),
            ]),
            Err(SessionConfigError::KeyTooShort { length: 9, .. })
        ));
    }

    #[test]
    fn release_refuses_an_unreadable_key() {
        assert!(matches!(
            release(&[
                (KEY_FILE_ENV, MISSING_KEY),
                (COOKIE_SECURE_ENV, "1"),
                (SAMESITE_ENV, "Lax"),
                (ALLOW_EPHEMERAL_ENV, "no"),
            ]),
            Err(SessionConfigError::KeyRead { .. })
        ));
    }
}

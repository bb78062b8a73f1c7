//! Admin login checked against an externally configured account.
//!
//! The password is never configured in clear: the environment carries its
//! SHA-256 digest as hex and logins are compared digest to digest.

use async_trait::async_trait;
use mockable::Env;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::LoginService;
use crate::domain::{AdminId, Error, LoginCredentials};

/// Variable holding the hex SHA-256 digest of the admin password.
pub const ADMIN_PASSWORD_DIGEST_ENV: &str = "MAILROOM_ADMIN_PASSWORD_SHA256";

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Single admin account configured outside the code.
pub struct ConfiguredAdminLogin {
    account: Option<Account>,
}

struct Account {
    username: String,
    digest: Zeroizing<[u8; 32]>,
}

impl Account {
    /// Both fields are compared in constant time and without short-circuit.
    fn matches(&self, username: &str, password: &str) -> bool {
        let supplied = Sha256::digest(password.as_bytes());
        let user = self.username.as_bytes().ct_eq(username.as_bytes());
        let digest = supplied.as_slice().ct_eq(self.digest.as_slice());
        (user & digest).into()
    }
}

/// Raised for a digest that is not 64 hex characters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{ADMIN_PASSWORD_DIGEST_ENV} must be 64 hex characters")]
pub struct AdminDigestError;

impl ConfiguredAdminLogin {
    /// Accept `username` with any password whose SHA-256 is `digest_hex`.
    pub fn new(username: impl Into<String>, digest_hex: &str) -> Result<Self, AdminDigestError> {
        let mut digest = Zeroizing::new([0_u8; 32]);
        hex::decode_to_slice(digest_hex.trim(), digest.as_mut_slice())
            .map_err(|_| AdminDigestError)?;
        Ok(Self {
            account: Some(Account {
                username: username.into(),
                digest,
            }),
        })
    }

    /// Reject every login.
    pub fn disabled() -> Self {
        Self { account: None }
    }

    /// Read the digest from the environment. A missing digest disables
    /// admin access rather than failing startup.
    pub fn from_env<E: Env>(env: &E, username: &str) -> Result<Self, AdminDigestError> {
        match env.string(ADMIN_PASSWORD_DIGEST_ENV) {
            Some(digest) if !digest.trim().is_empty() => Self::new(username, &digest),
            _ => {
                warn!("{ADMIN_PASSWORD_DIGEST_ENV} not set; admin login disabled");
                Ok(Self::disabled())
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.account.is_some()
    }
}

#[async_trait]
impl LoginService for ConfiguredAdminLogin {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AdminId, Error> {
        let Some(account) = &self.account else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        if !account.matches(credentials.username(), credentials.password()) {
            warn!(username = credentials.username(), "admin login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        info!(username = credentials.username(), "admin logged in");
        AdminId::new(account.username.as_str())
            .map_err(|err| Error::internal(format!("invalid admin account: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use mockable::MockEnv;
    use rstest::{fixture, rstest};

    fn digest_of(password: &str) -> String {
        hex::encode(Sha256::digest(password.as_bytes()))
    }

    #[fixture]
    fn login() -> ConfiguredAdminLogin {
        ConfiguredAdminLogin::new("santa", &digest_of("rudolph")).expect("valid digest")
    }

    async fn attempt(
        login: &ConfiguredAdminLogin,
        user: &str,
        pass: &str,
    ) -> Result<AdminId, Error> {
        let creds = LoginCredentials::try_from_parts(user, pass).expect("credentials shape");
        login.authenticate(&creds).await
    }

    #[rstest]
    #[tokio::test]
    async fn accepts_the_configured_account(login: ConfiguredAdminLogin) {
        let admin = attempt(&login, "santa", "rudolph").await.expect("login succeeds");
        assert_eq!(admin.as_ref(), "santa");
    }

    #[rstest]
    #[case::same_digest(0x00, true)]
    #[case::last_byte_differs(0x01, false)]
    fn account_compares_every_digest_byte(#[case] flip: u8, #[case] expected: bool) {
        let mut digest = [0_u8; 32];
        digest.copy_from_slice(&Sha256::digest(b"rudolph"));
        digest[31] ^= flip;
        let account = Account {
            username: "santa".to_owned(),
            digest: Zeroizing::new(digest),
        };

        assert_eq!(account.matches("santa", "rudolph"), expected);
        assert!(!account.matches("sant", "rudolph"));
    }

    #[rstest]
    #[case("santa", "dasher")]
    #[case("grinch", "rudolph")]
    #[tokio::test]
    async fn rejects_anything_else(
        login: ConfiguredAdminLogin,
        #[case] user: &str,
        #[case] pass: &str,
    ) {
        let err = attempt(&login, user, pass).await.expect_err("login fails");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn missing_digest_disables_login() {
        let mut env = MockEnv::new();
        env.expect_string().returning(|_| None);

        let login = ConfiguredAdminLogin::from_env(&env, "santa").expect("loads");

        assert!(!login.is_enabled());
        let err = attempt(&login, "santa", "rudolph").await.expect_err("disabled");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[test]
    fn digest_is_read_from_the_environment() {
        let digest = digest_of("rudolph").to_uppercase();
        let mut env = MockEnv::new();
        env.expect_string()
            .returning(move |name| (name == ADMIN_PASSWORD_DIGEST_ENV).then(|| digest.clone()));

        let login = ConfiguredAdminLogin::from_env(&env, "santa").expect("loads");

        assert!(login.is_enabled());
    }

    #[rstest]
    #[case("not-hex")]
    #[case("abcd")]
    fn malformed_digests_are_rejected(#[case] digest: &str) {
        assert!(ConfiguredAdminLogin::new("santa", digest).is_err());
    }
}

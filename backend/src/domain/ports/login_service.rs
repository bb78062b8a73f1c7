//! Driving port for admin authentication.
//!
//! Handlers call this port to check credentials without knowing where the
//! admin account is configured.

use async_trait::async_trait;

use crate::domain::{AdminId, Error, LoginCredentials};

/// Authenticates admin credentials.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated admin.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AdminId, Error>;
}

/// Deterministic authenticator for tests: `elf` / `hohoho`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AdminId, Error> {
        if credentials.username() == "elf" && credentials.password() == "hohoho" {
            AdminId::new("elf")
                .map_err(|err| Error::internal(format!("invalid fixture admin: {err}")))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}

//! Admin authentication primitives.
//!
//! Access to the admin board is an external concern: credentials are checked
//! by a [`LoginService`](crate::domain::ports::LoginService) and the result is
//! kept in a session. Nothing here compares against a secret.

use std::fmt;

use zeroize::Zeroizing;

/// Why a login form was rejected before any credential check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    #[error("enter a username")]
    EmptyUsername,
    #[error("enter a password")]
    EmptyPassword,
}

/// A username and password as typed into the admin login form.
///
/// The username is trimmed; the password is kept byte for byte and wiped on
/// drop.
///
/// ```
/// use mailroom::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" elf ", "hohoho").expect("both filled in");
/// assert_eq!(creds.username(), "elf");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        match (username.trim(), password) {
            ("", _) => Err(LoginValidationError::EmptyUsername),
            (_, "") => Err(LoginValidationError::EmptyPassword),
            (username, password) => Ok(Self {
                username: username.to_owned(),
                password: Zeroizing::new(password.to_owned()),
            }),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Raised when an admin identifier is blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("admin id must not be empty")]
pub struct AdminIdError;

/// Identity of an authenticated admin, as stored in the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdminId(String);

impl AdminId {
    /// Validate and wrap an admin identifier.
    pub fn new(raw: impl Into<String>) -> Result<Self, AdminIdError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AdminIdError);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for AdminId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdminId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Operator sign-in and the persisted session token.
//!
//! The token is opaque: it gates which commands may run and is attached as a
//! bearer token to every backend request. It is stored in a single file that
//! `logout` removes.

use std::fmt::{self, Write as _};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use kaushalya_core::AdminCredentials;
use subtle::ConstantTimeEq;

use crate::error::AuthError;

/// A signed-in operator session.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Fresh random 256-bit token, hex encoded.
    #[must_use]
    pub fn generate() -> Self {
        let bytes: [u8; 32] = rand::random();
        let token = bytes.iter().fold(String::with_capacity(64), |mut out, b| {
            let _ = write!(out, "{b:02x}");
            out
        });
        Self { token }
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[redacted]")
            .finish()
    }
}

/// Checks `email`/`password` against the configured admin account.
///
/// Both halves are compared in constant time and both are always compared.
///
/// # Errors
///
/// - [`AuthError::LoginDisabled`] when no admin account is configured.
/// - [`AuthError::InvalidCredentials`] when either half does not match.
pub fn login(
    configured: Option<&AdminCredentials>,
    email: &str,
    password: &str,
) -> Result<Session, AuthError> {
    let Some(admin) = configured else {
        return Err(AuthError::LoginDisabled);
    };
    let email_ok = admin.email.trim().as_bytes().ct_eq(email.trim().as_bytes());
    let password_ok = admin.password.as_bytes().ct_eq(password.as_bytes());
    if bool::from(email_ok & password_ok) {
        tracing::info!(email = %admin.email, "admin signed in");
        Ok(Session::generate())
    } else {
        tracing::warn!("rejected admin sign-in");
        Err(AuthError::InvalidCredentials)
    }
}

/// File-backed session storage.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored session. A missing or blank file means signed out.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Io`] if the file exists but cannot be read.
    pub fn load(&self) -> Result<Option<Session>, AuthError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| Session::new(token)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// Like [`SessionStore::load`] but a missing session is an error.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotSignedIn`] when there is no stored session.
    pub fn require(&self) -> Result<Session, AuthError> {
        self.load()?.ok_or(AuthError::NotSignedIn)
    }

    /// Writes the token, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Io`] on filesystem failure.
    pub fn save(&self, session: &Session) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        std::fs::write(&self.path, session.token()).map_err(|e| self.io_error(e))
    }

    /// Removes the stored session. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Io`] if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<bool, AuthError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> AuthError {
        AuthError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

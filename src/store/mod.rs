//! Durable credential storage.
//!
//! The store holds three named values: the access token, the refresh token and
//! the serialized user record. The gateway reads the tokens on every call and
//! rewrites or clears them during refresh; the auth feature writes all three on
//! login and signup.

pub mod file;
pub mod memory;

pub use self::file::FileStore;
pub use self::memory::MemoryStore;

use crate::features::auth::types::User;
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Names of the values kept in a credential store.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum CredentialKey {
    AccessToken,
    RefreshToken,
    User,
}

impl CredentialKey {
    pub const ALL: [Self; 3] = [Self::AccessToken, Self::RefreshToken, Self::User];

    /// Key as written to durable storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "accessToken",
            Self::RefreshToken => "refreshToken",
            Self::User => "user",
        }
    }
}

/// Process-wide key-value storage for the session credentials.
pub trait CredentialStore: Send + Sync {
    /// # Errors
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: CredentialKey) -> Result<Option<String>>;

    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, key: CredentialKey, value: &str) -> Result<()>;

    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    fn remove(&self, key: CredentialKey) -> Result<()>;

    /// Writes several values as one update. Stores that can replace their
    /// contents atomically override this so a failed write leaves the previous
    /// values in place.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    fn set_all(&self, entries: &[(CredentialKey, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.set(*key, value)?;
        }
        Ok(())
    }

    /// Removes every credential.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    fn clear(&self) -> Result<()> {
        for key in CredentialKey::ALL {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// A complete session: the signed-in user and both tokens.
#[derive(Clone)]
pub struct Credentials {
    pub user: User,
    pub access_token: SecretString,
    pub refresh_token: SecretString,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("access_token", &"***")
            .field("refresh_token", &"***")
            .finish()
    }
}

/// Stores a new session, replacing whatever was there.
///
/// # Errors
/// Returns an error if the user cannot be encoded or the store write fails.
pub fn save_credentials(store: &dyn CredentialStore, credentials: &Credentials) -> Result<()> {
    let user = serde_json::to_string(&credentials.user).context("failed to encode user record")?;

    store.set_all(&[
        (CredentialKey::User, user.as_str()),
        (
            CredentialKey::AccessToken,
            credentials.access_token.expose_secret(),
        ),
        (
            CredentialKey::RefreshToken,
            credentials.refresh_token.expose_secret(),
        ),
    ])
}

/// Loads the full session, or `None` when any part is missing.
///
/// # Errors
/// Returns an error if the store cannot be read or the user record is corrupt.
pub fn load_credentials(store: &dyn CredentialStore) -> Result<Option<Credentials>> {
    let Some(user) = current_user(store)? else {
        return Ok(None);
    };
    let Some(access_token) = token(store, CredentialKey::AccessToken)? else {
        return Ok(None);
    };
    let Some(refresh_token) = token(store, CredentialKey::RefreshToken)? else {
        return Ok(None);
    };

    Ok(Some(Credentials {
        user,
        access_token,
        refresh_token,
    }))
}

/// Replaces the access token, leaving the refresh token and user untouched.
///
/// # Errors
/// Returns an error if the store write fails.
pub fn update_access_token(store: &dyn CredentialStore, access_token: &SecretString) -> Result<()> {
    store.set(CredentialKey::AccessToken, access_token.expose_secret())
}

/// Ends the local session.
///
/// # Errors
/// Returns an error if the store write fails.
pub fn clear_credentials(store: &dyn CredentialStore) -> Result<()> {
    store.clear()
}

/// Reads the stored user record.
///
/// # Errors
/// Returns an error if the store cannot be read or the record is corrupt.
pub fn current_user(store: &dyn CredentialStore) -> Result<Option<User>> {
    store
        .get(CredentialKey::User)?
        .map(|raw| serde_json::from_str(&raw).context("stored user record is corrupt"))
        .transpose()
}

/// A session is considered active while an access token is stored.
///
/// # Errors
/// Returns an error if the store cannot be read.
pub fn is_authenticated(store: &dyn CredentialStore) -> Result<bool> {
    Ok(token(store, CredentialKey::AccessToken)?.is_some())
}

/// Reads a token, treating empty values as absent.
///
/// # Errors
/// Returns an error if the store cannot be read.
pub fn token(store: &dyn CredentialStore, key: CredentialKey) -> Result<Option<SecretString>> {
    Ok(store
        .get(key)?
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from))
}

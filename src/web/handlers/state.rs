//! Shared handler state.

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use crate::config::Config;
use crate::file::UploadStore;
use crate::Result;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where uploads are written and listed from.
    pub store: UploadStore,
    /// Key signing the flash cookie.
    pub cookie_key: Key,
    /// Name of the flash cookie.
    pub flash_cookie: String,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The signing key is derived from `secret` with SHA-512, so any
    /// non-empty secret length is accepted.
    pub fn new(store: UploadStore, secret: &str) -> Self {
        let digest = Sha512::digest(secret.as_bytes());
        Self {
            store,
            cookie_key: Key::from(digest.as_slice()),
            flash_cookie: "flash".to_string(),
        }
    }

    /// Use a different flash cookie name.
    pub fn with_flash_cookie(mut self, name: impl Into<String>) -> Self {
        self.flash_cookie = name.into();
        self
    }

    /// Build state from configuration, creating the upload directory if needed.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = UploadStore::new(&config.uploads.path)?;
        Ok(Self::new(store, &config.session.secret_key)
            .with_flash_cookie(config.session.flash_cookie.clone()))
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

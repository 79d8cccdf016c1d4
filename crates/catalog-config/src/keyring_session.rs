// System keyring token store.

use catalog_api::{Error, SessionProvider};
use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

const SERVICE: &str = "catalog";

/// Keeps the bearer token in the platform keyring, one entry per backend.
#[derive(Debug, Clone)]
pub struct KeyringSession {
    account: String,
}

impl KeyringSession {
    pub fn new(account: &str) -> Self {
        Self {
            account: format!("{account}/token"),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, keyring::Error> {
        keyring::Entry::new(SERVICE, &self.account)
    }
}

impl SessionProvider for KeyringSession {
    fn token(&self) -> Option<SecretString> {
        match self.entry().and_then(|e| e.get_password()) {
            Ok(token) if !token.trim().is_empty() => Some(SecretString::from(token)),
            Ok(_) | Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!(error = %e, "keyring read failed, treating as signed out");
                None
            }
        }
    }

    fn set_token(&self, token: SecretString) -> Result<(), Error> {
        self.entry()
            .and_then(|e| e.set_password(token.expose_secret()))
            .map_err(|e| Error::SessionStore(format!("keyring write failed: {e}")))
    }

    fn clear_token(&self) -> Result<(), Error> {
        match self.entry().and_then(|e| e.delete_credential()) {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(Error::SessionStore(format!("keyring delete failed: {e}"))),
        }
    }
}

// Session Provider: where the bearer token lives between calls.
//
// The token is the only credential and its presence is the only client-side
// authentication signal. Clients read it right before every request, so a
// login or logout from elsewhere is picked up on the next call.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::error::Error;

/// Storage capability for the bearer token.
pub trait SessionProvider: Send + Sync {
    /// The stored token, if any.
    fn token(&self) -> Option<SecretString>;

    /// Persist a new token, replacing any previous one.
    fn set_token(&self, token: SecretString) -> Result<(), Error>;

    /// Forget the token. Clearing an empty store is not an error.
    fn clear_token(&self) -> Result<(), Error>;

    fn has_token(&self) -> bool {
        self.token().is_some()
    }
}

// ── In-memory ────────────────────────────────────────────────────────

/// Process-local token store.
#[derive(Default)]
pub struct MemorySession {
    token: ArcSwapOption<SecretString>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start out already holding a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session
            .token
            .store(Some(Arc::new(SecretString::from(token.into()))));
        session
    }
}

impl std::fmt::Debug for MemorySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySession")
            .field("has_token", &self.has_token())
            .finish()
    }
}

impl SessionProvider for MemorySession {
    fn token(&self) -> Option<SecretString> {
        self.token.load_full().map(|t| (*t).clone())
    }

    fn set_token(&self, token: SecretString) -> Result<(), Error> {
        self.token.store(Some(Arc::new(token)));
        Ok(())
    }

    fn clear_token(&self) -> Result<(), Error> {
        self.token.store(None);
        Ok(())
    }
}

// ── File-backed ──────────────────────────────────────────────────────

/// Token persisted as a single file, re-read on every access.
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_token(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;
        file.write_all(token.as_bytes())
    }
}

impl SessionProvider for FileSession {
    fn token(&self) -> Option<SecretString> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                (!token.is_empty()).then(|| SecretString::from(token.to_owned()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable session file");
                None
            }
        }
    }

    fn set_token(&self, token: SecretString) -> Result<(), Error> {
        debug!(path = %self.path.display(), "persisting session token");
        self.write_token(token.expose_secret())
            .map_err(|e| Error::SessionStore(format!("{}: {e}", self.path.display())))
    }

    fn clear_token(&self) -> Result<(), Error> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::SessionStore(format!(
                "{}: {e}",
                self.path.display()
            ))),
        }
    }
}

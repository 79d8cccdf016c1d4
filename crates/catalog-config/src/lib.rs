//! Configuration for the catalog admin tools.
//!
//! TOML file + `CATALOG_` environment loading via figment, base-URL
//! resolution per environment, token store selection, and translation to
//! `catalog_core::CatalogConfig`.

mod keyring_session;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use catalog_api::{FileSession, MemorySession, SessionProvider, TlsMode};
use catalog_core::{CatalogConfig, DEFAULT_DEV_URL, DEFAULT_PROD_URL};
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub use keyring_session::KeyringSession;

/// Prefix for environment overrides (`CATALOG_API_URL`, ...).
pub const ENV_PREFIX: &str = "CATALOG_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// Which backend to talk to when `api_url` is not set.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// Where the bearer token is kept between runs.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TokenStore {
    /// Plain file in the platform data directory.
    #[default]
    File,
    /// System keyring.
    Keyring,
    /// Process memory only; every run starts signed out.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Explicit backend root. Wins over `environment`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default)]
    pub environment: Environment,

    /// Request timeout in seconds. Unset means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// How long cached reads stay fresh (humantime, e.g. `"5m"`).
    #[serde(default = "default_stale_after")]
    pub stale_after: String,

    #[serde(default)]
    pub token_store: TokenStore,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            environment: Environment::default(),
            timeout_secs: None,
            stale_after: default_stale_after(),
            token_store: TokenStore::default(),
            insecure: false,
            ca_cert: None,
        }
    }
}

fn default_stale_after() -> String {
    "5m".into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "catalog", "catalog")
}

fn home_fallback(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.extend(parts);
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".config", "catalog", "config.toml"]),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where the file token store keeps the token.
pub fn token_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".local", "share", "catalog", "token"]),
        |dirs| dirs.data_dir().join("token"),
    )
}

// ── Loading & saving ────────────────────────────────────────────────

/// Load defaults, then the canonical config file, then the environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load with an explicit config file. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()?;
    Ok(config)
}

/// Serialize `cfg` to TOML at the canonical path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}

// ── Resolution ──────────────────────────────────────────────────────

impl Config {
    /// `api_url` if set, otherwise the environment's default backend.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = match self.api_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url,
            _ => match self.environment {
                Environment::Production => DEFAULT_PROD_URL,
                Environment::Development => DEFAULT_DEV_URL,
            },
        };
        Url::parse(raw).map_err(|e| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("{raw:?}: {e}"),
        })
    }

    pub fn stale_after(&self) -> Result<Duration, ConfigError> {
        humantime::parse_duration(self.stale_after.trim()).map_err(|e| ConfigError::Validation {
            field: "stale_after".into(),
            reason: e.to_string(),
        })
    }

    pub fn tls(&self) -> TlsMode {
        if self.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ca) = &self.ca_cert {
            TlsMode::CustomCa(ca.clone())
        } else {
            TlsMode::System
        }
    }

    /// Translate to the runtime configuration the core consumes.
    pub fn to_catalog_config(&self) -> Result<CatalogConfig, ConfigError> {
        let mut config = CatalogConfig::new(self.base_url()?);
        config.tls = self.tls();
        config.timeout = self.timeout_secs.map(Duration::from_secs);
        config.stale_after = self.stale_after()?;
        Ok(config)
    }

    /// Build the configured token store.
    pub fn session_provider(&self) -> Arc<dyn SessionProvider> {
        match self.token_store {
            TokenStore::File => Arc::new(FileSession::new(token_path())),
            TokenStore::Keyring => Arc::new(KeyringSession::new(&self.keyring_account())),
            TokenStore::Memory => Arc::new(MemorySession::new()),
        }
    }

    /// Keyring account, scoped by backend so tokens for different
    /// deployments never mix.
    fn keyring_account(&self) -> String {
        self.base_url()
            .map_or_else(|_| "default".into(), |u| u.origin().ascii_serialization())
    }
}

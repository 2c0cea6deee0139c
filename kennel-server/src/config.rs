//! Process configuration, read once at startup
//!
//! Environment variables:
//!   SUPABASE_URL     record store URL; the scheme selects the backend
//!   SUPABASE_KEY     record store key (REST backend)
//!   ADMIN_USERNAME   admin login name (default: admin)
//!   ADMIN_PASSWORD   admin password (default: password)
//!   ADMIN_TOKEN      token issued on login (default: dummy_admin_token)
//!   PORT             listen port (default: 5000)

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const STORE_URL_VAR: &str = "SUPABASE_URL";
pub const STORE_KEY_VAR: &str = "SUPABASE_KEY";
pub const ADMIN_USERNAME_VAR: &str = "ADMIN_USERNAME";
pub const ADMIN_PASSWORD_VAR: &str = "ADMIN_PASSWORD";
pub const ADMIN_TOKEN_VAR: &str = "ADMIN_TOKEN";
pub const PORT_VAR: &str = "PORT";

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "password";
const DEFAULT_ADMIN_TOKEN: &str = "dummy_admin_token";
const DEFAULT_PORT: u16 = 5000;

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("invalid {var} value: '{value}'")]
    Invalid { var: &'static str, value: String },

    #[error("unsupported record store URL '{0}' (expected http(s)://, postgres:// or memory://)")]
    UnsupportedStore(String),
}

/// Record store backend, chosen by URL scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// PostgREST / Supabase REST API
    Rest,
    /// Direct PostgreSQL connection
    Postgres,
    /// In-process store, contents lost on exit
    Memory,
}

impl StoreKind {
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        let scheme = url
            .split_once("://")
            .map(|(scheme, _)| scheme.to_ascii_lowercase())
            .ok_or_else(|| ConfigError::UnsupportedStore(url.to_owned()))?;

        match scheme.as_str() {
            "http" | "https" => Ok(Self::Rest),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::UnsupportedStore(url.to_owned())),
        }
    }
}

/// Record store location and credentials
#[derive(Clone)]
pub struct StoreConfig {
    pub url: String,
    pub key: String,
}

impl StoreConfig {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
        }
    }

    pub fn kind(&self) -> Result<StoreKind, ConfigError> {
        StoreKind::from_url(&self.url)
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Static admin login and the token it issues
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
    pub token: String,
}

impl AdminCredentials {
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }

    pub fn accepts_token(&self, token: &str) -> bool {
        self.token == token
    }
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            password: DEFAULT_ADMIN_PASSWORD.to_string(),
            token: DEFAULT_ADMIN_TOKEN.to_string(),
        }
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Everything the server needs, built once at process start
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub admin: AdminCredentials,
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Read from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(STORE_URL_VAR)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing(STORE_URL_VAR))?;
        let store = StoreConfig::new(url, lookup(STORE_KEY_VAR).unwrap_or_default());
        store.kind()?;

        let defaults = AdminCredentials::default();
        let admin = AdminCredentials {
            username: lookup(ADMIN_USERNAME_VAR).unwrap_or(defaults.username),
            password: lookup(ADMIN_PASSWORD_VAR).unwrap_or(defaults.password),
            token: lookup(ADMIN_TOKEN_VAR).unwrap_or(defaults.token),
        };

        let port = match lookup(PORT_VAR) {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: PORT_VAR,
                value,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            store,
            admin,
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port),
        })
    }
}

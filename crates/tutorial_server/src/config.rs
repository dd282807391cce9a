//! Environment-driven server configuration.
//!
//! # Invariants
//! - Unset variables fall back to documented defaults.
//! - A variable that is set but invalid is an error, never a silent default.

use axum::http::HeaderValue;
use std::env;
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tutorial_core::default_log_level;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_PATH: &str = "tutorials.sqlite3";
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value `{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Where tutorials are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    InMemory,
}

/// HTTP-layer settings shared with the router through app state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    /// `None` allows any origin.
    pub cors_allow_origin: Option<HeaderValue>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            cors_allow_origin: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub database: DatabaseLocation,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub api: ApiConfig,
}

impl ServerConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database = match var("DATABASE_PATH") {
            Some(path) if path.trim() == IN_MEMORY_DATABASE => DatabaseLocation::InMemory,
            Some(path) => DatabaseLocation::File(PathBuf::from(path.trim())),
            None => DatabaseLocation::File(PathBuf::from(DEFAULT_DATABASE_PATH)),
        };

        let cors_allow_origin = match var("CORS_ALLOW_ORIGIN") {
            Some(origin) if origin.trim() == "*" => None,
            Some(origin) => Some(HeaderValue::from_str(origin.trim()).map_err(|err| {
                ConfigError::Invalid {
                    key: "CORS_ALLOW_ORIGIN",
                    value: origin.clone(),
                    reason: err.to_string(),
                }
            })?),
            None => None,
        };

        let max_body_bytes = parse_or(
            "MAX_BODY_BYTES",
            var("MAX_BODY_BYTES"),
            DEFAULT_MAX_BODY_BYTES,
        )?;
        if max_body_bytes == 0 {
            return Err(ConfigError::Invalid {
                key: "MAX_BODY_BYTES",
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            bind_addr: parse_or(
                "BIND_ADDR",
                var("BIND_ADDR"),
                IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            )?,
            port: parse_or("PORT", var("PORT"), DEFAULT_PORT)?,
            database,
            log_level: var("LOG_LEVEL")
                .map(|level| level.trim().to_string())
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: var("LOG_DIR").map(|dir| dir.trim().to_string()),
            api: ApiConfig {
                max_body_bytes,
                cors_allow_origin,
            },
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let Some(value) = raw else {
        return Ok(default);
    };
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|err| ConfigError::Invalid {
        key,
        reason: err.to_string(),
        value,
    })
}

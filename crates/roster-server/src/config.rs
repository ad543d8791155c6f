//! Server configuration from environment variables

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use thiserror::Error;
use tracing::Level;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PRIVATE_KEY_PATH: &str = "keys/private.pem";
pub const DEFAULT_PUBLIC_KEY_PATH: &str = "keys/public.pem";

/// Invalid configuration value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{var} has invalid value '{value}': {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`ROSTER_BIND_ADDR`)
    pub bind_addr: IpAddr,
    /// Port to listen on (`ROSTER_PORT`)
    pub port: u16,
    /// PEM file with the signing key (`ROSTER_PRIVATE_KEY_PATH`)
    pub private_key_path: PathBuf,
    /// PEM file with the paired public key (`ROSTER_PUBLIC_KEY_PATH`)
    pub public_key_path: PathBuf,
    /// Maximum log level (`ROSTER_LOG_LEVEL`)
    pub log_level: Level,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            private_key_path: DEFAULT_PRIVATE_KEY_PATH.into(),
            public_key_path: DEFAULT_PUBLIC_KEY_PATH.into(),
            log_level: Level::INFO,
        }
    }
}

impl ServerConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Read the configuration through `lookup`; unset variables keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("ROSTER_BIND_ADDR") {
            config.bind_addr = parse("ROSTER_BIND_ADDR", value)?;
        }
        if let Some(value) = lookup("ROSTER_PORT") {
            config.port = parse("ROSTER_PORT", value)?;
        }
        if let Some(value) = lookup("ROSTER_PRIVATE_KEY_PATH") {
            config.private_key_path = value.into();
        }
        if let Some(value) = lookup("ROSTER_PUBLIC_KEY_PATH") {
            config.public_key_path = value.into();
        }
        if let Some(value) = lookup("ROSTER_LOG_LEVEL") {
            config.log_level = parse("ROSTER_LOG_LEVEL", value)?;
        }

        Ok(config)
    }

    /// Socket address string for the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError {
        var,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
        assert_eq!(config.private_key_path, PathBuf::from("keys/private.pem"));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("ROSTER_PORT", "8081"),
            ("ROSTER_BIND_ADDR", "127.0.0.1"),
            ("ROSTER_PRIVATE_KEY_PATH", "/etc/roster/private.pem"),
            ("ROSTER_PUBLIC_KEY_PATH", "/etc/roster/public.pem"),
            ("ROSTER_LOG_LEVEL", "debug"),
        ])
        .unwrap();

        assert_eq!(config.listen_addr(), "127.0.0.1:8081");
        assert_eq!(config.public_key_path, PathBuf::from("/etc/roster/public.pem"));
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn test_invalid_port() {
        let err = config(&[("ROSTER_PORT", "seventy")]).unwrap_err();
        assert_eq!(err.var, "ROSTER_PORT");
        assert_eq!(err.value, "seventy");
    }

    #[test]
    fn test_invalid_log_level() {
        let err = config(&[("ROSTER_LOG_LEVEL", "loud")]).unwrap_err();
        assert_eq!(err.var, "ROSTER_LOG_LEVEL");
    }
}

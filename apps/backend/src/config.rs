//! Runtime configuration from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use lexicard_core::quiz::DEFAULT_SECONDS_PER_QUESTION;
use thiserror::Error;

pub const DEFAULT_TRANSLATE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("could not determine a data directory; set LEXICARD_DATA_DIR")]
    NoDataDir,
}

/// Which persistence backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Json,
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub storage: StorageBackend,
    pub data_dir: PathBuf,
    pub sqlite_path: PathBuf,
    pub seconds_per_question: u32,
    pub translate_endpoint: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_endpoint: String,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = parse_or(&var, "HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port = parse_or(&var, "PORT", 3000u16)?;
        let storage = parse_or(&var, "LEXICARD_STORAGE", StorageBackend::Json)?;

        let data_dir = match var("LEXICARD_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_local_dir()
                .ok_or(ConfigError::NoDataDir)?
                .join("lexicard"),
        };
        let sqlite_path = var("LEXICARD_SQLITE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("lexicard.db"));

        let seconds_per_question =
            parse_or(&var, "LEXICARD_SECONDS_PER_QUESTION", DEFAULT_SECONDS_PER_QUESTION)?;
        if seconds_per_question == 0 {
            return Err(ConfigError::Invalid {
                name: "LEXICARD_SECONDS_PER_QUESTION",
                value: "0".to_string(),
            });
        }

        let http_timeout_secs = parse_or(&var, "HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;

        Ok(Self {
            host,
            port,
            log_level: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            storage,
            data_dir,
            sqlite_path,
            seconds_per_question,
            translate_endpoint: var("TRANSLATE_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_TRANSLATE_ENDPOINT.to_string()),
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_endpoint: var("GEMINI_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string()),
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T, V>(var: &V, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    V: Fn(&str) -> Option<String>,
{
    match var(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("LEXICARD_DATA_DIR", "/tmp/lexicard")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.storage, StorageBackend::Json);
        assert_eq!(config.sqlite_path, PathBuf::from("/tmp/lexicard/lexicard.db"));
        assert_eq!(config.seconds_per_question, 30);
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("LEXICARD_STORAGE", "SQLite"),
            ("LEXICARD_DATA_DIR", "/data"),
            ("LEXICARD_SQLITE_PATH", "/db/cards.db"),
            ("LEXICARD_SECONDS_PER_QUESTION", "10"),
            ("GEMINI_API_KEY", "secret"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.storage, StorageBackend::Sqlite);
        assert_eq!(config.sqlite_path, PathBuf::from("/db/cards.db"));
        assert_eq!(config.seconds_per_question, 10);
        assert_eq!(config.gemini_api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert_eq!(
            config(&[("LEXICARD_DATA_DIR", "/d"), ("PORT", "http")]).unwrap_err(),
            ConfigError::Invalid {
                name: "PORT",
                value: "http".to_string()
            }
        );
        assert!(config(&[("LEXICARD_DATA_DIR", "/d"), ("LEXICARD_STORAGE", "postgres")]).is_err());
        assert!(config(&[("LEXICARD_DATA_DIR", "/d"), ("LEXICARD_SECONDS_PER_QUESTION", "0")]).is_err());
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config(&[("LEXICARD_DATA_DIR", "/d"), ("PORT", "  "), ("GEMINI_API_KEY", "")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.gemini_api_key, None);
    }
}

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Pre-compiled regex for hostname validation (compiled once at first use)
static HOSTNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][-a-zA-Z0-9\.]*[a-zA-Z0-9]$").unwrap());

#[derive(Debug, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub server: Option<ServerSection>,
    #[serde(default)]
    pub logging: Option<LoggingSection>,
    #[serde(default)]
    pub engine: Option<EngineSection>,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub json: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct EngineSection {
    #[serde(default)]
    pub max_queue_size: Option<usize>,
    #[serde(default)]
    pub max_attempts: Option<u32>,
    #[serde(default)]
    pub worker_count: Option<usize>,
    #[serde(default)]
    pub retry_backoff_ms: Option<u64>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Load a RawConfigFile from a path. The format is inferred from the extension: .toml, .yaml/.yml, .json
pub fn load_raw_from_file<P: AsRef<Path>>(path: P) -> Result<RawConfigFile, ConfigError> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    parse_config_str(&s, ext.as_deref())
}

/// Parse configuration from a string with optional format hint
#[inline]
fn parse_config_str(s: &str, ext: Option<&str>) -> Result<RawConfigFile, ConfigError> {
    match ext {
        #[cfg(feature = "toml")]
        Some("toml") => toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string())),
        #[cfg(feature = "yaml")]
        Some("yaml" | "yml") => {
            serde_yaml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
        }
        #[cfg(feature = "json")]
        Some("json") => serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string())),
        _ => parse_config_auto(s),
    }
}

/// Try to parse config by attempting each enabled format
#[inline]
fn parse_config_auto(s: &str) -> Result<RawConfigFile, ConfigError> {
    // Try each format in order, collecting the last error
    #[cfg(feature = "yaml")]
    if let Ok(cfg) = serde_yaml::from_str(s) {
        return Ok(cfg);
    }

    #[cfg(feature = "toml")]
    if let Ok(cfg) = toml::from_str(s) {
        return Ok(cfg);
    }

    #[cfg(feature = "json")]
    if let Ok(cfg) = serde_json::from_str(s) {
        return Ok(cfg);
    }

    // All formats failed - generate appropriate error message
    #[cfg(any(feature = "yaml", feature = "toml", feature = "json"))]
    {
        Err(ConfigError::Parse(
            "failed to parse config as any supported format".into(),
        ))
    }

    #[cfg(not(any(feature = "yaml", feature = "toml", feature = "json")))]
    {
        let _ = s; // suppress unused warning
        Err(ConfigError::Parse("no config format enabled".into()))
    }
}

/// Concrete application configuration with defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineConfig {
    /// Maximum live queue depth before submissions are rejected.
    pub max_queue_size: usize,
    /// Execution attempts before a failing job is dead-lettered.
    pub max_attempts: u32,
    /// Workers started when a start request names no count.
    pub worker_count: usize,
    /// Fixed delay before a failed job re-enters the queue.
    pub retry_backoff_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 7000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
            },
            engine: EngineConfig {
                max_queue_size: 10,
                max_attempts: 3,
                worker_count: 3,
                retry_backoff_ms: 300,
            },
        }
    }
}

#[inline]
fn parse_bool(s: &str) -> Result<bool, ()> {
    let bytes = s.as_bytes();
    match bytes {
        b"1" | b"true" | b"TRUE" | b"True" | b"yes" | b"YES" | b"Yes" | b"y" | b"Y" => Ok(true),
        b"0" | b"false" | b"FALSE" | b"False" | b"no" | b"NO" | b"No" | b"n" | b"N" => Ok(false),
        _ => match s.to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" => Ok(true),
            "false" | "no" | "n" => Ok(false),
            _ => Err(()),
        },
    }
}

/// Helper macro to apply optional value if present
macro_rules! apply_opt {
    ($target:expr, $source:expr) => {
        if let Some(v) = $source {
            $target = v;
        }
    };
}

/// Load concrete `Config` from optional file and environment variables.
/// Environment variables take precedence over file values and defaults.
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<Config, ConfigError> {
    let mut cfg = Config::default();

    // Start with file values if provided
    if let Some(p) = path {
        let raw = load_raw_from_file(p)?;
        if let Some(server) = raw.server {
            apply_opt!(cfg.server.host, server.host);
            apply_opt!(cfg.server.port, server.port);
        }
        if let Some(logging) = raw.logging {
            apply_opt!(cfg.logging.level, logging.level);
            apply_opt!(cfg.logging.json, logging.json);
        }
        if let Some(engine) = raw.engine {
            apply_opt!(cfg.engine.max_queue_size, engine.max_queue_size);
            apply_opt!(cfg.engine.max_attempts, engine.max_attempts);
            apply_opt!(cfg.engine.worker_count, engine.worker_count);
            apply_opt!(cfg.engine.retry_backoff_ms, engine.retry_backoff_ms);
        }
    }

    // Apply environment variable overrides (env takes precedence)
    apply_env_overrides(&mut cfg)?;

    Ok(cfg)
}

/// Helper to parse env var as a specific type
#[inline]
fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::Parse(format!("invalid {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

/// Helper to parse env var as bool
#[inline]
fn env_bool(key: &str) -> Result<Option<bool>, ConfigError> {
    match env::var(key) {
        Ok(v) => parse_bool(&v)
            .map(Some)
            .map_err(|_| ConfigError::Parse(format!("invalid {}", key))),
        Err(_) => Ok(None),
    }
}

/// Helper to get env var as string
#[inline]
fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Apply all environment variable overrides to config
fn apply_env_overrides(cfg: &mut Config) -> Result<(), ConfigError> {
    // Server
    if let Some(v) = env_str("LOADLAB_SERVER_HOST") {
        cfg.server.host = v;
    }
    if let Some(v) = env_parse::<u16>("LOADLAB_SERVER_PORT")? {
        cfg.server.port = v;
    }

    // Logging
    if let Some(v) = env_str("LOADLAB_LOG_LEVEL") {
        cfg.logging.level = v;
    }
    if let Some(v) = env_bool("LOADLAB_LOG_JSON")? {
        cfg.logging.json = v;
    }

    // Engine
    if let Some(v) = env_parse::<usize>("LOADLAB_MAX_QUEUE_SIZE")? {
        cfg.engine.max_queue_size = v;
    }
    if let Some(v) = env_parse::<u32>("LOADLAB_MAX_ATTEMPTS")? {
        cfg.engine.max_attempts = v;
    }
    if let Some(v) = env_parse::<usize>("LOADLAB_WORKER_COUNT")? {
        cfg.engine.worker_count = v;
    }
    if let Some(v) = env_parse::<u64>("LOADLAB_RETRY_BACKOFF_MS")? {
        cfg.engine.retry_backoff_ms = v;
    }

    Ok(())
}

/// Validate higher-level constraints on the resolved configuration.
pub fn validate_config(cfg: &Config) -> Result<(), ConfigError> {
    // server port range
    if cfg.server.port == 0 {
        return Err(ConfigError::Validation("server.port must be > 0".into()));
    }
    // validate server.host: allow IPs or simple hostname pattern
    let host_ok = cfg.server.host.parse::<std::net::IpAddr>().is_ok()
        || HOSTNAME_REGEX.is_match(&cfg.server.host);
    if !host_ok {
        return Err(ConfigError::Validation(format!(
            "invalid server.host: {}",
            cfg.server.host
        )));
    }

    if cfg.engine.max_queue_size == 0 {
        return Err(ConfigError::Validation(
            "engine.max_queue_size must be at least 1".into(),
        ));
    }
    if cfg.engine.max_attempts == 0 {
        return Err(ConfigError::Validation(
            "engine.max_attempts must be at least 1".into(),
        ));
    }
    if cfg.engine.worker_count == 0 {
        return Err(ConfigError::Validation(
            "engine.worker_count must be at least 1".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn parse_toml() {
        let f = NamedTempFile::new().expect("tmpfile");
        std::fs::write(
            f.path(),
            r#"
[server]
host = "127.0.0.1"
port = 7000

[engine]
max_queue_size = 25
max_attempts = 5
"#,
        )
        .unwrap();
        let cfg = load_raw_from_file(f.path()).expect("load");
        assert!(cfg.server.is_some());
        assert!(cfg.engine.is_some());
        let e = cfg.engine.unwrap();
        assert_eq!(e.max_queue_size.unwrap(), 25);
        assert_eq!(e.max_attempts.unwrap(), 5);
    }

    #[test]
    fn parse_yaml() {
        let f = NamedTempFile::new().expect("tmpfile");
        std::fs::write(
            f.path(),
            r#"
server:
  host: 0.0.0.0
  port: 9000
engine:
  worker_count: 8
  retry_backoff_ms: 50
"#,
        )
        .unwrap();
        let cfg = load_raw_from_file(f.path()).expect("load");
        let s = cfg.server.expect("server section");
        assert_eq!(s.host.unwrap(), "0.0.0.0");
        assert_eq!(s.port.unwrap(), 9000);
        let e = cfg.engine.expect("engine section");
        assert_eq!(e.worker_count.unwrap(), 8);
        assert_eq!(e.retry_backoff_ms.unwrap(), 50);
    }

    #[test]
    fn env_overrides() {
        // Clear any related env vars first to avoid interference
        for k in &[
            "LOADLAB_SERVER_HOST",
            "LOADLAB_SERVER_PORT",
            "LOADLAB_LOG_LEVEL",
            "LOADLAB_MAX_QUEUE_SIZE",
            "LOADLAB_WORKER_COUNT",
        ] {
            std::env::remove_var(k);
        }

        std::env::set_var("LOADLAB_SERVER_HOST", "10.1.2.3");
        std::env::set_var("LOADLAB_SERVER_PORT", "1234");
        std::env::set_var("LOADLAB_LOG_LEVEL", "debug");
        std::env::set_var("LOADLAB_MAX_QUEUE_SIZE", "42");
        std::env::set_var("LOADLAB_WORKER_COUNT", "6");

        let cfg = load_config::<&Path>(None).expect("load config");
        assert_eq!(cfg.server.host, "10.1.2.3");
        assert_eq!(cfg.server.port, 1234);
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.engine.max_queue_size, 42);
        assert_eq!(cfg.engine.worker_count, 6);

        // cleanup
        for k in &[
            "LOADLAB_SERVER_HOST",
            "LOADLAB_SERVER_PORT",
            "LOADLAB_LOG_LEVEL",
            "LOADLAB_MAX_QUEUE_SIZE",
            "LOADLAB_WORKER_COUNT",
        ] {
            std::env::remove_var(k);
        }
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        validate_config(&cfg).expect("default config valid");
        assert_eq!(cfg.engine.max_queue_size, 10);
        assert_eq!(cfg.engine.max_attempts, 3);
        assert_eq!(cfg.engine.retry_backoff_ms, 300);
    }

    #[test]
    fn zero_bounds_are_rejected() {
        let mut cfg = Config::default();
        cfg.engine.max_queue_size = 0;
        assert!(validate_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.engine.max_attempts = 0;
        assert!(validate_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.server.port = 0;
        assert!(validate_config(&cfg).is_err());
    }
}

//! Configuration file support.
//!
//! Settings come from a JSON file, with CLI flags applied on top.
//!
//! Example `trisign.json`:
//! ```json
//! {
//!   "security": 2,
//!   "sponge": "kerl",
//!   "checksum": true,
//!   "threads": 4
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::signing::SecurityLevel;
use crate::sponge::SpongeKind;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("thread count must be at least 1")]
    ZeroThreads,

    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}

/// Resolved settings with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Security level for key and address derivation.
    pub security: SecurityLevel,
    /// Sponge used for addresses and hashing.
    pub sponge: SpongeKind,
    /// Print addresses with their checksum.
    pub checksum: bool,
    /// Worker threads for bulk generation; rayon's default when unset.
    pub threads: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            security: SecurityLevel::Medium,
            sponge: SpongeKind::Kerl,
            checksum: true,
            threads: None,
        }
    }
}

impl Config {
    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(())
    }

    /// Size the global rayon pool from `threads`.
    #[cfg(feature = "parallel")]
    pub fn install_thread_pool(&self) -> Result<(), ConfigError> {
        if let Some(threads) = self.threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .map_err(|e| ConfigError::ThreadPool(e.to_string()))?;
            debug!(threads, "configured thread pool");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.security, SecurityLevel::Medium);
        assert_eq!(config.sponge, SpongeKind::Kerl);
        assert!(config.checksum);
    }

    #[test]
    fn test_full_file() {
        let config = Config::from_json(
            r#"{ "security": 3, "sponge": "curl-p81", "checksum": false, "threads": 2 }"#,
        )
        .unwrap();
        assert_eq!(config.security, SecurityLevel::High);
        assert_eq!(config.sponge, SpongeKind::CurlP81);
        assert!(!config.checksum);
        assert_eq!(config.threads, Some(2));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(Config::from_json(r#"{ "security": 4 }"#), Err(ConfigError::Json(_))));
        assert!(matches!(Config::from_json(r#"{ "sponge": "sha256" }"#), Err(ConfigError::Json(_))));
        assert!(matches!(Config::from_json(r#"{ "threads": 0 }"#), Err(ConfigError::ZeroThreads)));
        assert!(matches!(Config::from_json(r#"{ "colour": "red" }"#), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("trisign-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "security": 1 }"#).unwrap();
        let config = Config::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.security, SecurityLevel::Low);

        assert!(matches!(
            Config::load(Path::new("/nonexistent/trisign.json")),
            Err(ConfigError::Io(_))
        ));
        assert_eq!(Config::load_or_default(None).unwrap(), Config::default());
    }

    #[test]
    fn test_roundtrip_json() {
        let config = Config { threads: Some(8), ..Config::default() };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }
}

//! `checkout.toml` loading.
//!
//! Every key is optional. A missing file at the default location yields the
//! defaults; a missing file named explicitly is an error.
//!
//! ```toml
//! [storage]
//! backend = "sqlite"
//! connection_string = "checkout.db"
//!
//! [catalog]
//! latency_ms = 300
//! products = [{ id = 1, name = "First Product" }]
//!
//! [purchase]
//! latency_ms = 500
//! fail_first = 1
//!
//! [logging]
//! level = "debug"
//! file = "checkout.log"
//! stdout = false
//! ```

use std::path::{Path, PathBuf};

use checkout_core::{Product, StorageConfig};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "checkout.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
    pub purchase: PurchaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub latency_ms: u64,
    /// Makes every fetch fail.
    pub fail: bool,
    pub products: Vec<Product>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            latency_ms: 300,
            fail: false,
            products: vec![
                Product::new(1, "First Product"),
                Product::new(2, "Second Product"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PurchaseConfig {
    pub latency_ms: u64,
    /// Number of initial submissions to reject.
    pub fail_first: u32,
}

impl Default for PurchaseConfig {
    fn default() -> Self {
        Self {
            latency_ms: 500,
            fail_first: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub file: Option<PathBuf>,
    /// Log to stdout as well. Off by default; the wizard draws on stdout.
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            stdout: false,
        }
    }
}

impl AppConfig {
    pub fn from_toml(
        path: &Path,
        contents: &str,
    ) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &contents)
    }

    /// Loads `path` when given, otherwise `checkout.toml` in the working
    /// directory if present, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(contents: &str) -> Result<AppConfig, ConfigError> {
        AppConfig::from_toml(Path::new("test.toml"), contents)
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse("").unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage.backend, "file");
        assert_eq!(config.catalog.products.len(), 2);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse(
            r#"
            [storage]
            backend = "sqlite"

            [purchase]
            fail_first = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.backend, "sqlite");
        assert_eq!(config.storage.connection_string, ".checkout");
        assert_eq!(config.purchase.fail_first, 1);
        assert_eq!(config.purchase.latency_ms, 500);
    }

    #[test]
    fn products_are_read_from_the_catalog_section() {
        let config = parse(
            r#"
            [catalog]
            latency_ms = 0
            products = [{ id = 10, name = "Annual" }, { id = 11, name = "Monthly" }]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.catalog.products,
            vec![Product::new(10, "Annual"), Product::new(11, "Monthly")]
        );
    }

    #[test]
    fn type_errors_name_the_file() {
        let err = parse("[catalog]\nlatency_ms = \"slow\"").unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("test.toml"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = AppConfig::load_or_default(Some(dir.path().join("absent.toml").as_path()))
            .unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkout.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\nstdout = true\n").unwrap();

        let config = AppConfig::load(&path).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.stdout);
    }
}

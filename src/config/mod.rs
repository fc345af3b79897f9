//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables or a file
//! using the `config` and `dotenvy` crates. Environment variables use the
//! `ALIGNMENT_EDITOR` prefix and `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use alignment_editor::config::{init_tracing, AppConfig};
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! init_tracing(&config.logging);
//! let root = config.process.root().expect("validated above");
//! ```

mod annotation;
mod error;
mod logging;
mod process;
mod telemetry;

pub use annotation::AnnotationConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use process::ProcessConfig;
pub use telemetry::init_tracing;

use serde::Deserialize;
use std::path::Path;

const ENV_PREFIX: &str = "ALIGNMENT_EDITOR";

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Process template hierarchy roots
    #[serde(default)]
    pub process: ProcessConfig,

    /// Comment excerpt display
    #[serde(default)]
    pub annotation: AnnotationConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ALIGNMENT_EDITOR` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `ALIGNMENT_EDITOR__PROCESS__SYSTEM_ROOT=std` -> `process.system_root = "std"`
    /// - `ALIGNMENT_EDITOR__LOGGING__JSON=true` -> `logging.json = true`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load configuration from a file, with environment variables on top
    ///
    /// The format follows the extension (`.toml`, `.json`, ...).
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for empty or dotted process roots, an
    /// excerpt budget larger than its threshold, or an unparsable log filter.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.process.validate()?;
        self.annotation.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("ALIGNMENT_EDITOR__PROCESS__SYSTEM_ROOT");
        env::remove_var("ALIGNMENT_EDITOR__ANNOTATION__EXCERPT_KEEP");
        env::remove_var("ALIGNMENT_EDITOR__LOGGING__JSON");
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.process.system_root, "root");
        assert_eq!(config.process.process_root, "proc");
        assert_eq!(config.annotation.excerpt_prune_threshold, 140);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("ALIGNMENT_EDITOR__PROCESS__SYSTEM_ROOT", "std");
        env::set_var("ALIGNMENT_EDITOR__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.process.system_root, "std");
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_from_file() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[process]\nsystem_root = \"org\"\n\n[annotation]\nexcerpt_prune_threshold = 80\nexcerpt_keep = 30"
        )
        .unwrap();

        let config = AppConfig::load_from_file(file.path()).unwrap();

        assert_eq!(config.process.system_root, "org");
        assert_eq!(config.process.process_root, "proc");
        assert_eq!(config.annotation.excerpt_policy().threshold, 80);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_overrides_file() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[annotation]\nexcerpt_keep = 30").unwrap();
        env::set_var("ALIGNMENT_EDITOR__ANNOTATION__EXCERPT_KEEP", "90");
        let result = AppConfig::load_from_file(file.path());
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.annotation.excerpt_keep, 90);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::ExcerptBudgetTooLarge { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load_from_file(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}

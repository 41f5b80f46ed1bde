//! Harness configuration.
//!
//! Settings are layered: built-in defaults, then an optional configuration
//! file, then `QTEST_*` environment variables (`QTEST_ERRORS_DIR`,
//! `QTEST_TRANSACTION_OPTION`, ...).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{HarnessError, Result};
use crate::transaction::{TransactionStrategy, TRANSACTION_OPTION};

pub const DEFAULT_CONFIG_FILE: &str = "qtest.yaml";
pub const ENV_PREFIX: &str = "QTEST";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HarnessConfig {
    /// Selects the transaction strategy; see [`TransactionStrategy::select`].
    /// A file may spell the key `transaction-option`.
    #[serde(default)]
    pub transaction_option: Option<String>,
    /// Directory error reports are written to. Reset on every run.
    #[serde(default)]
    pub errors_dir: Option<PathBuf>,
    /// Root of the `<query_set>/<query_id>.{json,yaml}` expected results.
    #[serde(default)]
    pub expected_results_dir: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl HarnessConfig {
    /// Loads settings from `file` (if it exists) and the environment.
    pub fn load(file: impl AsRef<Path>) -> Result<Self> {
        Self::load_layered(file.as_ref(), None)
    }

    /// Like [`load`](Self::load), with `env` standing in for the process
    /// environment when given.
    fn load_layered(file: &Path, env: Option<config::Map<String, String>>) -> Result<Self> {
        let from_file = config::Config::builder()
            .add_source(config::File::from(file).required(false))
            .build()?;

        // The hyphenated spelling is lowered to a default for the underscore
        // key, so the file's own underscore key and the environment still
        // take precedence over it.
        let mut builder =
            config::Config::builder().set_default("log_level", default_log_level())?;
        if let Ok(option) = from_file.get_string(TRANSACTION_OPTION) {
            builder = builder.set_default("transaction_option", option)?;
        }
        let settings = builder
            .add_source(from_file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).source(env))
            .build()?;
        let cfg: HarnessConfig = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        match &self.errors_dir {
            Some(dir) if !dir.as_os_str().is_empty() => Ok(()),
            _ => Err(HarnessError::Config(
                "required setting errors_dir is not defined".to_string(),
            )),
        }
    }

    pub fn errors_dir(&self) -> Result<&Path> {
        self.validate()?;
        Ok(self.errors_dir.as_deref().unwrap_or(Path::new("")))
    }

    pub fn transaction_strategy(&self) -> TransactionStrategy {
        TransactionStrategy::select(self.transaction_option.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_file_settings() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("qtest.yaml");
        fs::write(
            &file,
            "transaction-option: LOCAL\nerrors_dir: /tmp/qtest-errors\nlog_level: debug\n",
        )
        .unwrap();

        let cfg = HarnessConfig::load(&file).unwrap();
        assert_eq!(cfg.transaction_strategy(), TransactionStrategy::Local);
        assert_eq!(cfg.errors_dir().unwrap(), Path::new("/tmp/qtest-errors"));
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.expected_results_dir, None);
    }

    #[test]
    fn environment_overrides_hyphenated_file_key() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("qtest.yaml");
        fs::write(&file, "transaction-option: local\nerrors_dir: /tmp/qtest-errors\n").unwrap();

        let env = config::Map::from([(
            "QTEST_TRANSACTION_OPTION".to_string(),
            "jndi".to_string(),
        )]);
        let cfg = HarnessConfig::load_layered(&file, Some(env)).unwrap();
        assert_eq!(cfg.transaction_strategy(), TransactionStrategy::Jndi);

        let cfg = HarnessConfig::load_layered(&file, Some(config::Map::new())).unwrap();
        assert_eq!(cfg.transaction_strategy(), TransactionStrategy::Local);
    }

    #[test]
    fn underscore_file_key_overrides_hyphenated_one() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("qtest.yaml");
        fs::write(
            &file,
            "transaction-option: local\ntransaction_option: \"on\"\nerrors_dir: /tmp/e\n",
        )
        .unwrap();

        let cfg = HarnessConfig::load_layered(&file, Some(config::Map::new())).unwrap();
        assert_eq!(cfg.transaction_strategy(), TransactionStrategy::OnWrap);
    }

    #[test]
    fn missing_errors_dir_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("qtest.yaml");
        fs::write(&file, "log_level: info\n").unwrap();

        let err = HarnessConfig::load(&file).unwrap_err();
        assert!(matches!(err, HarnessError::Config(_)));
    }
}

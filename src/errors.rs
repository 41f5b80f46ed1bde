//! qtest error handling.
//!
//! All fallible operations in the crate return [`HarnessError`]. Variants follow
//! the propagation policy of the harness: contract violations
//! (`InvalidArgument`, `InvalidState`, `OutOfRange`) always surface to the
//! caller, I/O-class failures (`Resource`, `Cursor`) surface when they affect a
//! primary artifact, and `Render` failures are normally caught and embedded in
//! the report that was being produced.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("Invalid argument: {0}")]
    #[diagnostic(code(qtest::invalid_argument))]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    #[diagnostic(code(qtest::invalid_state))]
    InvalidState(String),

    #[error("Index {index} is out of range for {len} rows")]
    #[diagnostic(code(qtest::out_of_range))]
    OutOfRange { index: usize, len: usize },

    #[error("Failed to access {}: {source}", path.display())]
    #[diagnostic(
        code(qtest::resource),
        help("check that the report directory exists and is writable")
    )]
    Resource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read result cursor: {0}")]
    #[diagnostic(code(qtest::cursor))]
    Cursor(String),

    #[error("Failed to render {block}: {message}")]
    #[diagnostic(code(qtest::render))]
    Render { block: String, message: String },

    #[error("Encoding error: {0}")]
    #[diagnostic(code(qtest::encoding))]
    Encoding(String),

    #[error("Failed to parse {location}: {message}")]
    #[diagnostic(code(qtest::parse))]
    Parse { location: String, message: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(qtest::config),
        help("settings are read from the config file and QTEST_* environment variables")
    )]
    Config(String),
}

impl HarnessError {
    /// The variant name, as used for the class of a reported error.
    pub fn kind(&self) -> &'static str {
        match self {
            HarnessError::InvalidArgument(_) => "InvalidArgument",
            HarnessError::InvalidState(_) => "InvalidState",
            HarnessError::OutOfRange { .. } => "OutOfRange",
            HarnessError::Resource { .. } => "Resource",
            HarnessError::Cursor(_) => "Cursor",
            HarnessError::Render { .. } => "Render",
            HarnessError::Encoding(_) => "Encoding",
            HarnessError::Parse { .. } => "Parse",
            HarnessError::Config(_) => "Config",
        }
    }

    /// Wraps an I/O error with the path it concerns.
    pub fn resource(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HarnessError::Resource {
            path: path.into(),
            source,
        }
    }
}

impl From<bincode::Error> for HarnessError {
    fn from(err: bincode::Error) -> Self {
        HarnessError::Encoding(err.to_string())
    }
}

impl From<config::ConfigError> for HarnessError {
    fn from(err: config::ConfigError) -> Self {
        HarnessError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic;

    #[test]
    fn diagnostic_codes_are_namespaced() {
        let err = HarnessError::OutOfRange { index: 3, len: 2 };
        assert_eq!(err.code().unwrap().to_string(), "qtest::out_of_range");
        assert_eq!(err.to_string(), "Index 3 is out of range for 2 rows");
    }

    #[test]
    fn resource_error_names_the_path() {
        let err = HarnessError::resource(
            "/tmp/x.err.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/x.err.json"));
        assert!(err.to_string().contains("denied"));
    }
}

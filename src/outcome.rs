//! The record of one executed test.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::HarnessError;
use crate::results::Mismatch;

// ============================================================================
// TEST IDENTITY
// ============================================================================

/// Identifies a single test: the query set it belongs to and the query
/// within that set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestIdentity {
    pub query_set_id: String,
    pub query_id: String,
}

impl TestIdentity {
    pub fn new(query_set_id: impl Into<String>, query_id: impl Into<String>) -> Self {
        Self {
            query_set_id: query_set_id.into(),
            query_id: query_id.into(),
        }
    }
}

impl fmt::Display for TestIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.query_set_id, self.query_id)
    }
}

// ============================================================================
// THROWN ERRORS
// ============================================================================

/// A structured error: class, message and cause chain.
///
/// Built from any `std::error::Error` by walking `source()`, and rendered
/// as-is into reports. An expected-exception document has the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrownError {
    pub class: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<ThrownError>>,
}

impl ThrownError {
    pub fn new(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: ThrownError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Captures `err` and its whole `source()` chain. The outer class is the
    /// name of `E`; a cause is named when it is a known error type, else it
    /// is `"error"`. A [`HarnessError`] is named with its variant.
    pub fn from_error<E: std::error::Error + 'static>(err: &E) -> Self {
        Self::capture(err, short_type_name(std::any::type_name::<E>()))
    }

    fn capture(err: &(dyn std::error::Error + 'static), fallback: &str) -> Self {
        if let Some(thrown) = err.downcast_ref::<ThrownError>() {
            return thrown.clone();
        }
        let class = if let Some(harness) = err.downcast_ref::<HarnessError>() {
            format!("HarnessError::{}", harness.kind())
        } else if err.is::<std::io::Error>() {
            "std::io::Error".to_string()
        } else {
            fallback.to_string()
        };
        Self {
            class,
            message: err.to_string(),
            cause: err
                .source()
                .map(|cause| Box::new(Self::capture(cause, "error"))),
        }
    }

    /// Iterates this error and its causes, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &ThrownError> {
        std::iter::successors(Some(self), |e| e.cause.as_deref())
    }
}

// "alloc::vec::Vec<u8>" -> "Vec"
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl fmt::Display for ThrownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.class, self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, "\ncaused by: {}", cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for ThrownError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|c| c as &(dyn std::error::Error + 'static))
    }
}

// ============================================================================
// FAILURES
// ============================================================================

/// One accumulated failure cause. The message may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Failure {
    pub message: Option<String>,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn without_message() -> Self {
        Self { message: None }
    }

    pub fn from_error(err: &dyn std::error::Error) -> Self {
        Self::new(err.to_string())
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl From<&Mismatch> for Failure {
    fn from(mismatch: &Mismatch) -> Self {
        Failure::new(mismatch.to_string())
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Failure::new(message)
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Failure::new(message)
    }
}

// ============================================================================
// OUTCOMES
// ============================================================================

/// The immutable record of one executed test.
#[derive(Debug, Clone, PartialEq)]
pub struct TestOutcome {
    pub identity: TestIdentity,
    pub query: Option<String>,
    pub error: Option<ThrownError>,
    pub failures: Vec<Failure>,
}

impl TestOutcome {
    pub fn new(identity: TestIdentity) -> Self {
        Self {
            identity,
            query: None,
            error: None,
            failures: Vec::new(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_error(mut self, error: ThrownError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_failure(mut self, failure: impl Into<Failure>) -> Self {
        self.failures.push(failure.into());
        self
    }

    pub fn with_failures(mut self, failures: impl IntoIterator<Item = Failure>) -> Self {
        self.failures.extend(failures);
        self
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some() || !self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Debug)]
    struct Wrapper(io::Error);

    impl fmt::Display for Wrapper {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "query failed")
        }
    }

    impl std::error::Error for Wrapper {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn thrown_error_captures_cause_chain() {
        let err = Wrapper(io::Error::new(io::ErrorKind::Other, "socket closed"));
        let thrown = ThrownError::from_error(&err);
        let chain: Vec<_> = thrown.chain().map(|e| e.message.as_str()).collect();
        assert_eq!(chain, vec!["query failed", "socket closed"]);
        assert_eq!(thrown.class, "Wrapper");
        assert_eq!(thrown.cause.as_ref().unwrap().class, "std::io::Error");
        assert_eq!(thrown.chain().count(), 2);
    }

    #[test]
    fn harness_errors_are_named_by_variant() {
        let err = HarnessError::Cursor("connection reset".to_string());
        let thrown = ThrownError::from_error(&err);
        assert_eq!(thrown.class, "HarnessError::Cursor");
        assert!(thrown.cause.is_none());

        let wrapped = ThrownError::from_error(&Wrapper(io::Error::new(io::ErrorKind::Other, "x")));
        assert_eq!(wrapped.chain().last().unwrap().class, "std::io::Error");
    }

    #[test]
    fn outcome_builder_accumulates_failures() {
        let outcome = TestOutcome::new(TestIdentity::new("set", "q1"))
            .with_failure("first")
            .with_failure(Failure::without_message());
        assert_eq!(outcome.failures.len(), 2);
        assert!(outcome.is_failed());
        assert_eq!(outcome.failures[1].message(), None);
    }
}

//! The logical shape of an error report.
//!
//! ```json
//! {
//!   "results": [
//!     {
//!       "query_set": "...", "name": "...", "query": "...",
//!       "failures": ["..."],
//!       "actual_exception": { ... }  |  "actual_results": { ... },
//!       "expected_results": { ... }  |  "expected_exception": { ... },
//!       "render_failures": [ ... ]
//!     }
//!   ]
//! }
//! ```

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::expected::is_exception;
use crate::outcome::{Failure, TestOutcome, ThrownError};
use crate::results::ResultsBlock;

/// Written in place of absent query text or failure messages.
pub const NULL_MARKER: &str = "NULL";

static UNPRINTABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F\x{FFFE}\x{FFFF}]")
        .expect("unprintable character pattern is valid")
});

/// Replaces control characters that have no printable form with `\uXXXX`
/// escapes. Tab, newline and carriage return are kept.
pub fn escape_unprintable(text: &str) -> String {
    UNPRINTABLE
        .replace_all(text, |caps: &Captures| {
            caps[0]
                .chars()
                .map(|c| format!("\\u{:04X}", c as u32))
                .collect::<String>()
        })
        .into_owned()
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportDocument {
    pub results: Vec<ResultBlock>,
}

impl ReportDocument {
    pub fn single(block: ResultBlock) -> Self {
        Self {
            results: vec![block],
        }
    }
}

/// Everything reported for one failing test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBlock {
    pub query_set: String,
    pub name: String,
    pub query: String,
    #[serde(default)]
    pub failures: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_exception: Option<ThrownError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_results: Option<ResultsBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_results: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_exception: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub render_failures: Vec<ThrownError>,
}

impl ResultBlock {
    /// Starts a block with the outcome's identity, query text and failure
    /// messages.
    pub fn new(outcome: &TestOutcome) -> Self {
        Self {
            query_set: outcome.identity.query_set_id.clone(),
            name: outcome.identity.query_id.clone(),
            query: outcome
                .query
                .clone()
                .unwrap_or_else(|| NULL_MARKER.to_string()),
            failures: outcome.failures.iter().map(failure_text).collect(),
            actual_exception: None,
            actual_results: None,
            expected_results: None,
            expected_exception: None,
            render_failures: Vec::new(),
        }
    }

    /// Embeds a parsed expected-results document, tagged by whether it
    /// carries the exception marker.
    pub fn set_expected(&mut self, doc: serde_json::Value) {
        if is_exception(&doc) {
            self.expected_results = None;
            self.expected_exception = Some(doc);
        } else {
            self.expected_exception = None;
            self.expected_results = Some(doc);
        }
    }
}

fn failure_text(failure: &Failure) -> String {
    escape_unprintable(failure.message().unwrap_or(NULL_MARKER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::TestIdentity;
    use serde_json::json;

    #[test]
    fn unprintable_characters_are_escaped() {
        assert_eq!(escape_unprintable("a\u{0}b\u{1b}c"), "a\\u0000b\\u001Bc");
        assert_eq!(escape_unprintable("tab\there\nline"), "tab\there\nline");
    }

    #[test]
    fn expected_block_is_tagged_by_marker() {
        let outcome = TestOutcome::new(TestIdentity::new("set", "q"));
        let mut block = ResultBlock::new(&outcome);
        block.set_expected(json!({"class": "SQLException", "message": "boom"}));
        assert!(block.expected_exception.is_some());
        assert!(block.expected_results.is_none());

        block.set_expected(json!({"columns": [], "rows": []}));
        assert!(block.expected_exception.is_none());
        assert!(block.expected_results.is_some());
    }

    #[test]
    fn absent_query_and_messages_render_null() {
        let outcome =
            TestOutcome::new(TestIdentity::new("set", "q")).with_failure(Failure::without_message());
        let block = ResultBlock::new(&outcome);
        assert_eq!(block.query, NULL_MARKER);
        assert_eq!(block.failures, vec![NULL_MARKER.to_string()]);
    }
}

//! Expected results.
//!
//! An expected-results reference is an opaque handle that resolves to a
//! structured document. A results document has the [`ResultsBlock`] shape; an
//! expected-exception document carries the [`EXCEPTION_MARKER`] field (it has
//! the [`ThrownError`](crate::outcome::ThrownError) shape). Either may also
//! carry the `query` text the results were captured for.
//!
//! [`DirectoryLocator`] resolves identities to files laid out as
//! `<root>/<query_set_id>/<query_id>.{json,yaml,yml}`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::errors::{HarnessError, Result};
use crate::outcome::TestIdentity;
use crate::results::{ResultTable, ResultsBlock};

/// Field whose presence marks a document as an expected exception.
pub const EXCEPTION_MARKER: &str = "class";

pub trait ExpectedResults {
    fn identity(&self) -> &TestIdentity;

    /// Where the document lives, for diagnostics.
    fn location(&self) -> String;

    fn parse(&self) -> Result<serde_json::Value>;

    /// Query text recorded alongside the expected results, if any.
    fn query(&self) -> Result<Option<String>> {
        Ok(self
            .parse()?
            .get("query")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string))
    }

    /// The expected table, or `None` if the document is an expected
    /// exception.
    fn table(&self) -> Result<Option<ResultTable>> {
        let doc = self.parse()?;
        if is_exception(&doc) {
            return Ok(None);
        }
        let block: ResultsBlock =
            serde_json::from_value(doc).map_err(|e| HarnessError::Parse {
                location: self.location(),
                message: e.to_string(),
            })?;
        ResultTable::from_results_block(&block).map(Some)
    }
}

/// Whether a parsed document represents an expected exception.
pub fn is_exception(doc: &serde_json::Value) -> bool {
    doc.get(EXCEPTION_MARKER).is_some()
}

pub trait ExpectedResultsLocator {
    /// Returns the expected results for `identity`, if any were captured.
    fn locate(&self, identity: &TestIdentity) -> Option<Box<dyn ExpectedResults>>;
}

/// Expected results stored in a JSON or YAML file.
#[derive(Debug, Clone)]
pub struct FileExpectedResults {
    identity: TestIdentity,
    path: PathBuf,
}

impl FileExpectedResults {
    pub fn new(identity: TestIdentity, path: impl Into<PathBuf>) -> Self {
        Self {
            identity,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_yaml(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml")
    }
}

impl ExpectedResults for FileExpectedResults {
    fn identity(&self) -> &TestIdentity {
        &self.identity
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn parse(&self) -> Result<serde_json::Value> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| HarnessError::resource(&self.path, e))?;
        let parsed: std::result::Result<serde_json::Value, String> = if self.is_yaml() {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| HarnessError::Parse {
            location: self.location(),
            message,
        })
    }
}

/// Indexes a directory tree of expected-results files by test identity.
#[derive(Debug, Clone)]
pub struct DirectoryLocator {
    root: PathBuf,
    index: HashMap<TestIdentity, PathBuf>,
}

impl DirectoryLocator {
    fn is_expected_file(path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext == "json" || ext == "yaml" || ext == "yml")
    }

    /// Walks `root` and indexes every expected-results file. When two files
    /// map to the same identity, the first in sorted order wins.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let mut files = Vec::new();
        for entry in WalkDir::new(&root).min_depth(2).max_depth(2) {
            let entry = entry.map_err(|e| HarnessError::Config(format!(
                "failed to walk expected results directory {}: {}",
                root.display(),
                e
            )))?;
            if entry.file_type().is_file() && Self::is_expected_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
        files.sort();

        let mut index: HashMap<TestIdentity, PathBuf> = HashMap::new();
        for path in files {
            let (Some(set), Some(query)) = (
                path.parent().and_then(Path::file_name),
                path.file_stem(),
            ) else {
                continue;
            };
            let identity = TestIdentity::new(set.to_string_lossy(), query.to_string_lossy());
            if let Some(existing) = index.get(&identity) {
                warn!(
                    "Ignoring {}: expected results for {} already at {}",
                    path.display(),
                    identity,
                    existing.display()
                );
                continue;
            }
            index.insert(identity, path);
        }
        debug!("Indexed {} expected results under {}", index.len(), root.display());
        Ok(Self { root, index })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl ExpectedResultsLocator for DirectoryLocator {
    fn locate(&self, identity: &TestIdentity) -> Option<Box<dyn ExpectedResults>> {
        self.index.get(identity).map(|path| {
            Box::new(FileExpectedResults::new(identity.clone(), path.clone()))
                as Box<dyn ExpectedResults>
        })
    }
}

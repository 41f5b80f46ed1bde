//! # Error Reports
//!
//! Renders failing test outcomes into durable artifacts under one report
//! directory:
//!
//! - one structured report per failing test (`<set>_<query>.err.json`),
//! - optionally, a consolidated failure-message file with one line per
//!   accumulated failure (`<set>_<query>.err.messages.txt`).
//!
//! The directory is wiped and recreated when the generator is constructed, so
//! no report from an earlier run survives. File names depend only on the test
//! identity, so a rerun of the same query overwrites its report.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use serde::Serialize;

use crate::errors::{HarnessError, Result};
use crate::expected::ExpectedResults;
use crate::outcome::{TestOutcome, ThrownError};
use crate::results::{materialize, ResultCursor};

pub mod document;
pub mod naming;

pub use document::{escape_unprintable, ReportDocument, ResultBlock, NULL_MARKER};

// ============================================================================
// REPORT INPUTS
// ============================================================================

/// A failing outcome together with the live data that goes into its report.
///
/// The cursor is borrowed mutably because it is rewound before it is read.
pub struct FailedTest<'a> {
    pub outcome: &'a TestOutcome,
    pub cursor: Option<&'a mut dyn ResultCursor>,
    pub expected: Option<&'a dyn ExpectedResults>,
}

impl<'a> FailedTest<'a> {
    pub fn new(outcome: &'a TestOutcome) -> Self {
        Self {
            outcome,
            cursor: None,
            expected: None,
        }
    }

    pub fn with_cursor(mut self, cursor: &'a mut dyn ResultCursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn with_expected(mut self, expected: &'a dyn ExpectedResults) -> Self {
        self.expected = Some(expected);
        self
    }
}

/// File names written for one failing test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub error_file: String,
    pub messages_file: Option<String>,
}

// ============================================================================
// GENERATOR
// ============================================================================

#[derive(Debug)]
pub struct ErrorReportGenerator {
    directory: PathBuf,
}

impl ErrorReportGenerator {
    /// Removes `directory` and everything in it, then recreates it empty.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        if directory.exists() {
            fs::remove_dir_all(&directory).map_err(|e| HarnessError::resource(&directory, e))?;
        }
        fs::create_dir_all(&directory).map_err(|e| HarnessError::resource(&directory, e))?;
        info!("Reset report directory {}", directory.display());
        Ok(Self { directory })
    }

    pub fn error_directory(&self) -> &Path {
        &self.directory
    }

    /// Writes a minimal report: identity and failure messages, plus the
    /// thrown error if the outcome carries one. The query is always written as
    /// [`NULL_MARKER`]. Returns the file name.
    pub fn generate_error_file(&self, outcome: &TestOutcome) -> Result<String> {
        let file_name = naming::error_file_name(&outcome.identity);
        let path = self.directory.join(&file_name);
        warn!("Generate error file: {}", path.display());

        let mut block = ResultBlock::new(outcome);
        block.query = NULL_MARKER.to_string();
        block.actual_exception = outcome.error.clone();
        write_report(&path, &ReportDocument::single(block))?;
        Ok(file_name)
    }

    /// Writes the full report for a failing test. Without an expected-results
    /// reference this is [`generate_error_file`](Self::generate_error_file).
    ///
    /// The thrown error, if any, is rendered instead of the cursor; otherwise
    /// the cursor is rewound and read in full. A failure to parse the expected
    /// results is recorded inside the report.
    pub fn generate_error_file_for(&self, failed: FailedTest<'_>) -> Result<String> {
        let FailedTest {
            outcome,
            cursor,
            expected,
        } = failed;
        let Some(expected) = expected else {
            return self.generate_error_file(outcome);
        };

        let file_name = naming::error_file_name(&outcome.identity);
        let path = self.directory.join(&file_name);
        warn!("Generate error file with results: {}", path.display());

        let mut block = ResultBlock::new(outcome);
        if let Some(error) = &outcome.error {
            debug!("Rendering actual exception for {}", outcome.identity);
            block.actual_exception = Some(error.clone());
        } else if let Some(cursor) = cursor {
            debug!("Rendering actual results for {}", outcome.identity);
            block.actual_results = Some(materialize(cursor)?.to_results_block());
        }

        match expected.parse() {
            Ok(doc) => block.set_expected(doc),
            Err(err) => {
                warn!(
                    "Could not render expected results from {}: {}",
                    expected.location(),
                    err
                );
                block.render_failures.push(render_failure(&expected.location(), &err));
            }
        }

        write_report(&path, &ReportDocument::single(block))?;
        Ok(file_name)
    }

    /// Writes one line per failure message. Line breaks inside a message are
    /// written as `\n` and `\r` so each message stays on its own line. A
    /// failure to sync the finished file is logged only.
    pub fn generate_error_messages_file(&self, outcome: &TestOutcome) -> Result<String> {
        let file_name = naming::messages_file_name(&outcome.identity);
        let path = self.directory.join(&file_name);
        warn!("Generate error messages file: {}", path.display());

        let file = File::create(&path).map_err(|e| HarnessError::resource(&path, e))?;
        let mut writer = BufWriter::new(file);
        for failure in &outcome.failures {
            writeln!(writer, "{}", single_line(failure.message().unwrap_or(NULL_MARKER)))
                .map_err(|e| HarnessError::resource(&path, e))?;
        }
        let file = writer
            .into_inner()
            .map_err(|e| HarnessError::resource(&path, e.into_error()))?;
        if let Err(e) = file.sync_all() {
            error!("Cannot close error messages file {}: {}", path.display(), e);
        }
        Ok(file_name)
    }

    /// Writes the full report and, when more than one failure accumulated,
    /// the consolidated message file.
    pub fn generate_reports(&self, failed: FailedTest<'_>) -> Result<ReportFiles> {
        let outcome = failed.outcome;
        let error_file = self.generate_error_file_for(failed)?;
        let messages_file = if outcome.failures.len() > 1 {
            Some(self.generate_error_messages_file(outcome)?)
        } else {
            None
        };
        Ok(ReportFiles {
            error_file,
            messages_file,
        })
    }
}

// ============================================================================
// FILE OUTPUT
// ============================================================================

fn single_line(message: &str) -> String {
    message.replace('\r', "\\r").replace('\n', "\\n")
}

fn render_failure(location: &str, err: &HarnessError) -> ThrownError {
    let render = HarnessError::Render {
        block: format!("expected results from {}", location),
        message: err.to_string(),
    };
    ThrownError::from_error(&render).with_cause(ThrownError::from_error(err))
}

/// Serializes `doc` to `path` with a two-space indent. The handle is released
/// on every return path.
fn write_report(path: &Path, doc: &ReportDocument) -> Result<()> {
    let file = File::create(path).map_err(|e| HarnessError::resource(path, e))?;
    let mut writer = BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    doc.serialize(&mut serializer)
        .map_err(|e| HarnessError::resource(path, e.into()))?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| HarnessError::resource(path, e))
}

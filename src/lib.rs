//! qtest: a query-testing harness.
//!
//! Query results are captured into [`ResultTable`]s, compared against
//! expected results, and every failing test is written to a structured
//! report by the [`ErrorReportGenerator`]. How each query is wrapped in a
//! transaction is decided once per run by [`TransactionStrategy::select`].
//!
//! - [`results`]: tables, values, the binary codec and comparison.
//! - [`transaction`]: strategies and the [`transaction::DataSource`] seam.
//! - [`expected`]: expected-results documents and their lookup.
//! - [`report`]: report files for failing tests.
//! - [`config`] and [`cli`]: the `qtest` binary.

pub use crate::errors::{HarnessError, Result};
pub use crate::outcome::{Failure, TestIdentity, TestOutcome, ThrownError};
pub use crate::report::ErrorReportGenerator;
pub use crate::results::{ColumnDescriptor, ResultTable, Value};
pub use crate::transaction::TransactionStrategy;

pub mod cli;
pub mod config;
pub mod errors;
pub mod expected;
pub mod outcome;
pub mod report;
pub mod results;
pub mod transaction;

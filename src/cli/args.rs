//! Defines the command-line arguments and subcommands for the qtest CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "qtest",
    version,
    about = "Compare query results against captured expectations and write failure reports."
)]
pub struct QtestArgs {
    /// Log level: off, error, warn, info, debug or trace.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a serialized result table.
    Dump {
        /// The binary table file.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Compare two serialized result tables and show their differences.
    Diff {
        /// The expected table.
        #[arg(required = true)]
        expected: PathBuf,
        /// The actual table.
        #[arg(required = true)]
        actual: PathBuf,
    },
    /// Show which transaction strategy a transaction-option value selects.
    Strategy {
        /// The option value; omitted means not configured.
        value: Option<String>,
    },
    /// Check an actual table against its expected results and write reports
    /// on failure.
    Check {
        /// The harness configuration file.
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// The query set the query belongs to.
        #[arg(long, required = true)]
        query_set: String,
        /// The query identifier within the set.
        #[arg(long, required = true)]
        query_id: String,
        /// The serialized actual result table.
        #[arg(long, required = true)]
        actual: PathBuf,
        /// The query text, if not recorded with the expected results.
        #[arg(long)]
        query: Option<String>,
    },
    /// Convert a JSON results document into a serialized result table.
    Encode {
        /// The JSON document with `columns` and `rows`.
        #[arg(required = true)]
        input: PathBuf,
        /// Where to write the binary table.
        #[arg(required = true)]
        output: PathBuf,
    },
}

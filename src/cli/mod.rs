//! The qtest Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::{debug, info};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

use crate::cli::args::{Command, QtestArgs};
use crate::config::HarnessConfig;
use crate::errors::{HarnessError, Result};
use crate::expected::{DirectoryLocator, ExpectedResultsLocator};
use crate::outcome::{Failure, TestIdentity, TestOutcome};
use crate::report::{ErrorReportGenerator, FailedTest, NULL_MARKER};
use crate::results::{compare, ResultTable, ResultsBlock, TableCursor};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
///
/// Exits with status 1 when a comparison fails and 2 on any error.
pub fn run() {
    let args = QtestArgs::parse();
    let log_level = args.log_level;

    let result = match args.command {
        Command::Dump { file } => {
            init_logging(log_level.as_deref()).and_then(|_| handle_dump(&file))
        }
        Command::Diff { expected, actual } => {
            init_logging(log_level.as_deref()).and_then(|_| handle_diff(&expected, &actual))
        }
        Command::Strategy { value } => {
            init_logging(log_level.as_deref()).and_then(|_| handle_strategy(value.as_deref()))
        }
        Command::Check {
            config,
            query_set,
            query_id,
            actual,
            query,
        } => handle_check(
            &config,
            log_level.as_deref(),
            TestIdentity::new(query_set, query_id),
            &actual,
            query,
        ),
        Command::Encode { input, output } => {
            init_logging(log_level.as_deref()).and_then(|_| handle_encode(&input, &output))
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            process::exit(2);
        }
    }
}

fn init_logging(level: Option<&str>) -> Result<()> {
    let level = level.unwrap_or("warn");
    let filter: LevelFilter = level
        .parse()
        .map_err(|_| HarnessError::Config(format!("invalid log level {}", level)))?;
    let mut config = ConfigBuilder::new();
    if filter != LevelFilter::Debug && filter != LevelFilter::Trace {
        config.add_filter_allow_str("qtest");
    }
    // A logger may already be installed when run is driven from a test.
    let _ = TermLogger::init(
        filter,
        config.build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
    Ok(())
}

fn read_table(path: &Path) -> Result<ResultTable> {
    let file = File::open(path).map_err(|e| HarnessError::resource(path, e))?;
    ResultTable::decode_from(&mut BufReader::new(file))
}

fn handle_dump(path: &Path) -> Result<bool> {
    let table = read_table(path)?;
    print!("{}", table);
    Ok(true)
}

fn handle_diff(expected: &Path, actual: &Path) -> Result<bool> {
    let expected = read_table(expected)?;
    let actual = read_table(actual)?;
    let mismatches = compare(&expected, &actual);
    if mismatches.is_empty() {
        println!("Tables are equal");
        return Ok(true);
    }
    output::print_mismatches(&mismatches);
    output::print_table_diff(&expected.to_string(), &actual.to_string());
    Ok(false)
}

fn handle_strategy(value: Option<&str>) -> Result<bool> {
    let strategy = crate::transaction::TransactionStrategy::select(value);
    println!("{}", strategy);
    Ok(true)
}

fn handle_encode(input: &Path, output: &Path) -> Result<bool> {
    let text = fs::read_to_string(input).map_err(|e| HarnessError::resource(input, e))?;
    let block: ResultsBlock = serde_json::from_str(&text).map_err(|e| HarnessError::Parse {
        location: input.display().to_string(),
        message: e.to_string(),
    })?;
    let table = ResultTable::from_results_block(&block)?;

    let file = File::create(output).map_err(|e| HarnessError::resource(output, e))?;
    let mut writer = BufWriter::new(file);
    table.encode_into(&mut writer)?;
    writer
        .flush()
        .map_err(|e| HarnessError::resource(output, e))?;
    println!(
        "Wrote {} columns, {} rows to {}",
        table.column_count(),
        table.row_count(),
        output.display()
    );
    Ok(true)
}

fn handle_check(
    config: &Path,
    log_level: Option<&str>,
    identity: TestIdentity,
    actual: &Path,
    query: Option<String>,
) -> Result<bool> {
    let cfg = HarnessConfig::load(config)?;
    init_logging(log_level.or(Some(cfg.log_level.as_str())))?;
    debug!(
        "Configured transaction strategy: {}",
        cfg.transaction_strategy()
    );

    let actual = read_table(actual)?;
    let expected_dir: PathBuf = cfg.expected_results_dir.clone().ok_or_else(|| {
        HarnessError::Config("required setting expected_results_dir is not defined".to_string())
    })?;
    let locator = DirectoryLocator::new(expected_dir)?;
    let expected = locator.locate(&identity);

    let mut failures = Vec::new();
    match expected.as_deref() {
        None => failures.push(Failure::new(format!(
            "No expected results found for {}",
            identity
        ))),
        Some(exp) => match exp.table() {
            Ok(Some(table)) => {
                failures.extend(compare(&table, &actual).iter().map(Failure::from))
            }
            Ok(None) => failures.push(Failure::new(
                "Expected an exception but the query returned results",
            )),
            Err(e) => failures.push(Failure::from_error(&e)),
        },
    }

    if failures.is_empty() {
        output::print_pass(&identity);
        return Ok(true);
    }

    let query = query.or_else(|| expected.as_deref().and_then(|e| e.query().ok().flatten()));
    let mut outcome = TestOutcome::new(identity).with_failures(failures);
    if let Some(query) = query {
        outcome = outcome.with_query(query);
    }

    let generator = ErrorReportGenerator::new(cfg.errors_dir()?)?;
    let mut cursor = TableCursor::new(actual);
    let mut failed = FailedTest::new(&outcome).with_cursor(&mut cursor);
    if let Some(exp) = expected.as_deref() {
        failed = failed.with_expected(exp);
    }
    let files = generator.generate_reports(failed)?;
    info!("Reports written for {}", outcome.identity);

    let messages: Vec<String> = outcome
        .failures
        .iter()
        .map(|f| f.message().unwrap_or(NULL_MARKER).to_string())
        .collect();
    output::print_failure(
        &outcome.identity,
        &messages,
        &files,
        generator.error_directory(),
    );
    Ok(false)
}

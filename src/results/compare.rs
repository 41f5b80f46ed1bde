//! Expected-vs-actual comparison of result tables.

use std::fmt;

use crate::results::{ResultTable, Value};

/// Cell mismatches reported before the rest are summarized.
pub const MAX_CELL_MISMATCHES: usize = 100;

/// One difference between an expected and an actual table.
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    /// The column name sequences differ. No cells are compared.
    Columns {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    RowCount { expected: usize, actual: usize },
    Cell {
        row: usize,
        column: String,
        expected: Value,
        actual: Value,
    },
    /// Further cell mismatches past the reporting cap.
    Truncated { remaining: usize },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Columns { expected, actual } => write!(
                f,
                "Column mismatch: expected [{}] but got [{}]",
                expected.join(", "),
                actual.join(", ")
            ),
            Mismatch::RowCount { expected, actual } => write!(
                f,
                "Row count mismatch: expected {} rows but got {}",
                expected, actual
            ),
            Mismatch::Cell {
                row,
                column,
                expected,
                actual,
            } => write!(
                f,
                "Value mismatch at row {}, column {}: expected {} but got {}",
                row, column, expected, actual
            ),
            Mismatch::Truncated { remaining } => {
                write!(f, "{} further value mismatches not reported", remaining)
            }
        }
    }
}

/// Compares `actual` against `expected`, returning every difference in
/// reporting order. An empty result means the tables are equal.
pub fn compare(expected: &ResultTable, actual: &ResultTable) -> Vec<Mismatch> {
    if expected.columns() != actual.columns() {
        return vec![Mismatch::Columns {
            expected: expected.columns().to_vec(),
            actual: actual.columns().to_vec(),
        }];
    }

    let mut mismatches = Vec::new();
    if expected.row_count() != actual.row_count() {
        mismatches.push(Mismatch::RowCount {
            expected: expected.row_count(),
            actual: actual.row_count(),
        });
    }

    let mut cells = 0;
    for (row, (exp_row, act_row)) in expected.rows().iter().zip(actual.rows()).enumerate() {
        for ((column, exp), act) in expected.columns().iter().zip(exp_row).zip(act_row) {
            if exp == act {
                continue;
            }
            cells += 1;
            if cells <= MAX_CELL_MISMATCHES {
                mismatches.push(Mismatch::Cell {
                    row,
                    column: column.clone(),
                    expected: exp.clone(),
                    actual: act.clone(),
                });
            }
        }
    }
    if cells > MAX_CELL_MISMATCHES {
        mismatches.push(Mismatch::Truncated {
            remaining: cells - MAX_CELL_MISMATCHES,
        });
    }
    mismatches
}

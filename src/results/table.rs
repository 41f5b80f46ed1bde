//! The in-memory result table.
//!
//! A [`ResultTable`] holds one query's output as an ordered list of columns and
//! an ordered list of rows, each row aligned positionally to the columns:
//!
//! ```text
//!  Row # |  COL1    COL2    ...   COLN
//! -------|------------------------------
//!    0   |  v01     v02           v0N
//!    :   |   :       :             :
//!    M   |  vM1     vM2           vMN
//! ```
//!
//! Column order is the select-list order and is part of the table's identity.

use std::collections::HashMap;
use std::fmt;

use crate::errors::{HarnessError, Result};
use crate::results::{ColumnDescriptor, Value};

#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    columns: Vec<String>,
    descriptors: HashMap<String, ColumnDescriptor>,
    rows: Vec<Vec<Value>>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `columns` in order and pre-allocates `rows` rows of null
    /// placeholders. Without columns no rows are allocated.
    pub fn with_columns(columns: impl IntoIterator<Item = ColumnDescriptor>, rows: usize) -> Self {
        let mut table = Self::new();
        table.add_columns(columns);
        if table.column_count() > 0 {
            let width = table.column_count();
            table.rows = (0..rows).map(|_| vec![Value::Null; width]).collect();
        }
        table
    }

    /// Appends a column. Every existing row gains a null cell at the new
    /// position. A name that is already registered has its descriptor
    /// replaced.
    pub fn add_column(&mut self, descriptor: ColumnDescriptor) {
        self.columns.push(descriptor.name().to_string());
        self.descriptors
            .insert(descriptor.name().to_string(), descriptor);
        for row in &mut self.rows {
            row.push(Value::Null);
        }
    }

    pub fn add_columns(&mut self, descriptors: impl IntoIterator<Item = ColumnDescriptor>) {
        for descriptor in descriptors {
            self.add_column(descriptor);
        }
    }

    /// Appends a row of null placeholders and returns the new row count.
    pub fn add_row(&mut self) -> Result<usize> {
        if self.columns.is_empty() {
            return Err(HarnessError::InvalidState(
                "cannot add row; no columns have been defined".to_string(),
            ));
        }
        self.rows.push(vec![Value::Null; self.columns.len()]);
        Ok(self.rows.len())
    }

    /// Appends a row of values and returns the new row count. The number of
    /// values must equal the column count.
    pub fn add_row_values(&mut self, values: Vec<Value>) -> Result<usize> {
        if values.len() != self.columns.len() {
            return Err(HarnessError::InvalidArgument(format!(
                "attempt to add row with {} values when {} columns are defined",
                values.len(),
                self.columns.len()
            )));
        }
        self.rows.push(values);
        Ok(self.rows.len())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column names in select-list order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn descriptor(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.descriptors.get(name)
    }

    /// Descriptors in column order.
    ///
    /// # Panics
    /// If a column name has no registered descriptor.
    pub fn descriptors(&self) -> Vec<&ColumnDescriptor> {
        self.columns.iter().map(|name| &self.descriptors[name]).collect()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Result<&[Value]> {
        self.rows
            .get(index)
            .map(Vec::as_slice)
            .ok_or(HarnessError::OutOfRange {
                index,
                len: self.rows.len(),
            })
    }

    /// Declared type of each column, in column order.
    ///
    /// # Panics
    /// If a column name has no registered descriptor.
    pub fn column_types(&self) -> Vec<&str> {
        self.descriptors()
            .into_iter()
            .map(ColumnDescriptor::data_type)
            .collect()
    }
}

impl PartialEq for ResultTable {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns && self.rows == other.rows
    }
}

impl Eq for ResultTable {}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Query Results...")?;
        for name in &self.columns {
            match self.descriptors.get(name) {
                Some(info) => write!(
                    f,
                    "[{} - [{}, {}]] ",
                    name,
                    info.data_type(),
                    info.native_class()
                )?,
                None => write!(f, "[{}] ", name)?,
            }
        }
        writeln!(f)?;
        for (i, row) in self.rows.iter().enumerate() {
            let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
            writeln!(f, "{}: {}", i, cells.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str) -> ColumnDescriptor {
        ColumnDescriptor::new(name, "string").unwrap()
    }

    #[test]
    fn display_lists_columns_then_rows() {
        let mut table = ResultTable::with_columns(vec![col("ID"), col("NAME")], 0);
        table
            .add_row_values(vec![Value::from(1), Value::from("a")])
            .unwrap();
        assert_eq!(
            table.to_string(),
            "Query Results...\n[ID - [string, string]] [NAME - [string, string]] \n0: 1, a\n"
        );
    }

    #[test]
    fn duplicate_name_overwrites_descriptor() {
        let mut table = ResultTable::new();
        table.add_column(col("A"));
        table.add_column(ColumnDescriptor::new("A", "integer").unwrap());
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column_types(), vec!["integer", "integer"]);
    }

    #[test]
    fn rows_are_not_allocated_without_columns() {
        let table = ResultTable::with_columns(Vec::new(), 5);
        assert_eq!(table.row_count(), 0);
    }
}

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::results::{ColumnDescriptor, ResultTable, Value};

/// Structured rendering of a result table, shared by reports and
/// expected-results documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsBlock {
    pub columns: Vec<ColumnBlock>,
    #[serde(default)]
    pub rows: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnBlock {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl ResultTable {
    pub fn to_results_block(&self) -> ResultsBlock {
        ResultsBlock {
            columns: self
                .descriptors()
                .into_iter()
                .map(|d| ColumnBlock {
                    name: d.name().to_string(),
                    data_type: d.data_type().to_string(),
                    class: Some(d.native_class().to_string()),
                })
                .collect(),
            rows: self
                .rows()
                .iter()
                .map(|row| row.iter().map(Value::to_json).collect())
                .collect(),
        }
    }

    /// Rebuilds a table from its structured rendering. Fails on an empty
    /// column name or a row whose width differs from the column count.
    pub fn from_results_block(block: &ResultsBlock) -> Result<ResultTable> {
        let mut table = ResultTable::new();
        for column in &block.columns {
            let descriptor = match &column.class {
                Some(class) => ColumnDescriptor::with_class(&column.name, &column.data_type, class)?,
                None => ColumnDescriptor::new(&column.name, &column.data_type)?,
            };
            table.add_column(descriptor);
        }
        for row in &block.rows {
            table.add_row_values(row.iter().map(Value::from_json).collect())?;
        }
        Ok(table)
    }
}

use crate::errors::{HarnessError, Result};
use crate::results::{ColumnDescriptor, ResultTable, Value};

/// A live, forward-reading result cursor produced by executing a query.
///
/// Cursors are owned by whoever executed the query. The harness only
/// repositions and reads them; it never closes or commits.
pub trait ResultCursor {
    /// Positions the cursor before its first row.
    fn rewind(&mut self) -> Result<()>;

    /// Column metadata in select-list order.
    fn columns(&self) -> Result<Vec<ColumnDescriptor>>;

    /// Returns the next row, or `None` past the last one.
    fn next_row(&mut self) -> Result<Option<Vec<Value>>>;
}

/// Rewinds `cursor` and reads it in full into a table.
pub fn materialize(cursor: &mut dyn ResultCursor) -> Result<ResultTable> {
    cursor.rewind()?;
    let mut table = ResultTable::with_columns(cursor.columns()?, 0);
    while let Some(row) = cursor.next_row()? {
        if table.column_count() == 0 {
            return Err(HarnessError::Cursor(
                "cursor returned a row but declares no columns".to_string(),
            ));
        }
        table.add_row_values(row)?;
    }
    Ok(table)
}

/// A cursor over an in-memory table.
#[derive(Debug, Clone)]
pub struct TableCursor {
    table: ResultTable,
    position: usize,
}

impl TableCursor {
    pub fn new(table: ResultTable) -> Self {
        Self { table, position: 0 }
    }

    pub fn into_table(self) -> ResultTable {
        self.table
    }
}

impl ResultCursor for TableCursor {
    fn rewind(&mut self) -> Result<()> {
        self.position = 0;
        Ok(())
    }

    fn columns(&self) -> Result<Vec<ColumnDescriptor>> {
        Ok(self.table.descriptors().into_iter().cloned().collect())
    }

    fn next_row(&mut self) -> Result<Option<Vec<Value>>> {
        let Ok(row) = self.table.row(self.position) else {
            return Ok(None);
        };
        let row = row.to_vec();
        self.position += 1;
        Ok(Some(row))
    }
}

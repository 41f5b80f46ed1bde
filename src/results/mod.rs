//! # Query Results
//!
//! The tabular result model and everything that operates on it directly.
//!
//! ## Module Structure
//!
//! - **`value`**: a single result cell
//! - **`column`**: per-column metadata
//! - **`table`**: the ordered column/row container
//! - **`codec`**: the fixed binary form of a table
//! - **`block`**: the structured (JSON) form used in reports
//! - **`compare`**: expected-vs-actual comparison
//! - **`cursor`**: live result cursors and materialization

pub mod block;
pub mod codec;
pub mod column;
pub mod compare;
pub mod cursor;
pub mod table;
pub mod value;

pub use block::{ColumnBlock, ResultsBlock};
pub use column::ColumnDescriptor;
pub use compare::{compare, Mismatch, MAX_CELL_MISMATCHES};
pub use cursor::{materialize, ResultCursor, TableCursor};
pub use table::ResultTable;
pub use value::Value;

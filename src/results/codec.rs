//! Binary form of a [`ResultTable`].
//!
//! The layout is fixed and big-endian:
//!
//! ```text
//! i32 column_count
//! column_count x (u16 name_len, utf8 name, descriptor)
//! i32 row_count
//! row_count x column_count x value        (row-major, column order)
//! ```
//!
//! Descriptors and values are Bincode-encoded with variable-length integers.
//! All columns are read, and the descriptor map rebuilt, before any row: the
//! column count is what tells the decoder how many values make up a row.

use std::io::{Read, Write};

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{HarnessError, Result};
use crate::results::{ColumnDescriptor, ResultTable, Value};

/// Returns the default Bincode options, initialized on first use.
fn bincode() -> &'static bincode::DefaultOptions {
    static BINCODE: std::sync::OnceLock<bincode::DefaultOptions> = std::sync::OnceLock::new();
    BINCODE.get_or_init(bincode::DefaultOptions::new)
}

fn io_error(err: std::io::Error) -> HarnessError {
    HarnessError::Encoding(err.to_string())
}

fn write_count<W: Write>(writer: &mut W, count: usize, what: &str) -> Result<()> {
    let count = i32::try_from(count)
        .map_err(|_| HarnessError::Encoding(format!("{} count {} exceeds i32", what, count)))?;
    writer.write_all(&count.to_be_bytes()).map_err(io_error)
}

fn read_count<R: Read>(reader: &mut R, what: &str) -> Result<usize> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf).map_err(io_error)?;
    let count = i32::from_be_bytes(buf);
    usize::try_from(count)
        .map_err(|_| HarnessError::Encoding(format!("negative {} count {}", what, count)))
}

fn write_utf<W: Write>(writer: &mut W, s: &str) -> Result<()> {
    let len = u16::try_from(s.len()).map_err(|_| {
        HarnessError::Encoding(format!("column name of {} bytes is too long", s.len()))
    })?;
    writer.write_all(&len.to_be_bytes()).map_err(io_error)?;
    writer.write_all(s.as_bytes()).map_err(io_error)
}

fn read_utf<R: Read>(reader: &mut R) -> Result<String> {
    let mut len = [0u8; 2];
    reader.read_exact(&mut len).map_err(io_error)?;
    let mut bytes = vec![0u8; u16::from_be_bytes(len) as usize];
    reader.read_exact(&mut bytes).map_err(io_error)?;
    String::from_utf8(bytes).map_err(|e| HarnessError::Encoding(e.to_string()))
}

fn write_item<W: Write, T: Serialize>(writer: &mut W, item: &T) -> Result<()> {
    Ok(bincode().serialize_into(writer, item)?)
}

fn read_item<R: Read, T: DeserializeOwned>(reader: &mut R) -> Result<T> {
    Ok(bincode().deserialize_from(reader)?)
}

impl ResultTable {
    /// Writes the table's binary form to `writer`.
    pub fn encode_into<W: Write>(&self, mut writer: W) -> Result<()> {
        write_count(&mut writer, self.column_count(), "column")?;
        for descriptor in self.descriptors() {
            write_utf(&mut writer, descriptor.name())?;
            write_item(&mut writer, descriptor)?;
        }
        write_count(&mut writer, self.row_count(), "row")?;
        for row in self.rows() {
            for value in row {
                write_item(&mut writer, value)?;
            }
        }
        writer.flush().map_err(io_error)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.encode_into(&mut bytes)?;
        Ok(bytes)
    }

    /// Reads a table from its binary form.
    pub fn decode_from<R: Read>(mut reader: R) -> Result<ResultTable> {
        let mut table = ResultTable::new();
        let columns = read_count(&mut reader, "column")?;
        for _ in 0..columns {
            let name = read_utf(&mut reader)?;
            if name.is_empty() {
                return Err(HarnessError::Encoding(
                    "result column cannot have an empty name".to_string(),
                ));
            }
            let descriptor: ColumnDescriptor = read_item(&mut reader)?;
            if descriptor.name() != name {
                return Err(HarnessError::Encoding(format!(
                    "descriptor for column {} is named {}",
                    name,
                    descriptor.name()
                )));
            }
            table.add_column(descriptor);
        }

        let rows = read_count(&mut reader, "row")?;
        if rows > 0 && columns == 0 {
            return Err(HarnessError::Encoding(
                "rows present in a table without columns".to_string(),
            ));
        }
        for _ in 0..rows {
            let mut row = Vec::with_capacity(columns);
            for _ in 0..columns {
                row.push(read_item::<_, Value>(&mut reader)?);
            }
            table.add_row_values(row)?;
        }
        Ok(table)
    }

    pub fn decode(bytes: &[u8]) -> Result<ResultTable> {
        Self::decode_from(bytes)
    }
}

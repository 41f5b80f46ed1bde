use crate::outcome::ThrownError;
use crate::results::ResultCursor;

/// The result of executing one query: a live cursor, or the error the data
/// source raised.
pub type Execution = std::result::Result<Box<dyn ResultCursor>, ThrownError>;

/// The external executor a strategy drives.
///
/// Only `execute` is required. The transaction hooks default to no-ops so a
/// source that has no notion of a given hook accepts every strategy.
pub trait DataSource {
    fn execute(&mut self, sql: &str) -> Execution;

    fn set_auto_commit(&mut self, _auto_commit: bool) -> Result<(), ThrownError> {
        Ok(())
    }

    fn commit(&mut self) -> Result<(), ThrownError> {
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), ThrownError> {
        Ok(())
    }

    fn set_txn_option(&mut self, _name: &str, _value: &str) -> Result<(), ThrownError> {
        Ok(())
    }

    /// Begins a container-managed transaction looked up under `resource`.
    fn begin_managed(&mut self, _resource: &str) -> Result<(), ThrownError> {
        Ok(())
    }

    fn end_managed(&mut self, _commit: bool) -> Result<(), ThrownError> {
        Ok(())
    }
}

//! Transaction strategies.
//!
//! A strategy decides how a query is wrapped in a transaction and how its
//! result cursor is obtained from a [`DataSource`]. The strategy for a run is
//! chosen once, from the `transaction-option` setting, by
//! [`TransactionStrategy::select`].

use std::fmt;
use std::str::FromStr;

use log::{info, warn};

use crate::errors::{HarnessError, Result};

pub mod source;

pub use source::{DataSource, Execution};

/// Configuration key holding the transaction option.
pub const TRANSACTION_OPTION: &str = "transaction-option";

/// Resource name a managed (JNDI) transaction is looked up under.
pub const JNDI_RESOURCE: &str = "java:/TransactionManager";

/// Connection option toggled by the wrap strategies.
pub const AUTO_COMMIT_TXN: &str = "autoCommitTxn";

// ============================================================================
// STRATEGY SELECTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionStrategy {
    /// Direct in-process execution with an explicit commit or rollback.
    Local,
    /// Execution inside a container-managed transaction looked up by name.
    Jndi,
    /// Execution with the source's own transaction wrapping turned on.
    OnWrap,
    /// The source's default behavior.
    Default,
}

impl TransactionStrategy {
    /// Maps a configuration value to a strategy. Matching is
    /// case-insensitive, and absent, empty or unrecognized values select
    /// `Default`.
    pub fn select(option: Option<&str>) -> TransactionStrategy {
        let strategy = match option {
            Some(v) if v.eq_ignore_ascii_case("local") => TransactionStrategy::Local,
            Some(v) if v.eq_ignore_ascii_case("jndi") => TransactionStrategy::Jndi,
            Some(v) if v.eq_ignore_ascii_case("on") => TransactionStrategy::OnWrap,
            Some(v) if !v.is_empty() && !v.eq_ignore_ascii_case("auto") => {
                warn!(
                    "Unrecognized {} '{}', using the default strategy",
                    TRANSACTION_OPTION, v
                );
                TransactionStrategy::Default
            }
            _ => TransactionStrategy::Default,
        };
        info!(
            "Transaction strategy: {} (option: {})",
            strategy,
            option.unwrap_or("auto")
        );
        strategy
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransactionStrategy::Local => "local",
            TransactionStrategy::Jndi => "jndi",
            TransactionStrategy::OnWrap => "on",
            TransactionStrategy::Default => "default",
        }
    }

    /// Executes `sql` against `source` under this strategy.
    pub fn execute(&self, source: &mut dyn DataSource, sql: &str) -> Execution {
        match self {
            TransactionStrategy::Local => {
                source.set_auto_commit(false)?;
                match source.execute(sql) {
                    Ok(cursor) => {
                        source.commit()?;
                        Ok(cursor)
                    }
                    Err(err) => {
                        if let Err(rollback) = source.rollback() {
                            warn!("Rollback after failed query also failed: {}", rollback);
                        }
                        Err(err)
                    }
                }
            }
            TransactionStrategy::Jndi => {
                source.begin_managed(JNDI_RESOURCE)?;
                match source.execute(sql) {
                    Ok(cursor) => {
                        source.end_managed(true)?;
                        Ok(cursor)
                    }
                    Err(err) => {
                        if let Err(end) = source.end_managed(false) {
                            warn!("Ending managed transaction failed: {}", end);
                        }
                        Err(err)
                    }
                }
            }
            TransactionStrategy::OnWrap => {
                source.set_txn_option(AUTO_COMMIT_TXN, "ON")?;
                source.execute(sql)
            }
            TransactionStrategy::Default => {
                source.set_txn_option(AUTO_COMMIT_TXN, "DETECT")?;
                source.execute(sql)
            }
        }
    }
}

impl fmt::Display for TransactionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// STRICT PARSING
// ============================================================================

/// Strict parsing: unlike [`TransactionStrategy::select`], unrecognized
/// values are an error.
impl FromStr for TransactionStrategy {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(TransactionStrategy::Local),
            "jndi" => Ok(TransactionStrategy::Jndi),
            "on" => Ok(TransactionStrategy::OnWrap),
            "auto" | "default" => Ok(TransactionStrategy::Default),
            _ => Err(HarnessError::InvalidArgument(format!(
                "unknown {} '{}'; expected one of local, jndi, on, auto",
                TRANSACTION_OPTION, s
            ))),
        }
    }
}

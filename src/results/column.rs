use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{HarnessError, Result};

/// Native class recorded when a caller does not supply one.
pub const DEFAULT_NATIVE_CLASS: &str = "string";

/// Metadata for one result column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    name: String,
    data_type: String,
    native_class: String,
    group_ref: Option<String>,
    element_ref: Option<String>,
}

impl ColumnDescriptor {
    /// Creates a descriptor with the default native class. Fails if `name` is
    /// empty.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Result<Self> {
        Self::with_class(name, data_type, DEFAULT_NATIVE_CLASS)
    }

    pub fn with_class(
        name: impl Into<String>,
        data_type: impl Into<String>,
        native_class: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(HarnessError::InvalidArgument(
                "result column cannot have an empty name".to_string(),
            ));
        }
        Ok(Self {
            name,
            data_type: data_type.into(),
            native_class: native_class.into(),
            group_ref: None,
            element_ref: None,
        })
    }

    /// Attaches the fully qualified group and short element identifiers the
    /// column was projected from.
    pub fn with_provenance(
        mut self,
        group_ref: impl Into<String>,
        element_ref: impl Into<String>,
    ) -> Self {
        self.group_ref = Some(group_ref.into());
        self.element_ref = Some(element_ref.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    pub fn native_class(&self) -> &str {
        &self.native_class
    }

    pub fn group_ref(&self) -> Option<&str> {
        self.group_ref.as_deref()
    }

    pub fn element_ref(&self) -> Option<&str> {
        self.element_ref.as_deref()
    }
}

impl fmt::Display for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Column[{}, {}", self.name, self.data_type)?;
        if let Some(group) = &self.group_ref {
            write!(f, ", {}.{}", group, self.element_ref.as_deref().unwrap_or(""))?;
        }
        write!(f, "]")
    }
}

//! Runtime table shape

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metadata validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("{kind} column '{column}' is not a column of table '{table}'")]
    UnknownColumn {
        table: String,
        kind: &'static str,
        column: String,
    },
}

/// Columns, primary key and editable allow-list of one table.
///
/// Built through [`TableMetadata::new`], which guarantees that every primary-key
/// and editable column is also one of `columns`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableMetadata {
    table_name: String,
    columns: Vec<String>,
    primary_key_columns: Vec<String>,
    editable_columns: Vec<String>,
}

impl TableMetadata {
    pub fn new(
        table_name: impl Into<String>,
        columns: Vec<String>,
        primary_key_columns: Vec<String>,
        editable_columns: Vec<String>,
    ) -> Result<Self, MetadataError> {
        let table_name = table_name.into();

        let unknown = |kind: &'static str, list: &[String]| {
            list.iter()
                .find(|c| !columns.contains(c))
                .map(|c| MetadataError::UnknownColumn {
                    table: table_name.clone(),
                    kind,
                    column: c.clone(),
                })
        };
        if let Some(err) = unknown("primary key", &primary_key_columns) {
            return Err(err);
        }
        if let Some(err) = unknown("editable", &editable_columns) {
            return Err(err);
        }

        Ok(Self {
            table_name,
            columns,
            primary_key_columns,
            editable_columns,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn primary_key_columns(&self) -> &[String] {
        &self.primary_key_columns
    }

    pub fn editable_columns(&self) -> &[String] {
        &self.editable_columns
    }

    pub fn is_editable(&self, column: &str) -> bool {
        self.editable_columns.iter().any(|c| c == column)
    }

    /// First primary-key column, falling back to the first column overall
    pub fn default_sort_column(&self) -> Option<&str> {
        self.primary_key_columns
            .first()
            .or_else(|| self.columns.first())
            .map(String::as_str)
    }

    /// First editable column
    pub fn default_edit_column(&self) -> Option<&str> {
        self.editable_columns.first().map(String::as_str)
    }
}

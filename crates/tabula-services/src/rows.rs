//! Row retrieval

use std::sync::Arc;
use tabula_core::{DbBackend, Row, SortState};

use crate::JsonColumnRule;
use crate::error::{ServiceError, ServiceResult};

/// Fetches ordered rows and decodes the JSON column of the JSON table
pub struct RowFetcher {
    backend: Arc<dyn DbBackend>,
    json_column: JsonColumnRule,
}

impl RowFetcher {
    pub fn new(backend: Arc<dyn DbBackend>, json_column: JsonColumnRule) -> Self {
        Self {
            backend,
            json_column,
        }
    }

    /// Retrieve every row of `table` in the order the backend applies for `sort`
    #[tracing::instrument(skip(self, sort), fields(column = ?sort.column, direction = %sort.direction))]
    pub async fn fetch(&self, table: &str, sort: &SortState) -> ServiceResult<Vec<Row>> {
        let mut rows = self.backend.rows(table, sort).await.map_err(|e| {
            tracing::warn!(table = %table, error = %e, "row fetch failed");
            ServiceError::RowFetch(e.user_message("Error fetching DB data."))
        })?;

        if self.json_column.applies_to_table(table) {
            for row in &mut rows {
                decode_json_cell(row, &self.json_column.column);
            }
        }

        tracing::info!(table = %table, rows = rows.len(), "Table data loaded");
        Ok(rows)
    }
}

/// Replace a non-empty string cell with the JSON document it encodes.
///
/// Undecodable text is kept as-is. Returns whether the cell was replaced.
pub(crate) fn decode_json_cell(row: &mut Row, column: &str) -> bool {
    let Some(serde_json::Value::String(text)) = row.get(column) else {
        return false;
    };
    if text.is_empty() {
        return false;
    }

    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(decoded) => {
            row.insert(column, decoded);
            true
        }
        Err(e) => {
            tracing::warn!(column = %column, error = %e, "could not parse JSON column, keeping raw text");
            false
        }
    }
}

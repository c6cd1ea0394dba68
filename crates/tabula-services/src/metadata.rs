//! Table metadata resolution

use std::sync::Arc;
use tabula_core::{DbBackend, TableMetadata};

use crate::error::{ServiceError, ServiceResult};

/// Resolves a table's columns, primary key and editable columns as one unit
pub struct MetadataResolver {
    backend: Arc<dyn DbBackend>,
}

impl MetadataResolver {
    pub fn new(backend: Arc<dyn DbBackend>) -> Self {
        Self { backend }
    }

    /// Fetch all three column lists concurrently.
    ///
    /// Either every retrieval succeeds and a consistent [`TableMetadata`] is
    /// returned, or the whole resolution fails with
    /// [`ServiceError::MetadataFetch`].
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, table: &str) -> ServiceResult<TableMetadata> {
        let (columns, primary_key_columns, editable_columns) = futures::try_join!(
            self.backend.columns(table),
            self.backend.primary_key_columns(table),
            self.backend.editable_columns(table),
        )
        .map_err(|e| {
            tracing::warn!(table = %table, error = %e, "metadata retrieval failed");
            ServiceError::MetadataFetch(e.user_message("Error fetching table metadata."))
        })?;

        let metadata = TableMetadata::new(table, columns, primary_key_columns, editable_columns)
            .map_err(|e| ServiceError::MetadataFetch(e.to_string()))?;

        tracing::info!(
            table = %table,
            columns = metadata.columns().len(),
            primary_key = ?metadata.primary_key_columns(),
            editable = ?metadata.editable_columns(),
            "Table metadata resolved"
        );

        Ok(metadata)
    }
}

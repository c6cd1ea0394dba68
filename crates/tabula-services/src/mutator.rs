//! Primary-key-scoped record mutation
//!
//! Every mutation is validated locally before anything is sent: a rejected
//! update or delete never reaches the backend.

use std::sync::Arc;
use tabula_core::{
    DbBackend, DeleteRecordRequest, EditIntent, PrimaryKeyDraft, PrimaryKeyTuple, TableMetadata,
    UpdateRecordRequest,
};

use crate::error::{ServiceError, ServiceResult};
use crate::{CoercionRules, JsonColumnRule};

const UPDATE_PRECONDITION: &str =
    "Please select a table, a field, and provide all primary key values.";
const DELETE_PRECONDITION: &str =
    "Please select a table and provide all primary key values for deletion.";

/// Guard for irreversible deletes. Asked once per delete, after validation.
pub trait ConfirmDelete: Send + Sync {
    fn confirm(&self, table: &str, pk: &PrimaryKeyTuple) -> bool;
}

/// Confirms every delete (non-interactive use, e.g. `--yes`)
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmDelete for AlwaysConfirm {
    fn confirm(&self, _table: &str, _pk: &PrimaryKeyTuple) -> bool {
        true
    }
}

impl<F> ConfirmDelete for F
where
    F: Fn(&str, &PrimaryKeyTuple) -> bool + Send + Sync,
{
    fn confirm(&self, table: &str, pk: &PrimaryKeyTuple) -> bool {
        self(table, pk)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The backend accepted the mutation
    Applied { message: String },
    /// The user declined the delete confirmation; nothing was sent
    Cancelled,
}

/// A validated update, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub table: String,
    pub body: UpdateRecordRequest,
}

/// A validated delete, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteRequest {
    pub table: String,
    pub body: DeleteRecordRequest,
}

pub struct RecordMutator {
    backend: Arc<dyn DbBackend>,
    json_column: JsonColumnRule,
    coercion: CoercionRules,
}

impl RecordMutator {
    pub fn new(
        backend: Arc<dyn DbBackend>,
        json_column: JsonColumnRule,
        coercion: CoercionRules,
    ) -> Self {
        Self {
            backend,
            json_column,
            coercion,
        }
    }

    /// Validate an update without sending it.
    ///
    /// Checks, in order:
    /// 1. a table is selected, a target column is chosen, every primary-key value is non-empty
    /// 2. the target column is editable
    /// 3. edits to the JSON column parse as JSON (sent as the parsed document)
    /// 4. every primary-key value coerces to its column's type
    pub fn prepare_update(
        &self,
        metadata: Option<&TableMetadata>,
        draft: &PrimaryKeyDraft,
        edit: &EditIntent,
    ) -> ServiceResult<UpdateRequest> {
        let metadata = require_complete(metadata, draft, UPDATE_PRECONDITION)?;
        if edit.target_column.is_empty() {
            return Err(ServiceError::Validation(UPDATE_PRECONDITION.to_string()));
        }
        let table = metadata.table_name();

        if !metadata.is_editable(&edit.target_column) {
            return Err(ServiceError::EditableColumnViolation {
                column: edit.target_column.clone(),
                table: table.to_string(),
            });
        }

        let new_value = if self.json_column.applies(table, &edit.target_column) {
            serde_json::from_str::<serde_json::Value>(&edit.new_value).map_err(|e| {
                ServiceError::InvalidJson {
                    column: edit.target_column.clone(),
                    reason: e.to_string(),
                }
            })?
        } else {
            serde_json::Value::String(edit.new_value.clone())
        };

        let pk_dict = self
            .coercion
            .coerce_tuple(metadata.primary_key_columns(), draft)?;

        Ok(UpdateRequest {
            table: table.to_string(),
            body: UpdateRecordRequest {
                pk_dict,
                field_to_update: edit.target_column.clone(),
                new_value,
            },
        })
    }

    /// Validate a delete without sending it
    pub fn prepare_delete(
        &self,
        metadata: Option<&TableMetadata>,
        draft: &PrimaryKeyDraft,
    ) -> ServiceResult<DeleteRequest> {
        let metadata = require_complete(metadata, draft, DELETE_PRECONDITION)?;
        let pk_dict = self
            .coercion
            .coerce_tuple(metadata.primary_key_columns(), draft)?;

        Ok(DeleteRequest {
            table: metadata.table_name().to_string(),
            body: DeleteRecordRequest { pk_dict },
        })
    }

    /// Validate and send a single-field update
    #[tracing::instrument(skip_all, fields(field = %edit.target_column))]
    pub async fn update(
        &self,
        metadata: Option<&TableMetadata>,
        draft: &PrimaryKeyDraft,
        edit: &EditIntent,
    ) -> ServiceResult<MutationOutcome> {
        let request = self.prepare_update(metadata, draft, edit).map_err(|e| {
            tracing::debug!(error = %e, "update rejected locally");
            e
        })?;

        let response = self
            .backend
            .update_record(&request.table, &request.body)
            .await
            .map_err(|e| ServiceError::Mutation(e.user_message("Error updating record.")))?;

        tracing::info!(
            table_name = %request.table,
            column = %request.body.field_to_update,
            pk = %request.body.pk_dict,
            "Record updated"
        );

        Ok(MutationOutcome::Applied {
            message: response.message,
        })
    }

    /// Validate, confirm and send a full-record delete.
    ///
    /// `confirm` is asked only once the request is known to be valid.
    #[tracing::instrument(skip_all)]
    pub async fn delete(
        &self,
        metadata: Option<&TableMetadata>,
        draft: &PrimaryKeyDraft,
        confirm: &dyn ConfirmDelete,
    ) -> ServiceResult<MutationOutcome> {
        let request = self.prepare_delete(metadata, draft).map_err(|e| {
            tracing::debug!(error = %e, "delete rejected locally");
            e
        })?;

        if !confirm.confirm(&request.table, &request.body.pk_dict) {
            tracing::info!(table_name = %request.table, "Delete cancelled by user");
            return Ok(MutationOutcome::Cancelled);
        }

        let response = self
            .backend
            .delete_record(&request.table, &request.body)
            .await
            .map_err(|e| ServiceError::Mutation(e.user_message("Error deleting record.")))?;

        tracing::info!(
            table_name = %request.table,
            pk = %request.body.pk_dict,
            "Record deleted"
        );

        Ok(MutationOutcome::Applied {
            message: response.message,
        })
    }
}

/// Precondition shared by update and delete: a table with metadata is
/// selected and no primary-key value is empty
fn require_complete<'a>(
    metadata: Option<&'a TableMetadata>,
    draft: &PrimaryKeyDraft,
    message: &str,
) -> ServiceResult<&'a TableMetadata> {
    let metadata = metadata
        .filter(|m| !m.table_name().is_empty())
        .ok_or_else(|| ServiceError::Validation(message.to_string()))?;

    let missing = draft.missing_columns(metadata.primary_key_columns());
    if !missing.is_empty() {
        tracing::debug!(missing = ?missing, "primary key incomplete");
        return Err(ServiceError::Validation(message.to_string()));
    }
    Ok(metadata)
}

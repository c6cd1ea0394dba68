//! Backend trait and request payloads

use crate::{PrimaryKeyTuple, Result, Row, SortState};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body of `PUT /db/record/{table}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRecordRequest {
    pub pk_dict: PrimaryKeyTuple,
    pub field_to_update: String,
    /// Plain string for ordinary columns, a parsed document for JSON columns
    pub new_value: serde_json::Value,
}

/// Body of `DELETE /db/record/{table}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRecordRequest {
    pub pk_dict: PrimaryKeyTuple,
}

/// Success body of the mutation endpoints
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MutationResponse {
    #[serde(default)]
    pub message: String,
}

/// The REST database backend.
///
/// One method per endpoint. The backend is the sole authority on ordering and
/// on which records a primary-key tuple matches.
#[async_trait]
pub trait DbBackend: Send + Sync {
    /// `GET /db/tables`
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// `GET /db/columns/{table}`
    async fn columns(&self, table: &str) -> Result<Vec<String>>;

    /// `GET /db/pk_columns/{table}`
    async fn primary_key_columns(&self, table: &str) -> Result<Vec<String>>;

    /// `GET /db/editable_columns/{table}`
    async fn editable_columns(&self, table: &str) -> Result<Vec<String>>;

    /// `GET /db/data/{table}?order_by_col=&order_direction=`
    ///
    /// Returns every matching row; no pagination is imposed client-side.
    async fn rows(&self, table: &str, sort: &SortState) -> Result<Vec<Row>>;

    /// `PUT /db/record/{table}`
    async fn update_record(
        &self,
        table: &str,
        request: &UpdateRecordRequest,
    ) -> Result<MutationResponse>;

    /// `DELETE /db/record/{table}`
    async fn delete_record(
        &self,
        table: &str,
        request: &DeleteRecordRequest,
    ) -> Result<MutationResponse>;
}

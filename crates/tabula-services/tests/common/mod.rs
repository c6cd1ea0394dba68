//! Common test utilities and mocks

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tabula_core::{
    BackendError, DbBackend, DeleteRecordRequest, MutationResponse, PrimaryKeyTuple, Result, Row,
    SortDirection, SortState, TypedValue, UpdateRecordRequest, value_to_text,
};
use tokio::sync::Notify;

/// Backend endpoints, for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListTables,
    Columns,
    PrimaryKeyColumns,
    EditableColumns,
    Rows,
    Update,
    Delete,
}

/// A call received by [`MockBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    ListTables,
    Columns(String),
    PrimaryKeyColumns(String),
    EditableColumns(String),
    Rows { table: String, sort: SortState },
    Update { table: String, request: UpdateRecordRequest },
    Delete { table: String, request: DeleteRecordRequest },
}

impl RecordedCall {
    pub fn is_metadata(&self) -> bool {
        matches!(
            self,
            RecordedCall::Columns(_)
                | RecordedCall::PrimaryKeyColumns(_)
                | RecordedCall::EditableColumns(_)
        )
    }

    pub fn is_rows(&self) -> bool {
        matches!(self, RecordedCall::Rows { .. })
    }

    pub fn is_mutation(&self) -> bool {
        matches!(self, RecordedCall::Update { .. } | RecordedCall::Delete { .. })
    }
}

/// Canned shape and contents of one table
#[derive(Debug, Clone, Default)]
pub struct TableFixture {
    pub columns: Vec<String>,
    pub primary_key: Vec<String>,
    pub editable: Vec<String>,
    pub rows: Vec<Row>,
}

impl TableFixture {
    pub fn new(columns: &[&str], primary_key: &[&str], editable: &[&str]) -> Self {
        let owned = |cols: &[&str]| cols.iter().map(|c| c.to_string()).collect();
        Self {
            columns: owned(columns),
            primary_key: owned(primary_key),
            editable: owned(editable),
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: serde_json::Value) -> Self {
        self.rows
            .push(serde_json::from_value(row).expect("fixture row should be an object"));
        self
    }
}

/// Holds one backend call until released
pub struct CallGate {
    entered: Notify,
    release: Notify,
}

impl CallGate {
    /// Wait until the gated call has started
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }
}

/// Mock backend for testing service-layer logic without a server.
///
/// Rows are returned in fixture order for `ASC` and reversed for `DESC`.
/// Mutations are applied to the fixtures so that a re-fetch observes them.
#[derive(Default)]
pub struct MockBackend {
    tables: Mutex<Vec<String>>,
    fixtures: Mutex<HashMap<String, TableFixture>>,
    failures: Mutex<HashMap<(Endpoint, String), BackendError>>,
    gates: Mutex<HashMap<(Endpoint, String), Arc<CallGate>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(self, name: &str, fixture: TableFixture) -> Self {
        self.tables.lock().push(name.to_string());
        self.fixtures.lock().insert(name.to_string(), fixture);
        self
    }

    /// Make `endpoint` fail for `table` (use `""` for the table list)
    pub fn fail(&self, endpoint: Endpoint, table: &str, error: BackendError) {
        self.failures
            .lock()
            .insert((endpoint, table.to_string()), error);
    }

    pub fn clear_failures(&self) {
        self.failures.lock().clear();
    }

    /// Hold the next rows call for `table` until the returned gate is released
    pub fn gate_rows(&self, table: &str) -> Arc<CallGate> {
        self.gate(Endpoint::Rows, table)
    }

    /// Hold the next columns call for `table`, which stalls metadata resolution
    pub fn gate_columns(&self, table: &str) -> Arc<CallGate> {
        self.gate(Endpoint::Columns, table)
    }

    fn gate(&self, endpoint: Endpoint, table: &str) -> Arc<CallGate> {
        let gate = Arc::new(CallGate {
            entered: Notify::new(),
            release: Notify::new(),
        });
        self.gates
            .lock()
            .insert((endpoint, table.to_string()), gate.clone());
        gate
    }

    async fn pass_gate(&self, endpoint: Endpoint, table: &str) {
        let gate = self.gates.lock().remove(&(endpoint, table.to_string()));
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn rows_of(&self, table: &str) -> Vec<Row> {
        self.fixtures
            .lock()
            .get(table)
            .map(|f| f.rows.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().push(call);
    }

    fn check(&self, endpoint: Endpoint, table: &str) -> Result<()> {
        match self.failures.lock().get(&(endpoint, table.to_string())) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn fixture(&self, table: &str) -> Result<TableFixture> {
        self.fixtures
            .lock()
            .get(table)
            .cloned()
            .ok_or_else(|| BackendError::Http {
                status: 404,
                detail: Some(format!("Table '{}' not found.", table)),
            })
    }
}

/// Whether `row` holds the values of `pk`
fn row_matches(row: &Row, pk: &PrimaryKeyTuple) -> bool {
    pk.iter().all(|(column, expected)| {
        let Some(actual) = row.get(column) else {
            return false;
        };
        match expected {
            TypedValue::Integer(i) => actual.as_f64() == Some(*i as f64),
            TypedValue::Float(f) => actual.as_f64() == Some(*f),
            TypedValue::Text(s) => value_to_text(actual) == *s,
        }
    })
}

#[async_trait]
impl DbBackend for MockBackend {
    async fn list_tables(&self) -> Result<Vec<String>> {
        self.record(RecordedCall::ListTables);
        self.check(Endpoint::ListTables, "")?;
        Ok(self.tables.lock().clone())
    }

    async fn columns(&self, table: &str) -> Result<Vec<String>> {
        self.record(RecordedCall::Columns(table.to_string()));
        self.pass_gate(Endpoint::Columns, table).await;
        self.check(Endpoint::Columns, table)?;
        Ok(self.fixture(table)?.columns)
    }

    async fn primary_key_columns(&self, table: &str) -> Result<Vec<String>> {
        self.record(RecordedCall::PrimaryKeyColumns(table.to_string()));
        self.check(Endpoint::PrimaryKeyColumns, table)?;
        Ok(self.fixture(table)?.primary_key)
    }

    async fn editable_columns(&self, table: &str) -> Result<Vec<String>> {
        self.record(RecordedCall::EditableColumns(table.to_string()));
        self.check(Endpoint::EditableColumns, table)?;
        Ok(self.fixture(table)?.editable)
    }

    async fn rows(&self, table: &str, sort: &SortState) -> Result<Vec<Row>> {
        self.record(RecordedCall::Rows {
            table: table.to_string(),
            sort: sort.clone(),
        });

        self.pass_gate(Endpoint::Rows, table).await;

        self.check(Endpoint::Rows, table)?;
        let mut rows = self.fixture(table)?.rows;
        if sort.direction == SortDirection::Desc {
            rows.reverse();
        }
        Ok(rows)
    }

    async fn update_record(
        &self,
        table: &str,
        request: &UpdateRecordRequest,
    ) -> Result<MutationResponse> {
        self.record(RecordedCall::Update {
            table: table.to_string(),
            request: request.clone(),
        });
        self.check(Endpoint::Update, table)?;

        let mut fixtures = self.fixtures.lock();
        let row = fixtures
            .get_mut(table)
            .and_then(|f| f.rows.iter_mut().find(|r| row_matches(r, &request.pk_dict)))
            .ok_or_else(|| BackendError::Http {
                status: 404,
                detail: Some("Record not found.".to_string()),
            })?;

        // Stored JSON documents are kept as text, like the real table
        let stored = match &request.new_value {
            value @ (serde_json::Value::Object(_) | serde_json::Value::Array(_)) => {
                json!(value.to_string())
            }
            value => value.clone(),
        };
        row.insert(request.field_to_update.clone(), stored);

        Ok(MutationResponse {
            message: "Record updated successfully.".to_string(),
        })
    }

    async fn delete_record(
        &self,
        table: &str,
        request: &DeleteRecordRequest,
    ) -> Result<MutationResponse> {
        self.record(RecordedCall::Delete {
            table: table.to_string(),
            request: request.clone(),
        });
        self.check(Endpoint::Delete, table)?;

        let mut fixtures = self.fixtures.lock();
        if let Some(fixture) = fixtures.get_mut(table) {
            fixture.rows.retain(|r| !row_matches(r, &request.pk_dict));
        }

        Ok(MutationResponse {
            message: "Record deleted successfully.".to_string(),
        })
    }
}

/// `weather_cache` with two rows whose `data` column is JSON text
pub fn weather_cache() -> TableFixture {
    TableFixture::new(
        &["lat", "lon", "data_ts", "data"],
        &["lat", "lon", "data_ts"],
        &["data"],
    )
    .with_row(json!({
        "lat": 34.05,
        "lon": -118.24,
        "data_ts": 1690000000,
        "data": "{\"a\": 1}"
    }))
    .with_row(json!({
        "lat": 40.71,
        "lon": -74.01,
        "data_ts": 1690003600,
        "data": "{\"temp\": 21.5, \"weather\": [{\"description\": \"clear sky\"}]}"
    }))
}

/// `user_queries` with a text primary-key column
pub fn user_queries() -> TableFixture {
    TableFixture::new(
        &["session_id", "query_ts", "location_string"],
        &["session_id", "query_ts"],
        &["location_string"],
    )
    .with_row(json!({
        "session_id": "user_session_default",
        "query_ts": 1690000000,
        "location_string": "Pune, Maharashtra, IN"
    }))
}

/// Backend with `weather_cache` and `user_queries`
pub fn sample_backend() -> Arc<MockBackend> {
    Arc::new(
        MockBackend::new()
            .with_table("weather_cache", weather_cache())
            .with_table("user_queries", user_queries()),
    )
}

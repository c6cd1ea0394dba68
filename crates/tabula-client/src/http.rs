//! reqwest implementation of [`DbBackend`]

use async_trait::async_trait;
use tabula_core::{
    DbBackend, DeleteRecordRequest, MutationResponse, Result, Row, SortState, UpdateRecordRequest,
};
use url::Url;

use crate::ClientConfig;
use crate::transport::Transport;

/// Talks to the `/db/*` endpoints of the REST backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    transport: Transport,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        self.transport.base_url()
    }

    /// URL of the row listing, including the sort query parameters.
    ///
    /// `order_by_col` is omitted when no sort column is chosen; the direction is
    /// always sent.
    pub fn rows_url(&self, table: &str, sort: &SortState) -> Result<Url> {
        let mut url = self.transport.endpoint(&["db", "data", table])?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(column) = sort.column.as_deref().filter(|c| !c.is_empty()) {
                query.append_pair("order_by_col", column);
            }
            query.append_pair("order_direction", sort.direction.as_str());
        }
        Ok(url)
    }

    async fn get_names(&self, endpoint: &str, table: &str) -> Result<Vec<String>> {
        let url = self.transport.endpoint(&["db", endpoint, table])?;
        self.transport
            .send_json(self.transport.client().get(url))
            .await
    }
}

#[async_trait]
impl DbBackend for HttpBackend {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let url = self.transport.endpoint(&["db", "tables"])?;
        self.transport
            .send_json(self.transport.client().get(url))
            .await
    }

    async fn columns(&self, table: &str) -> Result<Vec<String>> {
        self.get_names("columns", table).await
    }

    async fn primary_key_columns(&self, table: &str) -> Result<Vec<String>> {
        self.get_names("pk_columns", table).await
    }

    async fn editable_columns(&self, table: &str) -> Result<Vec<String>> {
        self.get_names("editable_columns", table).await
    }

    async fn rows(&self, table: &str, sort: &SortState) -> Result<Vec<Row>> {
        let url = self.rows_url(table, sort)?;
        self.transport
            .send_json(self.transport.client().get(url))
            .await
    }

    async fn update_record(
        &self,
        table: &str,
        request: &UpdateRecordRequest,
    ) -> Result<MutationResponse> {
        let url = self.transport.endpoint(&["db", "record", table])?;
        self.transport
            .send_json(self.transport.client().put(url).json(request))
            .await
    }

    async fn delete_record(
        &self,
        table: &str,
        request: &DeleteRecordRequest,
    ) -> Result<MutationResponse> {
        let url = self.transport.endpoint(&["db", "record", table])?;
        self.transport
            .send_json(self.transport.client().delete(url).json(request))
            .await
    }
}

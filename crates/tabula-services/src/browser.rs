//! Table browser controller
//!
//! [`TableBrowser`] owns the browser state and turns [`BrowserEvent`]s into
//! backend calls following the dependency table in [`crate::events`].
//!
//! Every metadata and row fetch carries a ticket. A response is applied only
//! when its ticket is still the latest for that kind of fetch and still
//! describes the current selection; otherwise it is dropped.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tabula_core::{DbBackend, EditIntent, PrimaryKeyDraft, Row, SortState, TableMetadata};

use crate::error::{ServiceError, ServiceResult};
use crate::events::{BrowserEvent, Effect, effects_for};
use crate::{
    BrowserConfig, ConfirmDelete, MetadataResolver, MutationOutcome, RecordMutator, RowFetcher,
    sync_from_row,
};

/// Everything the front-end renders
#[derive(Debug, Clone, Default)]
pub struct BrowserState {
    pub tables: Vec<String>,
    pub selected_table: Option<String>,
    pub metadata: Option<TableMetadata>,
    pub sort: SortState,
    pub rows: Vec<Row>,
    pub pk_draft: PrimaryKeyDraft,
    pub edit: EditIntent,
    /// User-visible text of the last failed operation
    pub last_error: Option<String>,
    /// Backend message of the last successful mutation
    pub last_message: Option<String>,
    metadata_generation: u64,
    rows_generation: u64,
}

/// Result of dispatching one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Done,
    /// A newer event took over before this one's response arrived
    Superseded,
    /// The delete confirmation was declined
    Cancelled,
    Applied { message: String },
}

/// What a fetch was issued for
#[derive(Debug, Clone, PartialEq, Eq)]
struct FetchKey {
    table: String,
    sort: SortState,
}

#[derive(Debug, Clone)]
struct FetchTicket {
    key: FetchKey,
    generation: u64,
}

enum Step {
    Continue,
    Record(EventOutcome),
    /// Skip the event's remaining effects
    Stop(EventOutcome),
    /// Queue another event after this one completes
    Follow(BrowserEvent),
}

pub struct TableBrowser {
    backend: Arc<dyn DbBackend>,
    config: BrowserConfig,
    resolver: MetadataResolver,
    fetcher: RowFetcher,
    mutator: RecordMutator,
    confirm: Arc<dyn ConfirmDelete>,
    state: Mutex<BrowserState>,
}

impl TableBrowser {
    pub fn new(
        backend: Arc<dyn DbBackend>,
        config: BrowserConfig,
        confirm: Arc<dyn ConfirmDelete>,
    ) -> Self {
        Self {
            resolver: MetadataResolver::new(backend.clone()),
            fetcher: RowFetcher::new(backend.clone(), config.json_column.clone()),
            mutator: RecordMutator::new(
                backend.clone(),
                config.json_column.clone(),
                config.coercion.clone(),
            ),
            backend,
            config,
            confirm,
            state: Mutex::new(BrowserState::default()),
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> BrowserState {
        self.state.lock().clone()
    }

    /// Record the event's input, then run its effects in order.
    ///
    /// A failing effect stops the chain; its message is kept in
    /// [`BrowserState::last_error`] and the error is returned. Once a mutation
    /// has been applied the event reports [`EventOutcome::Applied`] even if the
    /// refresh after it fails, leaving the rows stale and `last_error` set.
    pub async fn dispatch(&self, event: BrowserEvent) -> ServiceResult<EventOutcome> {
        let mut queue = VecDeque::from([event]);
        let mut outcome = EventOutcome::Done;

        while let Some(event) = queue.pop_front() {
            tracing::debug!(event = ?event, "dispatching browser event");
            self.record_input(&event);

            for effect in effects_for(&event) {
                let step = match self.run(*effect, &event).await {
                    Ok(step) => step,
                    Err(e) => {
                        tracing::warn!(effect = ?effect, error = %e, "browser effect failed");
                        self.state.lock().last_error = Some(e.to_string());
                        // The write already happened; only the refresh after it failed
                        if matches!(outcome, EventOutcome::Applied { .. }) {
                            return Ok(outcome);
                        }
                        return Err(e);
                    }
                };

                match step {
                    Step::Continue => {}
                    Step::Record(next) => outcome = next,
                    Step::Stop(next) => {
                        if !matches!(outcome, EventOutcome::Applied { .. }) {
                            outcome = next;
                        }
                        break;
                    }
                    Step::Follow(next) => queue.push_back(next),
                }
            }
        }

        Ok(outcome)
    }

    fn record_input(&self, event: &BrowserEvent) {
        let mut state = self.state.lock();
        match event {
            BrowserEvent::SetSortColumn(column) => {
                state.sort.column = (!column.is_empty()).then(|| column.clone());
            }
            BrowserEvent::SetSortDirection(direction) => state.sort.direction = *direction,
            BrowserEvent::EditPrimaryKey { column, value } => state.pk_draft.set(column, value),
            BrowserEvent::SelectField(column) => state.edit.target_column = column.clone(),
            BrowserEvent::EditValue(value) => state.edit.new_value = value.clone(),
            BrowserEvent::SubmitUpdate | BrowserEvent::SubmitDelete => {
                state.last_error = None;
                state.last_message = None;
            }
            BrowserEvent::LoadTables
            | BrowserEvent::SelectTable(_)
            | BrowserEvent::Refresh
            | BrowserEvent::ClickRow(_) => {}
        }
    }

    async fn run(&self, effect: Effect, event: &BrowserEvent) -> ServiceResult<Step> {
        match effect {
            Effect::ListTables => self.list_tables().await,
            Effect::InvalidateTable => {
                let mut state = self.state.lock();
                state.metadata_generation += 1;
                state.rows_generation += 1;
                Ok(Step::Continue)
            }
            Effect::ResolveMetadata => match event {
                BrowserEvent::SelectTable(table) => self.resolve_metadata(table).await,
                _ => Ok(Step::Continue),
            },
            Effect::FetchRows => self.fetch_rows().await,
            Effect::SyncSelection => match event {
                BrowserEvent::ClickRow(index) => self.sync_selection(*index),
                _ => Ok(Step::Continue),
            },
            Effect::MutateUpdate => self.submit_update().await,
            Effect::MutateDelete => self.submit_delete().await,
            Effect::ResetPrimaryKeyDraft => {
                let mut state = self.state.lock();
                let columns = state
                    .metadata
                    .as_ref()
                    .map(|m| m.primary_key_columns().to_vec())
                    .unwrap_or_default();
                state.pk_draft = PrimaryKeyDraft::empty_for(&columns);
                Ok(Step::Continue)
            }
        }
    }

    async fn list_tables(&self) -> ServiceResult<Step> {
        let tables = self.backend.list_tables().await.map_err(|e| {
            ServiceError::TableListFetch(e.user_message("Error fetching tables."))
        })?;
        tracing::info!(count = tables.len(), "Tables listed");

        let mut state = self.state.lock();
        state.tables = tables;
        if state.selected_table.is_some() {
            return Ok(Step::Continue);
        }

        let initial = self
            .config
            .initial_table
            .as_ref()
            .filter(|t| state.tables.contains(t))
            .or_else(|| state.tables.first())
            .cloned();

        Ok(match initial {
            Some(table) => Step::Follow(BrowserEvent::SelectTable(table)),
            None => Step::Continue,
        })
    }

    async fn resolve_metadata(&self, table: &str) -> ServiceResult<Step> {
        let generation = self.state.lock().metadata_generation;
        let result = self.resolver.resolve(table).await;

        let mut state = self.state.lock();
        if state.metadata_generation != generation {
            tracing::debug!(table = %table, "dropping superseded metadata response");
            return Ok(Step::Stop(EventOutcome::Superseded));
        }
        let metadata = result?;

        state.selected_table = Some(table.to_string());
        state.pk_draft = PrimaryKeyDraft::empty_for(metadata.primary_key_columns());
        state.edit = metadata
            .default_edit_column()
            .map(|column| EditIntent::new(column, ""))
            .unwrap_or_default();
        state.sort.column = metadata.default_sort_column().map(str::to_string);
        state.rows.clear();
        state.last_error = None;
        state.metadata = Some(metadata);

        Ok(Step::Continue)
    }

    async fn fetch_rows(&self) -> ServiceResult<Step> {
        let ticket = {
            let mut state = self.state.lock();
            let Some(table) = state.selected_table.clone() else {
                return Ok(Step::Continue);
            };
            state.rows_generation += 1;
            FetchTicket {
                key: FetchKey {
                    table,
                    sort: state.sort.clone(),
                },
                generation: state.rows_generation,
            }
        };

        let result = self.fetcher.fetch(&ticket.key.table, &ticket.key.sort).await;

        let mut state = self.state.lock();
        let current = FetchKey {
            table: state.selected_table.clone().unwrap_or_default(),
            sort: state.sort.clone(),
        };
        if state.rows_generation != ticket.generation || current != ticket.key {
            tracing::debug!(
                table = %ticket.key.table,
                generation = ticket.generation,
                "dropping superseded row response"
            );
            return Ok(Step::Stop(EventOutcome::Superseded));
        }

        state.rows = result?;
        Ok(Step::Continue)
    }

    fn sync_selection(&self, index: usize) -> ServiceResult<Step> {
        let mut state = self.state.lock();
        let Some(metadata) = state.metadata.as_ref() else {
            return Err(ServiceError::Validation("Please select a table first.".to_string()));
        };
        let Some(row) = state.rows.get(index) else {
            return Err(ServiceError::Validation(format!(
                "Row {} is out of range ({} rows loaded).",
                index,
                state.rows.len()
            )));
        };

        let draft = sync_from_row(row, metadata);
        state.pk_draft = draft.primary_key;
        state.edit = draft.edit.unwrap_or_default();
        Ok(Step::Continue)
    }

    async fn submit_update(&self) -> ServiceResult<Step> {
        let (metadata, draft, edit) = {
            let state = self.state.lock();
            (state.metadata.clone(), state.pk_draft.clone(), state.edit.clone())
        };

        let outcome = self.mutator.update(metadata.as_ref(), &draft, &edit).await?;
        Ok(self.finish_mutation(outcome))
    }

    async fn submit_delete(&self) -> ServiceResult<Step> {
        let (metadata, draft) = {
            let state = self.state.lock();
            (state.metadata.clone(), state.pk_draft.clone())
        };

        let outcome = self
            .mutator
            .delete(metadata.as_ref(), &draft, self.confirm.as_ref())
            .await?;
        Ok(self.finish_mutation(outcome))
    }

    fn finish_mutation(&self, outcome: MutationOutcome) -> Step {
        match outcome {
            MutationOutcome::Applied { message } => {
                self.state.lock().last_message = Some(message.clone());
                Step::Record(EventOutcome::Applied { message })
            }
            MutationOutcome::Cancelled => Step::Stop(EventOutcome::Cancelled),
        }
    }
}

impl BrowserState {
    /// Current sort, for display
    pub fn sort_label(&self) -> String {
        match &self.sort.column {
            Some(column) => format!("{} {}", column, self.sort.direction),
            None => self.sort.direction.to_string(),
        }
    }
}

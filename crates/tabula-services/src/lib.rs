//! Tabula Services Layer
//!
//! This crate holds the table browser/editor logic that sits between a front-end
//! (the `tabula` CLI) and the REST backend.
//!
//! # Architecture
//!
//! ```text
//! Front-end (tabula-cli)
//!     ↓
//! Service Layer (tabula-services) ← This crate
//!     ↓
//! Infrastructure Layer (tabula-core, tabula-client)
//! ```
//!
//! # Services
//!
//! - [`CoercionRules`] - Primary-key text to typed value conversion
//! - [`MetadataResolver`] - Atomic resolution of a table's shape
//! - [`RowFetcher`] - Ordered row retrieval with JSON column decoding
//! - [`RecordMutator`] - Validated, primary-key-scoped update and delete
//! - [`sync_from_row`] - Row click to edit drafts
//! - [`TableBrowser`] - Event-driven controller owning the browser state
//!
//! # Design Principles
//!
//! 1. **No schema knowledge** - Everything is driven by the column lists the backend returns
//! 2. **Validate locally first** - Invalid mutations never reach the network
//! 3. **Refresh after write** - Rows are re-fetched, never patched locally

mod browser;
mod coercion;
mod config;
mod error;
pub mod events;
mod metadata;
mod mutator;
mod rows;
mod selection;

pub use browser::{BrowserState, EventOutcome, TableBrowser};
pub use coercion::{CoercionRules, DEFAULT_NUMERIC_COLUMNS};
pub use config::{BrowserConfig, JsonColumnRule};
pub use error::{ServiceError, ServiceResult};
pub use events::{BrowserEvent, Effect};
pub use metadata::MetadataResolver;
pub use mutator::{
    AlwaysConfirm, ConfirmDelete, DeleteRequest, MutationOutcome, RecordMutator, UpdateRequest,
};
pub use rows::RowFetcher;
pub use selection::{SelectionDraft, edit_seed, sync_from_row};

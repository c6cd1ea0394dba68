//! Tabula Core - Shared types and traits for the table browser
//!
//! This crate provides the fundamental types that all other Tabula crates
//! depend on. It defines:
//!
//! - `DbBackend` - Trait for the REST database backend
//! - `TableMetadata` - Runtime shape of a table (columns, primary key, editable columns)
//! - Common types like `Row`, `PrimaryKeyDraft`, `PrimaryKeyTuple`, `SortState`, etc.

mod backend;
mod error;
mod metadata;
mod types;

pub use backend::*;
pub use error::*;
pub use metadata::*;
pub use types::*;

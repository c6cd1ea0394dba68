//! Browser events and the effects they trigger
//!
//! The dependency graph between user actions and data operations is a single
//! table, [`effects_for`]. The controller records the event's input first, then
//! runs the listed effects in order.

use tabula_core::SortDirection;

/// A user action against the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    /// Populate the table list (startup)
    LoadTables,
    SelectTable(String),
    SetSortColumn(String),
    SetSortDirection(SortDirection),
    Refresh,
    /// Click on the row at this index of the current row set
    ClickRow(usize),
    EditPrimaryKey { column: String, value: String },
    /// Choose the column the next update targets
    SelectField(String),
    /// Replace the text of the pending edit
    EditValue(String),
    SubmitUpdate,
    SubmitDelete,
}

/// A data operation run in response to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    ListTables,
    /// Supersede everything in flight for the previous table
    InvalidateTable,
    ResolveMetadata,
    FetchRows,
    /// Derive drafts from the clicked row
    SyncSelection,
    MutateUpdate,
    MutateDelete,
    ResetPrimaryKeyDraft,
}

/// Effects triggered by `event`, in execution order.
///
/// Draft edits only record input; they never touch the backend.
pub fn effects_for(event: &BrowserEvent) -> &'static [Effect] {
    use BrowserEvent as E;
    use Effect::*;

    match event {
        E::LoadTables => &[ListTables],
        E::SelectTable(_) => &[InvalidateTable, ResolveMetadata, FetchRows],
        E::SetSortColumn(_) | E::SetSortDirection(_) | E::Refresh => &[FetchRows],
        E::ClickRow(_) => &[SyncSelection],
        E::EditPrimaryKey { .. } | E::SelectField(_) | E::EditValue(_) => &[],
        E::SubmitUpdate => &[MutateUpdate, FetchRows],
        E::SubmitDelete => &[MutateDelete, ResetPrimaryKeyDraft, FetchRows],
    }
}

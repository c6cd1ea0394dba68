//! Row click to edit drafts

use serde_json::Value;
use tabula_core::{EditIntent, PrimaryKeyDraft, Row, TableMetadata, value_to_text};

/// Drafts derived from a clicked row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionDraft {
    pub primary_key: PrimaryKeyDraft,
    /// `None` when the table has no editable column
    pub edit: Option<EditIntent>,
}

/// Derive the primary-key draft and default edit target from a row.
///
/// Key values are copied as displayed, without coercion. The first editable
/// column becomes the edit target, seeded via [`edit_seed`].
pub fn sync_from_row(row: &Row, metadata: &TableMetadata) -> SelectionDraft {
    let primary_key = metadata
        .primary_key_columns()
        .iter()
        .map(|col| (col.clone(), row.display_value(col)))
        .collect();

    let edit = metadata
        .default_edit_column()
        .map(|col| EditIntent::new(col, edit_seed(row.get(col))));

    SelectionDraft { primary_key, edit }
}

/// Text to pre-fill the edit box with.
///
/// Structured values are pretty-printed JSON so that submitting the text
/// unchanged round-trips the same document; scalars are their plain text.
pub fn edit_seed(value: Option<&Value>) -> String {
    match value {
        Some(structured @ (Value::Object(_) | Value::Array(_))) => {
            serde_json::to_string_pretty(structured).unwrap_or_else(|_| structured.to_string())
        }
        Some(scalar) => value_to_text(scalar),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn weather_metadata() -> TableMetadata {
        TableMetadata::new(
            "weather_cache",
            ["lat", "lon", "data_ts", "data"].map(String::from).to_vec(),
            ["lat", "lon", "data_ts"].map(String::from).to_vec(),
            vec!["data".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn copies_key_values_and_pretty_prints_structured_target() {
        let row: Row = serde_json::from_value(json!({
            "lat": 34.05,
            "lon": -118.24,
            "data_ts": 1690000000,
            "data": {"a": 1}
        }))
        .unwrap();

        let draft = sync_from_row(&row, &weather_metadata());

        let expected: PrimaryKeyDraft = [("lat", "34.05"), ("lon", "-118.24"), ("data_ts", "1690000000")]
            .into_iter()
            .collect();
        assert_eq!(draft.primary_key, expected);
        assert_eq!(draft.edit, Some(EditIntent::new("data", "{\n  \"a\": 1\n}")));
    }

    #[test]
    fn scalar_target_is_seeded_raw() {
        let metadata = TableMetadata::new(
            "user_queries",
            ["session_id", "query_ts", "location_string"].map(String::from).to_vec(),
            ["session_id", "query_ts"].map(String::from).to_vec(),
            vec!["location_string".to_string()],
        )
        .unwrap();
        let row: Row = serde_json::from_value(json!({
            "session_id": "user_session_default",
            "query_ts": 1690000000,
            "location_string": "Pune, Maharashtra, IN"
        }))
        .unwrap();

        let draft = sync_from_row(&row, &metadata);
        assert_eq!(draft.primary_key.get("session_id"), Some("user_session_default"));
        assert_eq!(
            draft.edit,
            Some(EditIntent::new("location_string", "Pune, Maharashtra, IN"))
        );
    }

    #[test]
    fn no_editable_column_means_no_edit_target() {
        let metadata =
            TableMetadata::new("log", vec!["id".to_string()], vec!["id".to_string()], vec![]).unwrap();
        let row: Row = serde_json::from_value(json!({"id": 7})).unwrap();

        let draft = sync_from_row(&row, &metadata);
        assert_eq!(draft.primary_key.get("id"), Some("7"));
        assert_eq!(draft.edit, None);
    }

    #[test]
    fn missing_and_null_values_become_empty() {
        assert_eq!(edit_seed(None), "");
        assert_eq!(edit_seed(Some(&json!(null))), "");
        assert_eq!(edit_seed(Some(&json!([1, 2]))), "[\n  1,\n  2\n]");
    }
}

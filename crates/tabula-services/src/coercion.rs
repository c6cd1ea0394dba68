//! Primary-key value coercion
//!
//! Typing is by column-name convention: a fixed set of columns is known to hold
//! numbers, every other column is sent as text.

use std::collections::BTreeSet;
use tabula_core::{PrimaryKeyDraft, PrimaryKeyTuple, TypedValue};

use crate::error::{ServiceError, ServiceResult};

/// Columns coerced to numbers unless configured otherwise
pub const DEFAULT_NUMERIC_COLUMNS: [&str; 4] = ["lat", "lon", "data_ts", "fetch_ts"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionRules {
    numeric_columns: BTreeSet<String>,
}

impl Default for CoercionRules {
    fn default() -> Self {
        Self::new(DEFAULT_NUMERIC_COLUMNS)
    }
}

impl CoercionRules {
    pub fn new<I, S>(numeric_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            numeric_columns: numeric_columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric_columns.contains(column)
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &str> {
        self.numeric_columns.iter().map(String::as_str)
    }

    /// Convert one raw input for `column`.
    ///
    /// Numeric columns accept integers (kept exact) and finite floats; anything
    /// else fails with [`ServiceError::InvalidNumber`]. Other columns pass the
    /// raw text through unchanged.
    pub fn coerce(&self, column: &str, raw: &str) -> ServiceResult<TypedValue> {
        if !self.is_numeric(column) {
            return Ok(TypedValue::Text(raw.to_string()));
        }

        let trimmed = raw.trim();
        if let Ok(int) = trimmed.parse::<i64>() {
            return Ok(TypedValue::Integer(int));
        }
        match trimmed.parse::<f64>() {
            Ok(float) if float.is_finite() => Ok(TypedValue::Float(float)),
            _ => Err(ServiceError::InvalidNumber {
                column: column.to_string(),
            }),
        }
    }

    /// Coerce every primary-key column of `draft`, in key order.
    /// Stops at the first failure.
    pub fn coerce_tuple(
        &self,
        pk_columns: &[String],
        draft: &PrimaryKeyDraft,
    ) -> ServiceResult<PrimaryKeyTuple> {
        let mut tuple = PrimaryKeyTuple::new();
        for column in pk_columns {
            let raw = draft.get(column).unwrap_or_default();
            tuple.insert(column.clone(), self.coerce(column, raw)?);
        }
        Ok(tuple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_columns_parse_as_numbers() {
        let rules = CoercionRules::default();
        assert_eq!(rules.coerce("lat", "34.05").unwrap(), TypedValue::Float(34.05));
        assert_eq!(rules.coerce("lon", " -118.24 ").unwrap(), TypedValue::Float(-118.24));
        assert_eq!(
            rules.coerce("data_ts", "1690000000").unwrap(),
            TypedValue::Integer(1690000000)
        );
        assert_eq!(rules.coerce("fetch_ts", "1e3").unwrap(), TypedValue::Float(1000.0));
    }

    #[test]
    fn non_numeric_input_is_rejected() {
        let rules = CoercionRules::default();
        for raw in ["abc", "", "12abc", "NaN", "inf", "-infinity"] {
            assert_eq!(
                rules.coerce("lat", raw),
                Err(ServiceError::InvalidNumber {
                    column: "lat".into()
                }),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn other_columns_pass_through() {
        let rules = CoercionRules::default();
        assert_eq!(
            rules.coerce("session_id", "user_session_default").unwrap(),
            TypedValue::Text("user_session_default".into())
        );
        assert_eq!(
            rules.coerce("query_ts", "1690000000").unwrap(),
            TypedValue::Text("1690000000".into())
        );
    }

    #[test]
    fn extra_numeric_columns_can_be_configured() {
        let rules = CoercionRules::new(["lat", "lon", "data_ts", "fetch_ts", "query_ts"]);
        assert_eq!(
            rules.coerce("query_ts", "1690000000").unwrap(),
            TypedValue::Integer(1690000000)
        );
        assert!(rules.is_numeric("query_ts"));
    }

    #[test]
    fn tuple_stops_at_first_bad_column() {
        let rules = CoercionRules::default();
        let columns: Vec<String> = ["lat", "lon", "data_ts"].map(String::from).to_vec();
        let draft: PrimaryKeyDraft = [("lat", "34.05"), ("lon", "west"), ("data_ts", "x")]
            .into_iter()
            .collect();

        assert_eq!(
            rules.coerce_tuple(&columns, &draft),
            Err(ServiceError::InvalidNumber {
                column: "lon".into()
            })
        );
    }

    #[test]
    fn tuple_follows_key_order() {
        let rules = CoercionRules::default();
        let columns: Vec<String> = ["session_id", "query_ts"].map(String::from).to_vec();
        let draft: PrimaryKeyDraft = [("query_ts", "1690000000"), ("session_id", "abc")]
            .into_iter()
            .collect();

        let tuple = rules.coerce_tuple(&columns, &draft).unwrap();
        let keys: Vec<&String> = tuple.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["session_id", "query_ts"]);
    }
}

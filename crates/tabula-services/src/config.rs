//! Browser configuration

use crate::CoercionRules;

/// The one column whose values are JSON documents stored as text.
///
/// Rows of `table` have `column` decoded for display, and edits to it must be
/// valid JSON and are sent as the parsed structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonColumnRule {
    pub table: String,
    pub column: String,
}

impl Default for JsonColumnRule {
    fn default() -> Self {
        Self {
            table: "weather_cache".to_string(),
            column: "data".to_string(),
        }
    }
}

impl JsonColumnRule {
    pub fn applies_to_table(&self, table: &str) -> bool {
        self.table == table
    }

    pub fn applies(&self, table: &str, column: &str) -> bool {
        self.table == table && self.column == column
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Table selected when the table list first loads, if the backend has it
    pub initial_table: Option<String>,
    pub json_column: JsonColumnRule,
    pub coercion: CoercionRules,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            initial_table: Some("weather_cache".to_string()),
            json_column: JsonColumnRule::default(),
            coercion: CoercionRules::default(),
        }
    }
}

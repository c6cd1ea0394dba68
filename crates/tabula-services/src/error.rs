use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service-level errors. The `Display` text is the message shown to the user.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    /// Missing table, field or primary-key values
    #[error("{0}")]
    Validation(String),

    #[error("Column '{column}' is not editable for table '{table}'.")]
    EditableColumnViolation { column: String, table: String },

    #[error("Invalid JSON for '{column}' field.")]
    InvalidJson { column: String, reason: String },

    #[error("Invalid number for primary key field: {column}")]
    InvalidNumber { column: String },

    #[error("{0}")]
    TableListFetch(String),

    #[error("{0}")]
    MetadataFetch(String),

    #[error("{0}")]
    RowFetch(String),

    #[error("{0}")]
    Mutation(String),
}

impl ServiceError {
    /// True for errors raised before any request was sent
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_)
                | ServiceError::EditableColumnViolation { .. }
                | ServiceError::InvalidJson { .. }
                | ServiceError::InvalidNumber { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages() {
        assert_eq!(
            ServiceError::InvalidNumber {
                column: "lat".into()
            }
            .to_string(),
            "Invalid number for primary key field: lat"
        );
        assert_eq!(
            ServiceError::InvalidJson {
                column: "data".into(),
                reason: "EOF while parsing".into()
            }
            .to_string(),
            "Invalid JSON for 'data' field."
        );
        assert_eq!(
            ServiceError::EditableColumnViolation {
                column: "loc".into(),
                table: "weather_cache".into()
            }
            .to_string(),
            "Column 'loc' is not editable for table 'weather_cache'."
        );
    }

    #[test]
    fn local_errors_are_distinguished() {
        assert!(ServiceError::Validation("x".into()).is_local());
        assert!(!ServiceError::Mutation("x".into()).is_local());
        assert!(!ServiceError::RowFetch("x".into()).is_local());
    }
}

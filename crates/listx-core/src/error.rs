//! Error types for the listx document register.

use thiserror::Error;

/// Result type alias using listx's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for listx operations.
///
/// Everything here is recoverable: callers retry with corrected input.
/// Recoverable *conditions* (validation failures, rejected reorders) are
/// modeled as values, not as error variants — see
/// [`crate::validation::ValidationReport`].
#[derive(Error, Debug)]
pub enum Error {
    /// Document not found in the collection
    #[error("Document not found: {0}")]
    DocumentNotFound(uuid::Uuid),

    /// Category value absent from the collection
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Template not found in the store
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Field identifier absent from the catalog or the referenced zone
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_display_document_not_found() {
        let id = Uuid::nil();
        let err = Error::DocumentNotFound(id);
        assert_eq!(err.to_string(), format!("Document not found: {}", id));
    }

    #[test]
    fn test_error_display_category_not_found() {
        let err = Error::CategoryNotFound("NDC".to_string());
        assert_eq!(err.to_string(), "Category not found: NDC");
    }

    #[test]
    fn test_error_display_template_not_found() {
        let err = Error::TemplateNotFound("CHANTIER".to_string());
        assert_eq!(err.to_string(), "Template not found: CHANTIER");
    }

    #[test]
    fn test_error_display_field_not_found() {
        let err = Error::FieldNotFound("LOT".to_string());
        assert_eq!(err.to_string(), "Field not found: LOT");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("empty label".to_string());
        assert_eq!(err.to_string(), "Invalid input: empty label");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}

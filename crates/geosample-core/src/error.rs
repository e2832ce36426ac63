//! Error types for geosample.

use thiserror::Error;

/// Result type alias using geosample's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for geosample operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A required field was missing or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// A lookup expected exactly one document
    #[error("Lookup on \"{field}\" matched {count} documents, expected exactly one")]
    NonUniqueMatch { field: String, count: usize },

    /// Entry/document mapping failed
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The document store reported a connection, write, or query failure
    #[error("Store error: {0}")]
    Store(String),

    /// The write succeeded but secondary indexing failed
    #[error("Indexing error: {0}")]
    Index(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Encoding(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_validation() {
        let err = Error::Validation("external id is a required field".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: external id is a required field"
        );
    }

    #[test]
    fn test_error_display_non_unique_match() {
        let err = Error::NonUniqueMatch {
            field: "marti_id".to_string(),
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "Lookup on \"marti_id\" matched 2 documents, expected exactly one"
        );
    }

    #[test]
    fn test_error_display_encoding() {
        let err = Error::Encoding("missing coordinates".to_string());
        assert_eq!(err.to_string(), "Encoding error: missing coordinates");
    }

    #[test]
    fn test_error_display_store() {
        let err = Error::Store("connection refused".to_string());
        assert_eq!(err.to_string(), "Store error: connection refused");
    }

    #[test]
    fn test_error_display_index() {
        let err = Error::Index("index endpoint unavailable".to_string());
        assert_eq!(err.to_string(), "Indexing error: index endpoint unavailable");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("no collection specified".to_string());
        assert_eq!(err.to_string(), "Configuration error: no collection specified");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Encoding(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Encoding error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_error_debug_format() {
        let err = Error::Validation("test".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Validation"));
    }
}

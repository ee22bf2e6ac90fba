use shared::ErrorPayload;
use thiserror::Error;

/// Result type used across the expense domain layer.
pub type ExpenseResult<T> = Result<T, ExpenseError>;

/// Domain-level failure of an expense service operation.
///
/// Keep this limited to deterministic domain outcomes: `InvalidData` and
/// `ItemNotFound` are caller-visible and never retried; `Storage` wraps
/// whatever the persistence layer reports and is never caller-correctable.
#[derive(Debug, Error)]
pub enum ExpenseError {
    /// Caller-supplied input failed a syntactic precondition
    /// (empty string, malformed UUID).
    #[error("{0}")]
    InvalidData(String),

    /// A referenced entity does not exist, or a referential invariant
    /// (owner match, membership) does not hold.
    #[error("{0}")]
    ItemNotFound(String),

    /// The storage layer failed.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl ExpenseError {
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn item_not_found(message: impl Into<String>) -> Self {
        Self::ItemNotFound(message.into())
    }

    /// Structured payload the transport layer serializes into response bodies.
    pub fn error_payload(&self) -> ErrorPayload {
        let error_type = match self {
            Self::InvalidData(_) => "InvalidData",
            Self::ItemNotFound(_) => "ItemNotFound",
            Self::Storage(_) => "Storage",
        };

        ErrorPayload {
            error_type: error_type.to_string(),
            message: self.to_string(),
        }
    }
}

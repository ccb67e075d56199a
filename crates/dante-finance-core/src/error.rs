use thiserror::Error;

#[derive(Debug, Error)]
pub enum DanteFinanceError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DanteFinanceError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        DanteFinanceError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(context: &str) -> Self {
        DanteFinanceError::Overflow {
            context: context.into(),
        }
    }
}

impl From<serde_json::Error> for DanteFinanceError {
    fn from(e: serde_json::Error) -> Self {
        DanteFinanceError::SerializationError(e.to_string())
    }
}

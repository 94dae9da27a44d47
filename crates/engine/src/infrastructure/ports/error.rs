//! Attribute store error types.

/// Store operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A write was refused by the host; includes the subject for tracing.
    #[error("Write rejected for {subject}: {message}")]
    WriteRejected { subject: String, message: String },

    /// A read could not be served.
    #[error("Read failed in {operation}: {message}")]
    Read {
        operation: &'static str,
        message: String,
    },

    /// Loading or exporting the attribute map failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Create a WriteRejected error naming the record or attribute written.
    pub fn write_rejected(subject: impl ToString, message: impl ToString) -> Self {
        Self::WriteRejected {
            subject: subject.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a Read error with operation context.
    pub fn read(operation: &'static str, message: impl ToString) -> Self {
        Self::Read {
            operation,
            message: message.to_string(),
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }
}

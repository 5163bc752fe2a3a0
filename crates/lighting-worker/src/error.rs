//! Worker error taxonomy and wire error codes

use photometrics::PhotometricsError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Invalid message: {0}")]
    InvalidMessage(#[from] serde_json::Error),
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
    #[error(transparent)]
    Calculation(#[from] PhotometricsError),
    #[error("Failed to start worker thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("Worker is no longer accepting jobs")]
    WorkerClosed,
}

pub type Result<T> = std::result::Result<T, WorkerError>;

/// Machine-readable error class carried by `error` replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidMessage,
    UnsupportedOperation,
    InvalidInput,
    DegenerateInput,
    WorkerClosed,
    Internal,
}

impl WorkerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidMessage(_) => ErrorCode::InvalidMessage,
            Self::UnsupportedOperation(_) => ErrorCode::UnsupportedOperation,
            Self::Calculation(PhotometricsError::InvalidInput(_)) => ErrorCode::InvalidInput,
            Self::Calculation(PhotometricsError::DegenerateInput(_)) => ErrorCode::DegenerateInput,
            Self::Spawn(_) => ErrorCode::Internal,
            Self::WorkerClosed => ErrorCode::WorkerClosed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let err = WorkerError::UnsupportedOperation("render".to_string());
        assert_eq!(err.code(), ErrorCode::UnsupportedOperation);

        let err: WorkerError = PhotometricsError::DegenerateInput("zero distance".into()).into();
        assert_eq!(err.code(), ErrorCode::DegenerateInput);
        assert_eq!(err.to_string(), "Degenerate input: zero distance");
    }

    #[test]
    fn test_code_wire_names() {
        assert_eq!(
            serde_json::to_string(&ErrorCode::UnsupportedOperation).unwrap(),
            "\"unsupported_operation\""
        );
    }
}

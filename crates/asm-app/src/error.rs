//! Error types for the asm-app service layer.

use std::path::PathBuf;

use asm_machine::MachineError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Case error: {0}")]
    Case(String),

    #[error("Failed to read case file: {path}")]
    CaseFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Case validation failed: {0}")]
    Validation(String),

    /// The whole calculation was not performed; no partial results exist.
    #[error("Calculation not performed: {0}")]
    Calculation(#[from] MachineError),

    #[error("Report error: {0}")]
    Report(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for asm-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<asm_project::ProjectError> for AppError {
    fn from(err: asm_project::ProjectError) -> Self {
        match err {
            asm_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Case(other.to_string()),
        }
    }
}

impl From<asm_core::AsmError> for AppError {
    fn from(err: asm_core::AsmError) -> Self {
        AppError::Report(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

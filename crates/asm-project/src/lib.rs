//! asm-project: case file format and validation.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, collect_violations, validate_case};

use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported case file extension: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ProjectResult<CaseFile> {
    let content = std::fs::read_to_string(path)?;
    let case: CaseFile = serde_yaml::from_str(&content)?;
    validate_case(&case)?;
    Ok(case)
}

pub fn save_yaml(path: &Path, case: &CaseFile) -> ProjectResult<()> {
    validate_case(case)?;
    let content = serde_yaml::to_string(case)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<CaseFile> {
    let content = std::fs::read_to_string(path)?;
    let case: CaseFile = serde_json::from_str(&content)?;
    validate_case(&case)?;
    Ok(case)
}

pub fn save_json(path: &Path, case: &CaseFile) -> ProjectResult<()> {
    validate_case(case)?;
    let content = serde_json::to_string_pretty(case)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Parse a case without validating it, picking the format from the extension.
pub fn read_case(path: &Path) -> ProjectResult<CaseFile> {
    let content = std::fs::read_to_string(path)?;
    match extension(path).as_str() {
        "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
        "json" => Ok(serde_json::from_str(&content)?),
        other => Err(ProjectError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

/// Load and validate a YAML or JSON case file.
pub fn load_case(path: &Path) -> ProjectResult<CaseFile> {
    match extension(path).as_str() {
        "json" => load_json(path),
        "yaml" | "yml" => load_yaml(path),
        other => Err(ProjectError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

/// Save a case file as YAML or JSON depending on the extension.
pub fn save_case(path: &Path, case: &CaseFile) -> ProjectResult<()> {
    match extension(path).as_str() {
        "json" => save_json(path, case),
        "yaml" | "yml" => save_yaml(path, case),
        other => Err(ProjectError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

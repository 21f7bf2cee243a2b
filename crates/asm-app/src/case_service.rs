//! Case loading, saving and validation.

use std::path::Path;

use asm_project::CaseFile;
use tracing::info;

use crate::error::{AppError, AppResult};

/// Load and validate a YAML or JSON case file.
pub fn load_case(path: &Path) -> AppResult<CaseFile> {
    if !path.exists() {
        return Err(AppError::CaseFileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        });
    }
    let case = asm_project::load_case(path)?;
    info!(path = %path.display(), "case loaded");
    Ok(case)
}

pub fn save_case(path: &Path, case: &CaseFile) -> AppResult<()> {
    asm_project::save_case(path, case)?;
    Ok(())
}

/// Parse a case and list every validation problem in it.
///
/// Returns an empty list for a valid case.
pub fn validate_case(path: &Path) -> AppResult<Vec<String>> {
    let case = asm_project::read_case(path)?;
    Ok(asm_project::collect_violations(&case)
        .into_iter()
        .map(|e| e.to_string())
        .collect())
}

/// Write the starter case file.
pub fn write_template(path: &Path) -> AppResult<()> {
    save_case(path, &CaseFile::template())
}

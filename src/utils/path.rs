//! Path checks for output files.

use crate::errors::{AppError, AppResult};
use std::path::Path;

pub fn require_absolute(path: &Path) -> AppResult<()> {
    if path.is_absolute() {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "output file path must be absolute: {}",
            path.display()
        )))
    }
}

use std::fs;
use std::path::Path;

use dsperm_core::{AppError, AppResult};
use dsperm_domain::DesiredPermissionSet;

/// Reads a declared permission set from a JSON array of grants.
pub fn load_desired(path: &Path) -> AppResult<DesiredPermissionSet> {
    let contents = fs::read_to_string(path).map_err(|error| {
        AppError::Validation(format!(
            "failed to read permissions file '{}': {error}",
            path.display()
        ))
    })?;

    serde_json::from_str::<DesiredPermissionSet>(contents.as_str()).map_err(|error| {
        AppError::Validation(format!(
            "invalid permissions file '{}': {error}",
            path.display()
        ))
    })
}

//! Project root resolution.
//!
//! Every job runs relative to a project directory. The directory must exist
//! before anything else happens: a missing root aborts the run without
//! touching the database or the activity log.

use std::path::{Path, PathBuf};

/// Errors resolving the project root.
#[derive(Debug, thiserror::Error)]
pub enum ProjectRootError {
    #[error("Project directory {0} does not exist: {1}")]
    Missing(PathBuf, #[source] std::io::Error),

    #[error("Project path {0} is not a directory")]
    NotADirectory(PathBuf),
}

/// Resolve `root` to an absolute, existing directory.
pub fn resolve_project_root(root: &Path) -> Result<PathBuf, ProjectRootError> {
    let resolved = root
        .canonicalize()
        .map_err(|e| ProjectRootError::Missing(root.to_path_buf(), e))?;

    if !resolved.is_dir() {
        return Err(ProjectRootError::NotADirectory(resolved));
    }

    Ok(resolved)
}

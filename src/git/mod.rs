pub mod commands;
pub mod history;
pub mod parser;

use crate::error::{DevdashError, ExtractionError, Result};
use commands::{CommandRunner, ProcessRunner};
use std::path::{Path, PathBuf};

/// Whether `path` carries git metadata (`.git` directory, or a `.git` file for
/// worktrees and submodules).
pub fn has_git_metadata(path: &Path) -> bool {
    path.join(".git").exists()
}

/// Discovers the git repository root from a given path
pub fn discover_repository(start_path: &Path) -> Result<PathBuf> {
    discover_repository_with(&ProcessRunner::default(), "git", start_path)
}

pub fn discover_repository_with(
    runner: &dyn CommandRunner,
    git_binary: &str,
    start_path: &Path,
) -> Result<PathBuf> {
    let args = ["rev-parse".to_string(), "--show-toplevel".to_string()];
    match runner.run(git_binary, &args, start_path) {
        Ok(stdout) => Ok(PathBuf::from(stdout.trim())),
        Err(ExtractionError::CommandFailed { ref detail, .. })
            if detail.contains("not a git repository") =>
        {
            Err(DevdashError::NotGitRepository {
                path: start_path.to_path_buf(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

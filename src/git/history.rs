use crate::diagnostics::Diagnostics;
use crate::error::ExtractionError;
use crate::git::commands::{describe_command, CommandRunner};
use std::path::Path;
use std::sync::Arc;

pub const DEFAULT_MAX_COUNT: usize = 50;

/// `%x1f` makes git itself emit the 0x1F field separator.
pub const FIELD_SEPARATOR_PLACEHOLDER: &str = "%x1f";

/// hash, author name, author email, strict ISO committer date, subject, body,
/// parent hashes, ref decorations. Order is the record layout.
pub const LOG_FIELDS: [&str; 8] = ["%H", "%an", "%ae", "%cI", "%s", "%b", "%P", "%D"];

// stderr of `git log` in a repository whose HEAD has no commits yet
const NO_COMMITS_MARKERS: [&str; 2] = ["does not have any commits yet", "bad default revision"];

pub fn pretty_format() -> String {
    LOG_FIELDS.join(FIELD_SEPARATOR_PLACEHOLDER)
}

pub fn log_args(max_count: usize) -> Vec<String> {
    vec![
        "log".to_string(),
        format!("--pretty=format:{}", pretty_format()),
        "--date=iso-strict".to_string(),
        "--decorate=full".to_string(),
        "-z".to_string(),
        format!("--max-count={}", max_count),
    ]
}

/// Produces the raw `git log` dump for a repository.
pub struct LogExtractor {
    runner: Arc<dyn CommandRunner>,
    diagnostics: Arc<dyn Diagnostics>,
    git_binary: String,
    max_count: usize,
}

impl LogExtractor {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        diagnostics: Arc<dyn Diagnostics>,
        git_binary: impl Into<String>,
        max_count: usize,
    ) -> Self {
        Self {
            runner,
            diagnostics,
            git_binary: git_binary.into(),
            max_count,
        }
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }

    pub fn git_binary(&self) -> &str {
        &self.git_binary
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    pub fn extract(&self, repo_root: &Path) -> Result<String, ExtractionError> {
        self.extract_with_limit(repo_root, self.max_count)
    }

    /// Runs `git log` in `repo_root` and returns stdout verbatim.
    pub fn extract_with_limit(
        &self,
        repo_root: &Path,
        max_count: usize,
    ) -> Result<String, ExtractionError> {
        let args = log_args(max_count);
        self.diagnostics.debug(&format!(
            "running {} in {}",
            describe_command(&self.git_binary, &args),
            repo_root.display()
        ));

        match self.runner.run(&self.git_binary, &args, repo_root) {
            Ok(raw) => {
                self.diagnostics
                    .debug(&format!("git log produced {} bytes", raw.len()));
                Ok(raw)
            }
            Err(ExtractionError::CommandFailed { ref detail, .. })
                if NO_COMMITS_MARKERS.iter().any(|marker| detail.contains(marker)) =>
            {
                self.diagnostics
                    .debug(&format!("{} has no commits yet", repo_root.display()));
                Ok(String::new())
            }
            Err(e) => {
                self.diagnostics
                    .error(&format!("git log failed in {}: {}", repo_root.display(), e.detail()));
                Err(e)
            }
        }
    }
}

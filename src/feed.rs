use crate::commit::Commit;
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::error::Result as DevdashResult;
use crate::git;
use crate::git::commands::CommandRunner;
use crate::git::history::LogExtractor;
use crate::git::parser::parse_log_checked;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// What a consumer receives: commits, or no commits and an error. An empty
/// list without an error means the history really is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitLog {
    pub commits: Vec<Commit>,
    pub error: Option<String>,
}

impl CommitLog {
    pub fn loaded(commits: Vec<Commit>) -> Self {
        Self {
            commits,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            commits: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Extraction followed by parsing. Each fetch is independent; nothing is
/// cached between calls.
pub struct CommitFeed {
    extractor: LogExtractor,
    diagnostics: Arc<dyn Diagnostics>,
}

impl CommitFeed {
    pub fn new(config: &Config, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self::with_runner(Arc::new(config.process_runner()), config, diagnostics)
    }

    pub fn with_runner(
        runner: Arc<dyn CommandRunner>,
        config: &Config,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            extractor: LogExtractor::new(
                runner,
                diagnostics.clone(),
                config.git_binary.clone(),
                config.max_count,
            ),
            diagnostics,
        }
    }

    /// Resolves the top-level directory of the repository containing `path`.
    pub fn repository_root(&self, path: &Path) -> DevdashResult<PathBuf> {
        git::discover_repository_with(
            self.extractor.runner(),
            self.extractor.git_binary(),
            path,
        )
    }

    pub fn fetch(&self, repo_root: &Path) -> CommitLog {
        self.fetch_with_limit(repo_root, self.extractor.max_count())
    }

    pub fn fetch_with_limit(&self, repo_root: &Path, max_count: usize) -> CommitLog {
        let raw = match self.extractor.extract_with_limit(repo_root, max_count) {
            Ok(raw) => raw,
            Err(e) => return CommitLog::failed(e.detail()),
        };

        match parse_log_checked(&raw, self.diagnostics.as_ref()) {
            Ok(commits) => CommitLog::loaded(commits),
            Err(e) => CommitLog::failed(e.to_string()),
        }
    }

    /// Runs [`CommitFeed::fetch`] on a background thread.
    pub fn spawn_fetch(self: &Arc<Self>, repo_root: PathBuf) -> JoinHandle<CommitLog> {
        let feed = Arc::clone(self);
        thread::spawn(move || feed.fetch(&repo_root))
    }
}

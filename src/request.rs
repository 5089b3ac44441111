//! Messages exchanged with the dashboard webview.
//!
//! One JSON object per message. Requests are tagged by `command`, responses
//! by `type`.

use crate::commit::Commit;
use crate::error::DevdashError;
use crate::feed::CommitFeed;
use crate::git;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Request {
    #[serde(rename_all = "camelCase")]
    GetCommits {
        #[serde(default)]
        max_count: Option<usize>,
    },
    GetRepository,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Response {
    Commits {
        commits: Vec<Commit>,
        error: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Repository {
        path: PathBuf,
        root: Option<PathBuf>,
        is_repository: bool,
    },
    Error {
        message: String,
    },
}

/// Serves requests for the workspace folder at `workspace`.
pub struct RequestHandler<'a> {
    feed: &'a CommitFeed,
    workspace: PathBuf,
}

impl<'a> RequestHandler<'a> {
    pub fn new(feed: &'a CommitFeed, workspace: impl Into<PathBuf>) -> Self {
        Self {
            feed,
            workspace: workspace.into(),
        }
    }

    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::GetCommits { max_count } => {
                if !git::has_git_metadata(&self.workspace) {
                    return Response::Error {
                        message: DevdashError::NotGitRepository {
                            path: self.workspace.clone(),
                        }
                        .to_string(),
                    };
                }
                let log = match max_count {
                    Some(0) => {
                        return Response::Error {
                            message: "maxCount must be at least 1".to_string(),
                        }
                    }
                    Some(count) => self.feed.fetch_with_limit(&self.workspace, count),
                    None => self.feed.fetch(&self.workspace),
                };
                Response::Commits {
                    commits: log.commits,
                    error: log.error,
                }
            }
            Request::GetRepository => {
                let is_repository = git::has_git_metadata(&self.workspace);
                let root = if is_repository {
                    self.feed.repository_root(&self.workspace).ok()
                } else {
                    None
                };
                Response::Repository {
                    path: self.workspace.clone(),
                    root,
                    is_repository,
                }
            }
        }
    }

    /// Decodes one JSON message and answers it. Malformed input becomes
    /// [`Response::Error`].
    pub fn handle_message(&self, message: &str) -> Response {
        match serde_json::from_str::<Request>(message) {
            Ok(request) => self.handle(request),
            Err(e) => Response::Error {
                message: DevdashError::RequestError(e.to_string()).to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_decoding() {
        let request: Request = serde_json::from_str(r#"{"command":"getCommits","maxCount":5}"#).unwrap();
        assert_eq!(request, Request::GetCommits { max_count: Some(5) });

        let request: Request = serde_json::from_str(r#"{"command":"getCommits"}"#).unwrap();
        assert_eq!(request, Request::GetCommits { max_count: None });

        let request: Request = serde_json::from_str(r#"{"command":"getRepository"}"#).unwrap();
        assert_eq!(request, Request::GetRepository);
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(serde_json::from_str::<Request>(r#"{"command":"mergePullRequest"}"#).is_err());
    }

    #[test]
    fn test_response_encoding() {
        let response = Response::Repository {
            path: PathBuf::from("/work"),
            root: None,
            is_repository: false,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "repository");
        assert_eq!(json["isRepository"], false);

        let json = serde_json::to_value(Response::Error {
            message: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["message"], "boom");
    }
}

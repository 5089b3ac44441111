use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static MERGE_PR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Merge pull request #(\d+)").unwrap());
static PR_REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\d+)").unwrap());

/// One entry of repository history, exactly as git reported it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    /// Strict ISO-8601 committer date. Kept verbatim; see [`Commit::parsed_date`].
    pub date: String,
    pub subject: String,
    pub body: String,
    pub parents: Vec<String>,
    /// Raw `%D` decoration, e.g. `HEAD -> refs/heads/main, tag: refs/tags/v1.0`.
    pub refs: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "camelCase")]
pub enum RefLabel {
    /// `HEAD -> <target>` or a detached `HEAD`.
    Head(Option<String>),
    Branch(String),
    RemoteBranch(String),
    Tag(String),
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PullRequestState {
    Merged,
    Referenced,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestRef {
    pub number: u32,
    pub state: PullRequestState,
}

impl Commit {
    pub fn short_hash(&self) -> &str {
        match self.hash.char_indices().nth(7) {
            Some((idx, _)) => &self.hash[..idx],
            None => &self.hash,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn author(&self) -> String {
        if self.author_email.is_empty() {
            self.author_name.clone()
        } else {
            format!("{} <{}>", self.author_name, self.author_email)
        }
    }

    /// The committer date, if it is valid RFC 3339. Garbage yields `None`.
    pub fn parsed_date(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(self.date.trim()).ok()
    }

    /// Splits the decoration string into labels, stripping the `refs/...` prefixes
    /// that `--decorate=full` adds.
    pub fn ref_labels(&self) -> Vec<RefLabel> {
        self.refs
            .split(", ")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|decoration| {
                if decoration == "HEAD" {
                    RefLabel::Head(None)
                } else if let Some(target) = decoration.strip_prefix("HEAD -> ") {
                    RefLabel::Head(Some(short_ref_name(target).to_string()))
                } else if let Some(tag) = decoration.strip_prefix("tag: ") {
                    RefLabel::Tag(short_ref_name(tag).to_string())
                } else if let Some(branch) = decoration.strip_prefix("refs/heads/") {
                    RefLabel::Branch(branch.to_string())
                } else if let Some(remote) = decoration.strip_prefix("refs/remotes/") {
                    RefLabel::RemoteBranch(remote.to_string())
                } else {
                    RefLabel::Other(decoration.to_string())
                }
            })
            .collect()
    }

    /// Detects a GitHub pull request from the subject line.
    pub fn pull_request(&self) -> Option<PullRequestRef> {
        if let Some(captures) = MERGE_PR_REGEX.captures(&self.subject) {
            let number = captures[1].parse().ok()?;
            return Some(PullRequestRef {
                number,
                state: PullRequestState::Merged,
            });
        }

        let captures = PR_REFERENCE_REGEX.captures(&self.subject)?;
        let number = captures[1].parse().ok()?;
        Some(PullRequestRef {
            number,
            state: PullRequestState::Referenced,
        })
    }
}

fn short_ref_name(full: &str) -> &str {
    full.strip_prefix("refs/heads/")
        .or_else(|| full.strip_prefix("refs/tags/"))
        .or_else(|| full.strip_prefix("refs/remotes/"))
        .unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn commit_with(subject: &str, refs: &str) -> Commit {
        Commit {
            hash: "0123456789abcdef0123456789abcdef01234567".to_string(),
            author_name: "Jane Developer".to_string(),
            author_email: "jane@company.com".to_string(),
            date: "2024-03-05T10:15:00+01:00".to_string(),
            subject: subject.to_string(),
            refs: refs.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_short_hash() {
        let commit = commit_with("x", "");
        assert_eq!(commit.short_hash(), "0123456");

        let short = Commit {
            hash: "abc".to_string(),
            ..Default::default()
        };
        assert_eq!(short.short_hash(), "abc");
    }

    #[test]
    fn test_author_formatting() {
        let mut commit = commit_with("x", "");
        assert_eq!(commit.author(), "Jane Developer <jane@company.com>");

        commit.author_email.clear();
        assert_eq!(commit.author(), "Jane Developer");
    }

    #[test]
    fn test_parsed_date_tolerates_garbage() {
        let mut commit = commit_with("x", "");
        let parsed = commit.parsed_date().unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-03-05T10:15:00+01:00");

        commit.date = "not a date".to_string();
        assert!(commit.parsed_date().is_none());
    }

    #[test]
    fn test_ref_labels_full_decoration() {
        let commit = commit_with(
            "x",
            "HEAD -> refs/heads/main, tag: refs/tags/v1.0.0, refs/remotes/origin/main, refs/stash",
        );

        assert_eq!(
            commit.ref_labels(),
            vec![
                RefLabel::Head(Some("main".to_string())),
                RefLabel::Tag("v1.0.0".to_string()),
                RefLabel::RemoteBranch("origin/main".to_string()),
                RefLabel::Other("refs/stash".to_string()),
            ]
        );
    }

    #[test]
    fn test_ref_labels_empty_and_detached() {
        assert!(commit_with("x", "").ref_labels().is_empty());
        assert_eq!(
            commit_with("x", "HEAD, refs/heads/feature").ref_labels(),
            vec![
                RefLabel::Head(None),
                RefLabel::Branch("feature".to_string())
            ]
        );
    }

    #[test]
    fn test_pull_request_detection() {
        let cases = vec![
            (
                "Merge pull request #123 from feature/auth",
                Some((123, PullRequestState::Merged)),
            ),
            (
                "Fix authentication bug (#42)",
                Some((42, PullRequestState::Referenced)),
            ),
            ("Multiple #7 numbers #9", Some((7, PullRequestState::Referenced))),
            ("Feature PR-789", None),
            ("Regular commit message", None),
        ];

        for (subject, expected) in cases {
            let detected = commit_with(subject, "")
                .pull_request()
                .map(|pr| (pr.number, pr.state));
            assert_eq!(detected, expected, "subject: {}", subject);
        }
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(commit_with("x", "")).unwrap();
        assert_eq!(json["authorName"], "Jane Developer");
        assert_eq!(json["authorEmail"], "jane@company.com");
        assert!(json["parents"].as_array().unwrap().is_empty());
    }
}

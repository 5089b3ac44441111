#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::TestRepo;

use devdash::Commit;

/// Lays a commit out the way `git log -z` with the devdash format emits it.
pub fn encode_record(commit: &Commit) -> String {
    [
        commit.hash.as_str(),
        commit.author_name.as_str(),
        commit.author_email.as_str(),
        commit.date.as_str(),
        commit.subject.as_str(),
        commit.body.as_str(),
        commit.parents.join(" ").as_str(),
        commit.refs.as_str(),
    ]
    .join("\u{1f}")
}

/// NUL-terminated records, like `git log --pretty=tformat:... -z`.
pub fn encode_log(commits: &[Commit]) -> String {
    commits
        .iter()
        .map(|commit| format!("{}\0", encode_record(commit)))
        .collect()
}

pub fn sample_commit(hash: &str, parents: &[&str]) -> Commit {
    Commit {
        hash: hash.to_string(),
        author_name: "Test User".to_string(),
        author_email: "test@example.com".to_string(),
        date: "2024-01-15T14:30:00+00:00".to_string(),
        subject: format!("Commit {}", hash),
        body: String::new(),
        parents: parents.iter().map(|p| p.to_string()).collect(),
        refs: String::new(),
    }
}

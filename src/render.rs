use crate::commit::{Commit, PullRequestState, RefLabel};
use crate::feed::CommitLog;

/// One line per commit: short hash, date, author, labels, subject.
pub fn commit_line(commit: &Commit) -> String {
    let date = match commit.parsed_date() {
        Some(date) => date.format("%Y-%m-%d %H:%M").to_string(),
        None => commit.date.clone(),
    };

    let mut line = format!("{} {} {}", commit.short_hash(), date, commit.author_name);

    let labels: Vec<String> = commit.ref_labels().iter().map(label_text).collect();
    if !labels.is_empty() {
        line.push_str(&format!(" ({})", labels.join(", ")));
    }

    if commit.is_merge() {
        line.push_str(" [merge]");
    }

    if let Some(pr) = commit.pull_request() {
        match pr.state {
            PullRequestState::Merged => line.push_str(&format!(" [PR #{} merged]", pr.number)),
            PullRequestState::Referenced => line.push_str(&format!(" [PR #{}]", pr.number)),
        }
    }

    line.push_str(": ");
    line.push_str(&commit.subject);
    line
}

fn label_text(label: &RefLabel) -> String {
    match label {
        RefLabel::Head(Some(target)) => format!("HEAD -> {}", target),
        RefLabel::Head(None) => "HEAD".to_string(),
        RefLabel::Branch(name) | RefLabel::RemoteBranch(name) | RefLabel::Other(name) => {
            name.clone()
        }
        RefLabel::Tag(name) => format!("tag: {}", name),
    }
}

/// Commit listing for stdout. `None` for a failed log; the caller reports
/// the error.
pub fn log_text(log: &CommitLog) -> Option<String> {
    if log.is_error() {
        return None;
    }
    if log.commits.is_empty() {
        return Some("No commits yet\n".to_string());
    }
    let mut out = String::new();
    for commit in &log.commits {
        out.push_str(&commit_line(commit));
        out.push('\n');
    }
    Some(out)
}

pub fn log_json(log: &CommitLog) -> serde_json::Result<String> {
    serde_json::to_string_pretty(log)
}

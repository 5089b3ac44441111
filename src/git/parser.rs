//! Parses the raw output of the `git log` invocation built in
//! [`crate::git::history`] into [`Commit`]s.
//!
//! Records are terminated by NUL (from `-z`) and fields are separated by the
//! ASCII unit separator. Fields are positional: hash, author name, author
//! email, committer date, subject, body, parents, refs.

use crate::commit::Commit;
use crate::diagnostics::{Diagnostics, Silent};
use crate::error::ParseError;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

pub const RECORD_SEPARATOR: char = '\0';
pub const FIELD_SEPARATOR: char = '\u{1f}';
pub const FIELD_COUNT: usize = 8;

/// Parses raw log output, never failing on unusual but well-formed input.
pub fn parse_log(raw: &str) -> Vec<Commit> {
    parse_records(raw, &Silent)
}

/// Like [`parse_log`], reporting progress to `diagnostics` and turning any
/// unexpected panic into a [`ParseError`] instead of a half-built result.
///
/// The panic itself still goes through the process-wide panic hook; the
/// `devdash` binary installs one that forwards to the logger.
pub fn parse_log_checked(
    raw: &str,
    diagnostics: &dyn Diagnostics,
) -> Result<Vec<Commit>, ParseError> {
    panic::catch_unwind(AssertUnwindSafe(|| parse_records(raw, diagnostics))).map_err(
        |payload| {
            let reason = panic_message(payload.as_ref());
            diagnostics.error(&format!("git log parsing aborted: {}", reason));
            ParseError { reason }
        },
    )
}

fn parse_records(raw: &str, diagnostics: &dyn Diagnostics) -> Vec<Commit> {
    let mut records: Vec<&str> = raw.trim_end().split(RECORD_SEPARATOR).collect();

    // A trailing terminator leaves one empty element behind
    if records.last() == Some(&"") {
        records.pop();
    }

    let mut commits = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let field_count = record.matches(FIELD_SEPARATOR).count() + 1;
        if field_count > FIELD_COUNT {
            diagnostics.warn(&format!(
                "record {} has {} fields (expected {}); a field separator inside the message shifted the trailing fields",
                index, field_count, FIELD_COUNT
            ));
        }

        match parse_record(record) {
            Some(commit) => commits.push(commit),
            None => diagnostics.debug(&format!("discarding record {} with empty hash", index)),
        }
    }

    diagnostics.debug(&format!(
        "parsed {} commits from {} records",
        commits.len(),
        records.len()
    ));
    commits
}

/// Maps one record to a commit. Missing trailing fields default to empty;
/// `None` only when the hash is empty.
pub fn parse_record(record: &str) -> Option<Commit> {
    let mut fields = record.split(FIELD_SEPARATOR);
    let mut next = || fields.next().unwrap_or_default().to_string();

    let commit = Commit {
        hash: next(),
        author_name: next(),
        author_email: next(),
        date: next(),
        subject: next(),
        body: next(),
        parents: split_parents(&next()),
        refs: next(),
    };

    if commit.hash.is_empty() {
        None
    } else {
        Some(commit)
    }
}

/// `%P` is space separated; empty tokens are dropped.
pub fn split_parents(raw: &str) -> Vec<String> {
    raw.split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic while parsing".to_string()
    }
}

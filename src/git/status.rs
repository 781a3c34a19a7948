use std::collections::HashSet;

use derive_more::Display;
use serde::Serialize;

/// Working-tree state of a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GitStatus {
    #[display("modified")]
    Modified,
    #[display("untracked")]
    Untracked,
    #[display("staged")]
    Staged,
    #[display("deleted")]
    Deleted,
}

/// Snapshot of the repository state as absolute paths, stored normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitStatusReport {
    pub(super) modified: HashSet<String>,
    pub(super) untracked: HashSet<String>,
    pub(super) staged: HashSet<String>,
    pub(super) deleted: HashSet<String>,
}

impl GitStatusReport {
    /// Adds `path` to the set for `status`. Paths that normalize to
    /// nothing are dropped.
    pub fn record(&mut self, status: GitStatus, path: &str) {
        let path = normalize_path(path);
        if path.is_empty() {
            return;
        }
        let paths = match status {
            GitStatus::Modified => &mut self.modified,
            GitStatus::Untracked => &mut self.untracked,
            GitStatus::Staged => &mut self.staged,
            GitStatus::Deleted => &mut self.deleted,
        };
        paths.insert(path);
    }

    pub fn is_empty(&self) -> bool {
        self.modified.is_empty()
            && self.untracked.is_empty()
            && self.staged.is_empty()
            && self.deleted.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modified.len() + self.untracked.len() + self.staged.len() + self.deleted.len()
    }

    /// Status of `path`, checking staged, modified, untracked and deleted in
    /// that order.
    ///
    /// The query is normalized like the recorded paths and compared by
    /// suffix in either direction,
    /// so relative and absolute spellings of the same file match. Short
    /// names can match unrelated files that share the suffix.
    pub fn classify(&self, path: &str) -> Option<GitStatus> {
        let query = normalize_path(path);
        if self.is_empty() || query.is_empty() {
            return None;
        }

        [
            (GitStatus::Staged, &self.staged),
            (GitStatus::Modified, &self.modified),
            (GitStatus::Untracked, &self.untracked),
            (GitStatus::Deleted, &self.deleted),
        ]
        .into_iter()
        .find(|(_, paths)| {
            paths
                .iter()
                .any(|reported| query.ends_with(reported.as_str()) || reported.ends_with(&query))
        })
        .map(|(status, _)| status)
    }
}

/// Forward slashes only, without a leading `C:` style drive prefix.
pub fn normalize_path(path: &str) -> String {
    let slashed = path.replace('\\', "/");
    let mut chars = slashed.chars();
    match (chars.next(), chars.next()) {
        (Some(drive), Some(':')) if drive.is_ascii_alphabetic() => chars.collect(),
        _ => slashed,
    }
}

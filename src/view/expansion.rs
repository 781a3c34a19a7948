use std::collections::HashSet;

use tracing::debug;

use crate::view::NodeIndex;

/// Folder paths that are currently open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<String>,
}

impl ExpansionState {
    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    pub fn expand(&mut self, path: impl Into<String>) {
        self.expanded.insert(path.into());
    }

    /// Opens or closes the folder at `path`.
    ///
    /// Closing also closes every folder below it, including folders the
    /// index does not contain because a filter hid them. Opening only opens
    /// the folder itself. Paths that are not folders of the indexed tree
    /// are ignored. Returns whether anything changed.
    pub fn toggle(&mut self, index: &NodeIndex, path: &str) -> bool {
        if !index.is_folder(path) {
            debug!("Ignoring toggle of '{}': not a folder of the tree", path);
            return false;
        }
        if self.expanded.remove(path) {
            self.expanded.retain(|expanded| !is_below(expanded, path));
        } else {
            self.expanded.insert(path.to_string());
        }
        true
    }

    pub fn expand_all(&mut self, index: &NodeIndex) {
        self.expanded.extend(index.folders().map(str::to_string));
    }

    /// Closes everything except the root.
    pub fn collapse_all(&mut self, index: &NodeIndex) {
        self.expanded.clear();
        self.expanded.insert(index.root_path().to_string());
    }

    /// Opens every ancestor of `path` so that it becomes visible.
    pub fn reveal(&mut self, index: &NodeIndex, path: &str) {
        for ancestor in index.ancestors(path) {
            self.expanded.insert(ancestor.to_string());
        }
    }
}

/// Whether `path` lies strictly inside `folder`. Every path is below the
/// root, whose path is empty.
fn is_below(path: &str, folder: &str) -> bool {
    if folder.is_empty() {
        return !path.is_empty();
    }
    path.strip_prefix(folder)
        .is_some_and(|rest| rest.starts_with('/'))
}

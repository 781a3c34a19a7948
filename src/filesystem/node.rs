use std::cmp::Ordering;

use serde::Serialize;

use crate::git::GitStatus;

/// A single file or folder of the workspace tree.
///
/// `path` is relative to the workspace root, separated by `/`, and is the
/// identity of the node across rebuilds. The root itself has an empty path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    File {
        size: u64,
        #[serde(rename = "gitStatus", skip_serializing_if = "Option::is_none")]
        git_status: Option<GitStatus>,
    },
    Folder {
        children: Vec<FileNode>,
    },
}

impl FileNode {
    pub fn file(name: impl Into<String>, path: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::File {
                size,
                git_status: None,
            },
        }
    }

    pub fn folder(
        name: impl Into<String>,
        path: impl Into<String>,
        children: Vec<FileNode>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Folder { children },
        }
    }

    /// Stand-in tree used when there is no workspace to walk.
    pub fn no_workspace() -> Self {
        Self::folder("No workspace", "", Vec::new())
    }

    pub fn with_git_status(mut self, status: Option<GitStatus>) -> Self {
        if let NodeKind::File { git_status, .. } = &mut self.kind {
            *git_status = status;
        }
        self
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    pub fn children(&self) -> &[FileNode] {
        match &self.kind {
            NodeKind::Folder { children } => children,
            NodeKind::File { .. } => &[],
        }
    }

    pub fn size(&self) -> Option<u64> {
        match self.kind {
            NodeKind::File { size, .. } => Some(size),
            NodeKind::Folder { .. } => None,
        }
    }

    pub fn git_status(&self) -> Option<GitStatus> {
        match self.kind {
            NodeKind::File { git_status, .. } => git_status,
            NodeKind::Folder { .. } => None,
        }
    }

    /// Sum of all file sizes below this node.
    pub fn total_size(&self) -> u64 {
        match &self.kind {
            NodeKind::File { size, .. } => *size,
            NodeKind::Folder { children } => children.iter().map(FileNode::total_size).sum(),
        }
    }

    /// Lowercased extension after the last `.`, or an empty string.
    pub fn extension(&self) -> String {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default()
    }

    /// Finds the node with the given relative path in this subtree.
    pub fn find(&self, path: &str) -> Option<&FileNode> {
        if self.path == path {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(path))
    }

    /// Folders first, then by name ignoring case; exact name breaks ties.
    pub fn display_order(a: &FileNode, b: &FileNode) -> Ordering {
        match (a.is_folder(), b.is_folder()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a
                .name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name)),
        }
    }
}

/// Joins a child name onto a parent's relative path.
pub fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("main.rs", "rs")]
    #[case("Archive.TAR.GZ", "gz")]
    #[case("Makefile", "")]
    #[case(".gitignore", "gitignore")]
    #[case("trailing.", "")]
    fn extension_is_text_after_last_dot(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(FileNode::file(name, name, 0).extension(), expected);
    }

    #[test]
    fn folders_sort_before_files_and_names_ignore_case() {
        let mut nodes = vec![
            FileNode::file("b.txt", "b.txt", 1),
            FileNode::folder("zeta", "zeta", vec![]),
            FileNode::file("A.txt", "A.txt", 1),
            FileNode::folder("Alpha", "Alpha", vec![]),
        ];
        nodes.sort_by(FileNode::display_order);
        let names: Vec<_> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "zeta", "A.txt", "b.txt"]);
    }

    #[test]
    fn total_size_sums_descendant_files() {
        let tree = FileNode::folder(
            "root",
            "",
            vec![
                FileNode::file("a", "a", 10),
                FileNode::folder("sub", "sub", vec![FileNode::file("b", "sub/b", 32)]),
            ],
        );
        assert_eq!(tree.total_size(), 42);
        assert_eq!(tree.size(), None);
    }

    #[test]
    fn find_locates_nested_nodes() {
        let tree = FileNode::folder(
            "root",
            "",
            vec![FileNode::folder(
                "sub",
                "sub",
                vec![FileNode::file("b.js", "sub/b.js", 1)],
            )],
        );
        assert_eq!(tree.find("sub/b.js").map(|n| n.name.as_str()), Some("b.js"));
        assert!(tree.find("missing").is_none());
    }

    #[test]
    fn serializes_with_type_tag_and_camel_case_status() {
        let node = FileNode::file("a.ts", "a.ts", 500).with_git_status(Some(GitStatus::Staged));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["size"], 500);
        assert_eq!(json["gitStatus"], "staged");

        let folder = FileNode::folder("sub", "sub", vec![]);
        let json = serde_json::to_value(&folder).unwrap();
        assert_eq!(json["type"], "folder");
        assert!(json["children"].as_array().unwrap().is_empty());
    }

    #[test]
    fn child_path_omits_separator_under_root() {
        assert_eq!(child_path("", "src"), "src");
        assert_eq!(child_path("src", "main.rs"), "src/main.rs");
    }
}

use std::collections::HashMap;

use crate::filesystem::FileNode;

#[derive(Debug, Clone)]
struct IndexedNode {
    path: String,
    is_folder: bool,
    /// Non-owning link to the parent slot; `None` only for the root.
    parent: Option<usize>,
}

/// Flat arena over a tree for path lookups and ancestor walks.
///
/// Slots are laid out in pre-order, so slot 0 is the root.
#[derive(Debug, Clone)]
pub struct NodeIndex {
    nodes: Vec<IndexedNode>,
    by_path: HashMap<String, usize>,
}

impl NodeIndex {
    pub fn new(root: &FileNode) -> Self {
        let mut index = Self {
            nodes: Vec::new(),
            by_path: HashMap::new(),
        };
        index.insert(root, None);
        index
    }

    fn insert(&mut self, node: &FileNode, parent: Option<usize>) {
        let slot = self.nodes.len();
        self.nodes.push(IndexedNode {
            path: node.path.clone(),
            is_folder: node.is_folder(),
            parent,
        });
        self.by_path.insert(node.path.clone(), slot);
        for child in node.children() {
            self.insert(child, Some(slot));
        }
    }

    pub fn root_path(&self) -> &str {
        self.nodes.first().map_or("", |node| node.path.as_str())
    }

    pub fn is_folder(&self, path: &str) -> bool {
        self.by_path
            .get(path)
            .is_some_and(|slot| self.nodes[*slot].is_folder)
    }

    /// Paths of the strict ancestors of `path`, nearest first.
    pub fn ancestors(&self, path: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let mut current = self.by_path.get(path).and_then(|slot| self.nodes[*slot].parent);
        while let Some(slot) = current {
            out.push(self.nodes[slot].path.as_str());
            current = self.nodes[slot].parent;
        }
        out
    }

    pub fn folders(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .filter(|node| node.is_folder)
            .map(|node| node.path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> FileNode {
        FileNode::folder(
            "root",
            "",
            vec![
                FileNode::folder(
                    "a",
                    "a",
                    vec![
                        FileNode::folder("b", "a/b", vec![FileNode::file("f", "a/b/f", 1)]),
                        FileNode::file("g", "a/g", 1),
                    ],
                ),
                FileNode::folder("c", "c", vec![]),
            ],
        )
    }

    #[test]
    fn ancestors_walk_up_to_the_root() {
        let index = NodeIndex::new(&tree());
        assert_eq!(index.ancestors("a/b/f"), ["a/b", "a", ""]);
        assert!(index.ancestors("").is_empty());
        assert!(index.ancestors("missing").is_empty());
    }

    #[test]
    fn lookups_by_path() {
        let index = NodeIndex::new(&tree());
        assert_eq!(index.root_path(), "");
        assert!(index.is_folder("a/b"));
        assert!(!index.is_folder("a/g"));
        assert!(!index.is_folder("missing"));
        assert_eq!(index.folders().count(), 4);
    }
}

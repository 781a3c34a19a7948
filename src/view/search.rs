use crate::filesystem::FileNode;

/// Paths of the nodes whose name contains `query`, ignoring case, in
/// pre-order. A blank query matches nothing.
pub fn search(tree: &FileNode, query: &str) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    let mut matches = Vec::new();
    if !needle.is_empty() {
        collect(tree, &needle, &mut matches);
    }
    matches
}

fn collect(node: &FileNode, needle: &str, matches: &mut Vec<String>) {
    if node.name.to_lowercase().contains(needle) {
        matches.push(node.path.clone());
    }
    for child in node.children() {
        collect(child, needle, matches);
    }
}

use serde::Serialize;

use crate::filesystem::FileNode;
use crate::git::GitStatus;
use crate::view::ExpansionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    File,
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeType,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_status: Option<GitStatus>,
    pub expanded: bool,
    pub child_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
}

/// Flat node and link lists handed to the graph renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

/// Flattens the visible part of `tree`.
///
/// The root is always emitted. Any other node is emitted only when every
/// folder between it and the root is expanded, and links only join
/// emitted nodes. Ids are paths, except for the workspace root (see
/// [`root_id`]).
pub fn to_graph_data(tree: &FileNode, expansion: &ExpansionState) -> GraphData {
    let mut data = GraphData::default();
    visit(tree, root_id(tree), None, 0, expansion, &mut data);
    data
}

fn visit(
    node: &FileNode,
    id: String,
    parent_id: Option<&str>,
    depth: usize,
    expansion: &ExpansionState,
    data: &mut GraphData,
) {
    let expanded = node.is_folder() && expansion.is_expanded(&node.path);

    data.nodes.push(GraphNode {
        id: id.clone(),
        name: node.name.clone(),
        path: node.path.clone(),
        kind: if node.is_folder() {
            NodeType::Folder
        } else {
            NodeType::File
        },
        depth,
        size: node.size(),
        git_status: node.git_status(),
        expanded,
        child_count: node.children().len(),
    });
    if let Some(parent_id) = parent_id {
        data.links.push(GraphLink {
            source: parent_id.to_string(),
            target: id.clone(),
        });
    }

    if expanded {
        for child in node.children() {
            visit(child, child.path.clone(), Some(&id), depth + 1, expansion, data);
        }
    }
}

/// Id of the node `to_graph_data` starts from.
///
/// A subtree root keeps its path. The workspace root, whose path is empty,
/// is named after itself unless a top-level entry already has that path,
/// in which case it takes `/`, which no relative path can be.
fn root_id(root: &FileNode) -> String {
    if !root.path.is_empty() {
        return root.path.clone();
    }
    if root.children().iter().any(|child| child.path == root.name) {
        return ROOT_FALLBACK_ID.to_string();
    }
    root.name.clone()
}

const ROOT_FALLBACK_ID: &str = "/";

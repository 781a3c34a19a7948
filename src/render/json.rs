use serde::Serialize;

use crate::filesystem::FileNode;
use crate::view::GraphData;

/// Graph output plus the context a graph view needs to draw it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument<'a> {
    pub layout: &'a str,
    pub breadcrumb: &'a [String],
    pub search_matches: &'a [String],
    #[serde(flatten)]
    pub graph: &'a GraphData,
}

/// The tree as nested JSON, or `null` when the filter left nothing.
pub fn render_tree_json(tree: Option<&FileNode>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&tree)
}

pub fn render_graph_json(document: &GraphDocument) -> serde_json::Result<String> {
    serde_json::to_string_pretty(document)
}

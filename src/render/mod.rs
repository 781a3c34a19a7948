//! Turns session state into the bytes written to stdout.

mod json;
mod text;

pub use json::{GraphDocument, render_graph_json, render_tree_json};
pub use text::{TextStyle, render_text};

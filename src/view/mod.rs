//! Pure reductions from a built tree to what the user sees.
//!
//! Nothing here touches the filesystem, so every stage can be re-run on
//! each user interaction without rebuilding the tree.

mod expansion;
mod filter;
mod graph;
mod index;
mod search;

pub use expansion::ExpansionState;
pub use filter::{AllowedTypes, FilterSpec, SizeBucket, filter_tree};
pub use graph::{GraphData, to_graph_data};
pub use index::NodeIndex;
pub use search::search;

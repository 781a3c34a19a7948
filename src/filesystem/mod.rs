//! Workspace tree representation and the asynchronous walk that builds it.
//!
//! The walk is depth-bounded and exclusion-aware. Folders are the only
//! nodes that carry children; excluded folders and folders at the depth
//! limit are kept as childless leaves.

mod accessor;
mod exclusion;
mod node;
mod tree;

pub use accessor::{EntryKind, EntryStat, Filesystem, LocalFilesystem};
pub use exclusion::{ExclusionMatcher, ExclusionMode};
pub use node::{FileNode, NodeKind, child_path};
pub use tree::{TreeBuildError, TreeBuilder};

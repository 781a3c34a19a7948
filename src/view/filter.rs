use std::collections::BTreeSet;

use clap::ValueEnum;
use derive_more::Display;

use crate::filesystem::{FileNode, NodeKind};

/// Token that stands for folders in [`AllowedTypes`].
pub const FOLDER_TOKEN: &str = "folder";

const SMALL_LIMIT: u64 = 10 * 1024;
const MEDIUM_LIMIT: u64 = 100 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, ValueEnum)]
pub enum SizeBucket {
    #[default]
    #[display("all")]
    All,
    /// Under 10 KiB.
    #[display("small")]
    Small,
    /// From 10 KiB up to, not including, 100 KiB.
    #[display("medium")]
    Medium,
    /// 100 KiB and up.
    #[display("large")]
    Large,
}

impl SizeBucket {
    pub fn contains(self, size: u64) -> bool {
        match self {
            SizeBucket::All => true,
            SizeBucket::Small => size < SMALL_LIMIT,
            SizeBucket::Medium => (SMALL_LIMIT..MEDIUM_LIMIT).contains(&size),
            SizeBucket::Large => size >= MEDIUM_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AllowedTypes {
    #[default]
    Any,
    /// Lowercase extensions, plus [`FOLDER_TOKEN`] to keep folders.
    Only(BTreeSet<String>),
}

impl AllowedTypes {
    pub fn only<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        AllowedTypes::Only(
            tokens
                .into_iter()
                .map(|token| token.as_ref().trim().trim_start_matches('.').to_lowercase())
                .collect(),
        )
    }

    pub fn allows(&self, token: &str) -> bool {
        match self {
            AllowedTypes::Any => true,
            AllowedTypes::Only(tokens) => tokens.contains(token),
        }
    }
}

/// Visibility constraints chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub allowed_types: AllowedTypes,
    pub max_depth: usize,
    pub size_bucket: SizeBucket,
    /// Display only; never affects which nodes survive.
    pub show_labels: bool,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            allowed_types: AllowedTypes::Any,
            max_depth: 10,
            size_bucket: SizeBucket::All,
            show_labels: true,
        }
    }
}

/// The type token of a node: `folder` or its lowercase extension.
pub fn type_token(node: &FileNode) -> String {
    if node.is_folder() {
        FOLDER_TOKEN.to_string()
    } else {
        node.extension()
    }
}

/// Returns a pruned copy of `node`, which sits at `depth` below the root.
///
/// Folders are subject to the type filter like files and are dropped when
/// none of their children survive. The input tree is left untouched.
pub fn filter_tree(node: &FileNode, depth: usize, spec: &FilterSpec) -> Option<FileNode> {
    if depth > spec.max_depth {
        return None;
    }
    if !spec.allowed_types.allows(&type_token(node)) {
        return None;
    }

    match &node.kind {
        NodeKind::File { size, .. } => spec
            .size_bucket
            .contains(*size)
            .then(|| node.clone()),
        NodeKind::Folder { children } => {
            let children: Vec<FileNode> = children
                .iter()
                .filter_map(|child| filter_tree(child, depth + 1, spec))
                .collect();
            if children.is_empty() {
                return None;
            }
            Some(FileNode {
                name: node.name.clone(),
                path: node.path.clone(),
                kind: NodeKind::Folder { children },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// `root/a.ts` (500 B) and `root/sub/b.js` (20000 B).
    fn sample_tree() -> FileNode {
        FileNode::folder(
            "root",
            "",
            vec![
                FileNode::folder(
                    "sub",
                    "sub",
                    vec![FileNode::file("b.js", "sub/b.js", 20000)],
                ),
                FileNode::file("a.ts", "a.ts", 500),
            ],
        )
    }

    fn wide_tree() -> FileNode {
        FileNode::folder(
            "root",
            "",
            vec![
                FileNode::folder(
                    "src",
                    "src",
                    vec![
                        FileNode::folder(
                            "deep",
                            "src/deep",
                            vec![FileNode::file("x.rs", "src/deep/x.rs", 200_000)],
                        ),
                        FileNode::folder("empty", "src/empty", vec![]),
                        FileNode::file("lib.rs", "src/lib.rs", 12_000),
                        FileNode::file("README", "src/README", 3),
                    ],
                ),
                FileNode::file("Cargo.TOML", "Cargo.TOML", 700),
            ],
        )
    }

    fn spec(allowed_types: AllowedTypes, max_depth: usize, size_bucket: SizeBucket) -> FilterSpec {
        FilterSpec {
            allowed_types,
            max_depth,
            size_bucket,
            show_labels: true,
        }
    }

    fn has_empty_folder(node: &FileNode) -> bool {
        match &node.kind {
            NodeKind::Folder { children } => {
                children.is_empty() || children.iter().any(has_empty_folder)
            }
            NodeKind::File { .. } => false,
        }
    }

    fn depth_of(node: &FileNode) -> usize {
        node.children()
            .iter()
            .map(|c| 1 + depth_of(c))
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn disallowed_extension_empties_and_prunes_its_folder() {
        let result = filter_tree(
            &sample_tree(),
            0,
            &spec(AllowedTypes::only(["ts", "folder"]), 10, SizeBucket::All),
        )
        .expect("root survives");

        assert_eq!(result.children().len(), 1);
        assert_eq!(result.children()[0].path, "a.ts");
        assert!(result.find("sub").is_none());
    }

    #[test]
    fn large_bucket_prunes_everything_below_100_kib() {
        let result = filter_tree(
            &sample_tree(),
            0,
            &spec(AllowedTypes::only(["ts", "js", "folder"]), 10, SizeBucket::Large),
        );
        assert!(result.is_none());
    }

    #[test]
    fn medium_bucket_keeps_twenty_thousand_bytes() {
        let result = filter_tree(
            &sample_tree(),
            0,
            &spec(AllowedTypes::only(["ts", "js", "folder"]), 10, SizeBucket::Medium),
        )
        .expect("root survives");
        assert!(result.find("sub/b.js").is_some());
        assert!(result.find("a.ts").is_none());
    }

    #[rstest]
    #[case(SizeBucket::Small, 10_239, true)]
    #[case(SizeBucket::Small, 10_240, false)]
    #[case(SizeBucket::Medium, 10_240, true)]
    #[case(SizeBucket::Medium, 102_399, true)]
    #[case(SizeBucket::Medium, 102_400, false)]
    #[case(SizeBucket::Large, 102_399, false)]
    #[case(SizeBucket::Large, 102_400, true)]
    #[case(SizeBucket::All, 0, true)]
    fn bucket_boundaries(#[case] bucket: SizeBucket, #[case] size: u64, #[case] expected: bool) {
        assert_eq!(bucket.contains(size), expected);
    }

    #[test]
    fn folders_need_the_folder_token() {
        let result = filter_tree(&sample_tree(), 0, &spec(AllowedTypes::only(["ts", "js"]), 10, SizeBucket::All));
        assert!(result.is_none());
    }

    #[test]
    fn depth_limit_prunes_deeper_nodes() {
        let tree = wide_tree();
        let result = filter_tree(&tree, 0, &spec(AllowedTypes::Any, 1, SizeBucket::All)).expect("root survives");
        assert_eq!(
            result.children().iter().map(|c| c.path.as_str()).collect::<Vec<_>>(),
            ["Cargo.TOML"]
        );

        for max_depth in 0..4 {
            if let Some(result) = filter_tree(&tree, 0, &spec(AllowedTypes::Any, max_depth, SizeBucket::All)) {
                assert!(depth_of(&result) <= max_depth);
            }
        }
    }

    #[test]
    fn extensions_compare_lowercase_and_missing_extension_is_empty() {
        let tree = wide_tree();
        let result = filter_tree(&tree, 0, &spec(AllowedTypes::only(["toml", "", "folder"]), 10, SizeBucket::All))
            .expect("root survives");
        assert!(result.find("Cargo.TOML").is_some());
        assert!(result.find("src/README").is_some());
        assert!(result.find("src/lib.rs").is_none());
    }

    #[rstest]
    #[case(spec(AllowedTypes::Any, 10, SizeBucket::All))]
    #[case(spec(AllowedTypes::Any, 1, SizeBucket::All))]
    #[case(spec(AllowedTypes::only(["rs", "folder"]), 10, SizeBucket::All))]
    #[case(spec(AllowedTypes::only(["rs", "folder"]), 10, SizeBucket::Medium))]
    #[case(spec(AllowedTypes::Any, 10, SizeBucket::Large))]
    #[case(spec(AllowedTypes::Any, 10, SizeBucket::Small))]
    fn filtered_trees_have_no_empty_folders_and_refilter_is_a_no_op(#[case] spec: FilterSpec) {
        let tree = wide_tree();
        if let Some(once) = filter_tree(&tree, 0, &spec) {
            assert!(!has_empty_folder(&once));
            assert_eq!(filter_tree(&once, 0, &spec), Some(once.clone()));
        }
    }

    #[test]
    fn input_tree_is_not_mutated() {
        let tree = wide_tree();
        let before = tree.clone();
        let _ = filter_tree(&tree, 0, &spec(AllowedTypes::only(["rs", "folder"]), 1, SizeBucket::Large));
        assert_eq!(tree, before);
    }

    #[test]
    fn allowed_types_normalize_tokens() {
        let allowed = AllowedTypes::only([".TS", " js "]);
        assert!(allowed.allows("ts"));
        assert!(allowed.allows("js"));
        assert!(!allowed.allows("folder"));
        assert!(AllowedTypes::Any.allows("anything"));
    }

    #[test]
    fn labels_do_not_affect_filtering() {
        let tree = wide_tree();
        let mut hidden = FilterSpec::default();
        hidden.show_labels = false;
        assert_eq!(
            filter_tree(&tree, 0, &hidden),
            filter_tree(&tree, 0, &FilterSpec::default())
        );
    }
}

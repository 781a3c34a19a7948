use tracing::{debug, info};

use crate::filesystem::{FileNode, Filesystem, TreeBuildError, TreeBuilder};
use crate::git::GitStatusSource;
use crate::session::{Intent, Outcome};
use crate::view::{
    ExpansionState, FilterSpec, GraphData, NodeIndex, filter_tree, search, to_graph_data,
};

/// Inputs of a tree build that come from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    pub max_depth: usize,
    pub exclude_patterns: Vec<String>,
    pub include_git_status: bool,
}

/// Owns the state of one viewing session: the cached tree and everything
/// the user has chosen about how to look at it.
///
/// Only [`Session::refresh`] touches the disk. Every other operation
/// re-derives its output from the cached tree.
pub struct Session<F, G> {
    builder: TreeBuilder<F, G>,
    settings: BuildSettings,
    tree: Option<FileNode>,
    filter: FilterSpec,
    expansion: ExpansionState,
    focus: Option<String>,
    search_matches: Vec<String>,
}

impl<F: Filesystem, G: GitStatusSource> Session<F, G> {
    pub fn new(builder: TreeBuilder<F, G>, settings: BuildSettings) -> Self {
        Self {
            builder,
            settings,
            tree: None,
            filter: FilterSpec::default(),
            expansion: ExpansionState::default(),
            focus: None,
            search_matches: Vec::new(),
        }
    }

    /// Rebuilds the tree from disk and replaces the cached one.
    ///
    /// The root is expanded on the first successful load. Expansion state
    /// is kept across rebuilds since paths are stable.
    pub async fn refresh(&mut self) -> Result<&FileNode, TreeBuildError> {
        let tree = self
            .builder
            .build_tree(
                self.settings.max_depth,
                &self.settings.exclude_patterns,
                self.settings.include_git_status,
            )
            .await?;

        if self.tree.is_none() {
            self.expansion.expand(tree.path.clone());
        }
        info!("Tree loaded: {} bytes in files", tree.total_size());
        Ok(&*self.tree.insert(tree))
    }

    pub fn apply(&mut self, intent: Intent) -> Outcome {
        debug!("Applying {:?}", intent);
        match intent {
            Intent::OpenFile(path) => self.open_file(&path),
            Intent::SetFilter(spec) => {
                if spec == self.filter {
                    return Outcome::Ignored;
                }
                self.filter = spec;
                Outcome::Redraw
            }
            Intent::ToggleFolder(path) => self.with_index(|session, index| {
                session.expansion.toggle(index, &path)
            }),
            Intent::ExpandAll => self.with_index(|session, index| {
                session.expansion.expand_all(index);
                true
            }),
            Intent::CollapseAll => self.with_index(|session, index| {
                session.expansion.collapse_all(index);
                true
            }),
            Intent::Search(query) => self.run_search(&query),
            Intent::Focus(path) => self.focus_on(path),
        }
    }

    pub fn tree(&self) -> Option<&FileNode> {
        self.tree.as_ref()
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn search_matches(&self) -> &[String] {
        &self.search_matches
    }

    /// The cached tree reduced by the current filter.
    pub fn filtered_tree(&self) -> Option<FileNode> {
        self.tree
            .as_ref()
            .and_then(|tree| filter_tree(tree, 0, &self.filter))
    }

    /// The subtree currently on screen together with the expansion state
    /// to flatten it with. A focused folder is always shown expanded.
    pub fn visible(&self) -> Option<(FileNode, ExpansionState)> {
        let filtered = self.filtered_tree()?;
        let focused = self
            .focus
            .as_deref()
            .and_then(|path| filtered.find(path))
            .filter(|node| node.is_folder())
            .cloned();

        match focused {
            Some(node) => {
                let mut expansion = self.expansion.clone();
                expansion.expand(node.path.clone());
                Some((node, expansion))
            }
            None => Some((filtered, self.expansion.clone())),
        }
    }

    pub fn graph_data(&self) -> GraphData {
        self.visible()
            .map(|(root, expansion)| to_graph_data(&root, &expansion))
            .unwrap_or_default()
    }

    /// Paths from the root down to the focused folder, inclusive.
    pub fn breadcrumb(&self) -> Vec<String> {
        let (Some(filtered), Some(focus)) = (self.filtered_tree(), self.focus.as_deref()) else {
            return Vec::new();
        };
        let index = NodeIndex::new(&filtered);
        if !index.is_folder(focus) {
            return Vec::new();
        }
        let mut crumbs: Vec<String> = index
            .ancestors(focus)
            .into_iter()
            .rev()
            .map(str::to_string)
            .collect();
        crumbs.push(focus.to_string());
        crumbs
    }

    fn with_index(&mut self, change: impl FnOnce(&mut Self, &NodeIndex) -> bool) -> Outcome {
        let Some(filtered) = self.filtered_tree() else {
            return Outcome::Ignored;
        };
        let index = NodeIndex::new(&filtered);
        if change(self, &index) {
            Outcome::Redraw
        } else {
            Outcome::Ignored
        }
    }

    fn open_file(&self, path: &str) -> Outcome {
        let (Some(root), Some(tree)) = (self.builder.root(), self.tree.as_ref()) else {
            return Outcome::Ignored;
        };
        match tree.find(path) {
            Some(node) if !node.is_folder() => Outcome::Open(root.join(path)),
            _ => {
                debug!("Ignoring open of '{}': not a file of the tree", path);
                Outcome::Ignored
            }
        }
    }

    fn run_search(&mut self, query: &str) -> Outcome {
        let Some(filtered) = self.filtered_tree() else {
            self.search_matches.clear();
            return Outcome::Ignored;
        };
        self.search_matches = search(&filtered, query);
        info!("Search '{}': {} matches", query, self.search_matches.len());

        let index = NodeIndex::new(&filtered);
        for path in &self.search_matches {
            self.expansion.reveal(&index, path);
        }
        Outcome::Redraw
    }

    fn focus_on(&mut self, path: Option<String>) -> Outcome {
        match path {
            None => {
                if self.focus.take().is_some() {
                    Outcome::Redraw
                } else {
                    Outcome::Ignored
                }
            }
            Some(path) => {
                let is_folder = self
                    .filtered_tree()
                    .is_some_and(|tree| tree.find(&path).is_some_and(FileNode::is_folder));
                if !is_folder {
                    debug!("Ignoring focus on '{}': not a visible folder", path);
                    return Outcome::Ignored;
                }
                self.focus = Some(path);
                Outcome::Redraw
            }
        }
    }
}

use std::path::{Path, PathBuf};

use futures::future::{FutureExt, LocalBoxFuture, join_all};
use snafu::{ResultExt, Snafu};
use tracing::{debug, info, warn};

use crate::ext::BestEffortPathExt;
use crate::filesystem::{
    EntryKind, EntryStat, ExclusionMatcher, ExclusionMode, FileNode, Filesystem, child_path,
};
use crate::git::{GitStatusReport, GitStatusSource};

/// Walks a workspace root into a [`FileNode`] tree.
///
/// Siblings are built concurrently and joined before their parent is
/// sorted. Failures below the root are logged and isolated to the entry
/// that failed.
#[derive(Debug, Clone)]
pub struct TreeBuilder<F, G> {
    fs: F,
    git: G,
    root: Option<PathBuf>,
    exclusion_mode: ExclusionMode,
}

/// Per-build state shared by every node of one walk.
struct BuildContext<'a> {
    max_depth: usize,
    matcher: ExclusionMatcher,
    git_report: Option<&'a GitStatusReport>,
}

impl<F: Filesystem, G: GitStatusSource> TreeBuilder<F, G> {
    pub fn new(fs: F, git: G, root: Option<PathBuf>) -> Self {
        Self {
            fs,
            git,
            root,
            exclusion_mode: ExclusionMode::default(),
        }
    }

    pub fn with_exclusion_mode(mut self, mode: ExclusionMode) -> Self {
        self.exclusion_mode = mode;
        self
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub async fn build_tree(
        &self,
        max_depth: usize,
        exclude_patterns: &[String],
        include_git_status: bool,
    ) -> Result<FileNode, TreeBuildError> {
        let Some(root) = self.root.as_deref() else {
            info!("No workspace root, returning an empty tree");
            return Ok(FileNode::no_workspace());
        };

        // one snapshot for the whole walk
        let git_report = if include_git_status {
            Some(self.git.status().await)
        } else {
            None
        };

        let stat = self.fs.stat(root).await.context(RootUnavailableSnafu {
            path: root.best_effort_path_display(),
        })?;

        let context = BuildContext {
            max_depth,
            matcher: ExclusionMatcher::new(exclude_patterns, self.exclusion_mode),
            git_report: git_report.as_ref(),
        };

        info!(
            "Building tree for {} (max depth {})",
            root.best_effort_path_display(),
            max_depth
        );
        Ok(self
            .build_from_stat(&context, root, String::new(), root.display_name(), 0, stat)
            .await)
    }

    fn build_entry<'a>(
        &'a self,
        context: &'a BuildContext<'a>,
        path: PathBuf,
        relative_path: String,
        name: String,
        depth: usize,
    ) -> LocalBoxFuture<'a, Option<FileNode>> {
        async move {
            let stat = match self.fs.stat(&path).await {
                Ok(stat) => stat,
                Err(e) => {
                    warn!("Failed to stat {}: {}", path.best_effort_path_display(), e);
                    return None;
                }
            };
            if stat.kind == EntryKind::Other {
                debug!("Skipping special file {}", relative_path);
                return None;
            }
            Some(
                self.build_from_stat(context, &path, relative_path, name, depth, stat)
                    .await,
            )
        }
        .boxed_local()
    }

    async fn build_from_stat(
        &self,
        context: &BuildContext<'_>,
        path: &Path,
        relative_path: String,
        name: String,
        depth: usize,
        stat: EntryStat,
    ) -> FileNode {
        let match_path = if relative_path.is_empty() {
            name.as_str()
        } else {
            relative_path.as_str()
        };
        let excluded = context.matcher.is_excluded(match_path);

        if stat.kind != EntryKind::Directory {
            let node = FileNode::file(name, relative_path, stat.size);
            if excluded {
                return node;
            }
            let status = context
                .git_report
                .and_then(|report| report.classify(&path.to_string_lossy()));
            return node.with_git_status(status);
        }

        if excluded {
            debug!("Excluded folder '{}'", match_path);
            return FileNode::folder(name, relative_path, Vec::new());
        }
        if depth >= context.max_depth {
            return FileNode::folder(name, relative_path, Vec::new());
        }

        let entries = match self.fs.read_dir(path).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Failed to read directory {}: {}",
                    path.best_effort_path_display(),
                    e
                );
                return FileNode::folder(name, relative_path, Vec::new());
            }
        };
        debug!("Reading {} entries of '{}'", entries.len(), match_path);

        let pending = entries.into_iter().map(|entry| {
            let child_relative = child_path(&relative_path, &entry);
            self.build_entry(context, path.join(&entry), child_relative, entry, depth + 1)
        });
        let mut children: Vec<FileNode> = join_all(pending).await.into_iter().flatten().collect();
        children.sort_by(FileNode::display_order);

        FileNode::folder(name, relative_path, children)
    }
}

#[derive(Debug, Snafu)]
pub enum TreeBuildError {
    #[snafu(display("Tree unavailable: cannot read workspace root {}", path))]
    RootUnavailable {
        path: String,
        source: std::io::Error,
    },
}

use std::path::{Path, PathBuf};

use compio::process::Command;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info, warn};

use crate::ext::BestEffortPathExt;
use crate::git::{GitStatus, GitStatusReport};

/// Provider of repository state for a tree build.
///
/// Implementations never fail: a missing repository or git binary is
/// reported as an empty snapshot.
pub trait GitStatusSource {
    async fn status(&self) -> GitStatusReport;
}

/// Queries the `git` executable for the repository containing `root`.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn query(&self) -> Result<GitStatusReport, GitQueryError> {
        let toplevel = self.run(&["rev-parse", "--show-toplevel"]).await?;
        let toplevel = PathBuf::from(toplevel.trim());
        debug!("Repository toplevel: {}", toplevel.display());

        let porcelain = self
            .run(&["status", "--porcelain=v1", "-z", "--untracked-files=all"])
            .await?;
        Ok(parse_porcelain(&toplevel, &porcelain))
    }

    async fn run(&self, args: &[&str]) -> Result<String, GitQueryError> {
        let mut cmd = Command::new("git");
        cmd.args(args);
        cmd.current_dir(&self.root);

        let output = cmd.output().await.context(SpawnSnafu {
            args: args.join(" "),
        })?;
        if !output.status.success() {
            return Err(GitQueryError::Unsuccessful {
                args: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl GitStatusSource for GitCli {
    async fn status(&self) -> GitStatusReport {
        match self.query().await {
            Ok(report) => {
                info!("Git status: {} changed paths", report.len());
                report
            }
            Err(e) => {
                info!(
                    "No git status for {}: {}",
                    self.root.best_effort_path_display(),
                    e
                );
                GitStatusReport::default()
            }
        }
    }
}

/// Source for builds that skip git entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGit;

impl GitStatusSource for NoGit {
    async fn status(&self) -> GitStatusReport {
        GitStatusReport::default()
    }
}

/// Parses `git status --porcelain=v1 -z` output into absolute paths.
///
/// The index column marks a file staged, the worktree column marks it
/// modified or deleted, and `??` marks it untracked. A path may land in
/// more than one set.
pub fn parse_porcelain(toplevel: &Path, output: &str) -> GitStatusReport {
    let mut report = GitStatusReport::default();
    let mut entries = output.split('\0').filter(|entry| !entry.is_empty());

    while let Some(entry) = entries.next() {
        let (Some(code), Some(path)) = (entry.get(..2), entry.get(3..)) else {
            warn!("Skipping malformed git status entry: {:?}", entry);
            continue;
        };
        let mut code = code.chars();
        let (index, worktree) = match (code.next(), code.next()) {
            (Some(index), Some(worktree)) => (index, worktree),
            _ => continue,
        };

        // renames and copies are followed by their source path
        if matches!(index, 'R' | 'C') {
            entries.next();
        }

        let absolute = toplevel.join(path).to_string_lossy().into_owned();
        match (index, worktree) {
            ('?', '?') => report.record(GitStatus::Untracked, &absolute),
            ('!', '!') => {}
            _ => {
                if index != ' ' {
                    report.record(GitStatus::Staged, &absolute);
                }
                match worktree {
                    'M' | 'T' => report.record(GitStatus::Modified, &absolute),
                    'D' => report.record(GitStatus::Deleted, &absolute),
                    _ => {}
                }
            }
        }
    }

    report
}

#[derive(Debug, Snafu)]
pub enum GitQueryError {
    #[snafu(display("Failed to run 'git {}'", args))]
    SpawnError {
        args: String,
        source: std::io::Error,
    },
    #[snafu(display("'git {}' failed: {}", args, stderr))]
    Unsuccessful { args: String, stderr: String },
}

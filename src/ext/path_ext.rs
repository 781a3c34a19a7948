use std::path::{Component, Path, PathBuf};

/// Human-facing renderings of paths that may not exist yet.
pub trait BestEffortPathExt {
    /// The canonical path when it resolves, otherwise the path made
    /// absolute against the working directory with `.` and `..` folded.
    fn best_effort_path_display(&self) -> String;

    /// Last component of [`BestEffortPathExt::best_effort_path_display`], or
    /// the whole display when there is none (a filesystem root).
    fn display_name(&self) -> String;
}

impl BestEffortPathExt for Path {
    fn best_effort_path_display(&self) -> String {
        if let Ok(canonical) = self.canonicalize() {
            return canonical.display().to_string();
        }
        let absolute = if self.is_absolute() {
            self.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(self))
                .unwrap_or_else(|_| self.to_path_buf())
        };
        fold_dots(&absolute).display().to_string()
    }

    fn display_name(&self) -> String {
        let display = self.best_effort_path_display();
        Path::new(&display)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or(display)
    }
}

fn fold_dots(path: &Path) -> PathBuf {
    let mut folded: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(folded.last(), Some(Component::Normal(_))) {
                    folded.pop();
                }
            }
            other => folded.push(other),
        }
    }
    folded.iter().collect()
}

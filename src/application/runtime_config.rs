use std::path::PathBuf;

use crate::application::data::OutputFormat;
use crate::cli::Cli;
use crate::config::ProjectConfig;
use crate::filesystem::ExclusionMode;
use crate::session::{BuildSettings, Intent};
use crate::view::{AllowedTypes, FilterSpec};

/// Command line flags merged over `strukt.yaml`.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub root: Option<PathBuf>,
    pub build: BuildSettings,
    pub exclude_mode: ExclusionMode,
    pub layout: String,
    pub filter: FilterSpec,
    pub expand_all: bool,
    pub collapse_all: bool,
    pub toggles: Vec<String>,
    pub search: Option<String>,
    pub focus: Option<String>,
    pub open: Option<String>,
    pub format: OutputFormat,
}

impl RuntimeConfig {
    pub fn new(cli: Cli, root: Option<PathBuf>, project: ProjectConfig) -> Self {
        let mut exclude_patterns = project.exclude_patterns;
        exclude_patterns.extend(cli.exclude);

        let allowed_types = if cli.types.is_empty() {
            AllowedTypes::Any
        } else {
            AllowedTypes::only(cli.types)
        };

        Self {
            root,
            build: BuildSettings {
                max_depth: cli.max_depth.unwrap_or(project.max_depth),
                exclude_patterns,
                include_git_status: project.show_git_status && !cli.no_git,
            },
            exclude_mode: cli.exclude_mode.unwrap_or(project.exclude_mode),
            layout: project.layout,
            filter: FilterSpec {
                allowed_types,
                max_depth: cli.filter_depth,
                size_bucket: cli.size,
                show_labels: !cli.no_labels,
            },
            expand_all: cli.expand_all,
            collapse_all: cli.collapse_all,
            toggles: cli.toggle,
            search: cli.search,
            focus: cli.focus,
            open: cli.open,
            format: cli.format,
        }
    }

    /// View changes requested on the command line, in the order a user
    /// would make them.
    pub fn intents(&self) -> Vec<Intent> {
        let mut intents = vec![Intent::SetFilter(self.filter.clone())];
        if self.expand_all {
            intents.push(Intent::ExpandAll);
        }
        if self.collapse_all {
            intents.push(Intent::CollapseAll);
        }
        intents.extend(self.toggles.iter().cloned().map(Intent::ToggleFolder));
        if let Some(query) = &self.search {
            intents.push(Intent::Search(query.clone()));
        }
        if let Some(path) = &self.focus {
            intents.push(Intent::Focus(Some(path.clone())));
        }
        intents
    }
}

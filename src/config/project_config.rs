use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::{
    borrow::Cow,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::{ext::BestEffortPathExt, filesystem::ExclusionMode};

const CONFIG_FILE_NAME: &str = "strukt.yaml";

const MAX_DEPTH_KEY: &str = "maxDepth";
const EXCLUDE_PATTERNS_KEY: &str = "excludePatterns";
const EXCLUDE_MODE_KEY: &str = "excludeMode";
const SHOW_GIT_STATUS_KEY: &str = "showGitStatus";
const LAYOUT_KEY: &str = "layout";

pub const DEFAULT_EXCLUDE_PATTERNS: [&str; 5] = ["node_modules", ".git", "dist", "out", "build"];

fn get_config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Per-workspace settings read from `strukt.yaml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub max_depth: usize,
    pub exclude_patterns: Vec<String>,
    pub exclude_mode: ExclusionMode,
    pub show_git_status: bool,
    /// Passed through to graph output untouched.
    pub layout: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            exclude_mode: ExclusionMode::Substring,
            show_git_status: true,
            layout: "breadthfirst".to_string(),
        }
    }
}

impl ProjectConfig {
    pub async fn read(root: &Path) -> Result<Self, ProjectConfigError> {
        Self::from_path(get_config_file_path(root)).await
    }

    /// Loads the file at `path`, or the defaults when it does not exist.
    pub async fn from_path(path: PathBuf) -> Result<Self, ProjectConfigError> {
        debug!("Opening config file: {}", path.best_effort_path_display());
        let bytes = match compio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No {} found, using defaults", CONFIG_FILE_NAME);
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).context(ReadSnafu {
                    file_path: path.best_effort_path_display(),
                });
            }
        };
        debug!("Successfully read config file: {} bytes", bytes.len());

        let contents = String::from_utf8_lossy(&bytes);
        Self::try_from(&*contents)
    }

    fn apply_yaml(
        &mut self,
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<(), ProjectConfigError> {
        if let Some(value) = lookup(top_level, MAX_DEPTH_KEY) {
            self.max_depth = match value {
                Yaml::Value(Scalar::Integer(depth)) if *depth >= 0 => *depth as usize,
                _ => return invalid(MAX_DEPTH_KEY, "a non-negative integer"),
            };
        }

        if let Some(value) = lookup(top_level, EXCLUDE_PATTERNS_KEY) {
            let Some(items) = value.as_sequence() else {
                return invalid(EXCLUDE_PATTERNS_KEY, "a list of strings");
            };
            self.exclude_patterns = items
                .iter()
                .map(|item| item.as_str().map(|s| s.to_string()))
                .collect::<Option<Vec<_>>>()
                .context(InvalidValueSnafu {
                    key: EXCLUDE_PATTERNS_KEY,
                    expected: "a list of strings",
                })?;
        }

        if let Some(value) = lookup(top_level, EXCLUDE_MODE_KEY) {
            self.exclude_mode = value
                .as_str()
                .and_then(ExclusionMode::from_tag)
                .context(InvalidValueSnafu {
                    key: EXCLUDE_MODE_KEY,
                    expected: "'substring' or 'glob'",
                })?;
        }

        if let Some(value) = lookup(top_level, SHOW_GIT_STATUS_KEY) {
            self.show_git_status = match value {
                Yaml::Value(Scalar::Boolean(show)) => *show,
                _ => return invalid(SHOW_GIT_STATUS_KEY, "a boolean"),
            };
        }

        if let Some(value) = lookup(top_level, LAYOUT_KEY) {
            self.layout = value
                .as_str()
                .context(InvalidValueSnafu {
                    key: LAYOUT_KEY,
                    expected: "a string",
                })?
                .to_string();
        }

        for key in top_level.keys() {
            match key.as_str() {
                Some(
                    MAX_DEPTH_KEY | EXCLUDE_PATTERNS_KEY | EXCLUDE_MODE_KEY | SHOW_GIT_STATUS_KEY
                    | LAYOUT_KEY,
                ) => {}
                _ => debug!("Ignoring unknown config key: {:?}", key),
            }
        }

        Ok(())
    }
}

fn lookup<'a>(top_level: &'a LinkedHashMap<Yaml, Yaml>, key: &'static str) -> Option<&'a Yaml<'a>> {
    top_level
        .get(&Yaml::Value(Scalar::String(Cow::Borrowed(key))))
        .filter(|value| !value.is_null())
}

fn invalid<T>(key: &'static str, expected: &'static str) -> Result<T, ProjectConfigError> {
    InvalidValueSnafu { key, expected }.fail()
}

impl TryFrom<&str> for ProjectConfig {
    type Error = ProjectConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let mut config = Self::default();

        let Some(document) = documents.first() else {
            return Ok(config);
        };
        if document.is_null() {
            return Ok(config);
        }

        let top_level = document
            .as_mapping()
            .ok_or(ProjectConfigError::TopLevelNotMap)?;
        config.apply_yaml(top_level)?;
        Ok(config)
    }
}

#[derive(Debug, Snafu)]
pub enum ProjectConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Config key '{}' should be {}", key, expected))]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
    },
}

use std::io::Write;

use snafu::Snafu;
use snafu::prelude::*;
use supports_color::Stream;
use tracing::{debug, info, warn};

use crate::application::RuntimeConfig;
use crate::application::data::OutputFormat;
use crate::cli::Cli;
use crate::config::{ProjectConfig, ProjectConfigError};
use crate::filesystem::{Filesystem, LocalFilesystem, TreeBuildError, TreeBuilder};
use crate::git::{GitCli, GitStatusSource, NoGit};
use crate::render::{GraphDocument, TextStyle, render_graph_json, render_text, render_tree_json};
use crate::session::{Intent, Outcome, Session};

pub struct Application;

impl Application {
    pub async fn run(cli: Cli) -> Result<(), ApplicationError> {
        let root = match cli.root.clone() {
            Some(root) => Some(root),
            None => std::env::current_dir()
                .inspect_err(|e| warn!("No workspace: cannot resolve the current directory: {}", e))
                .ok(),
        };
        let project = match &root {
            Some(root) => ProjectConfig::read(root).await.context(ConfigSnafu)?,
            None => ProjectConfig::default(),
        };
        debug!("Loaded config: {:?}", project);

        let config = RuntimeConfig::new(cli, root, project);
        let output = match config.root.clone() {
            Some(root) if config.build.include_git_status => {
                Self::present(&config, GitCli::new(root)).await?
            }
            _ => Self::present(&config, NoGit).await?,
        };

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(output.as_bytes()).context(WriteSnafu)?;
        stdout.flush().context(WriteSnafu)?;
        Ok(())
    }

    async fn present<G: GitStatusSource>(
        config: &RuntimeConfig,
        git: G,
    ) -> Result<String, ApplicationError> {
        let builder = TreeBuilder::new(LocalFilesystem, git, config.root.clone())
            .with_exclusion_mode(config.exclude_mode);
        let mut session = Session::new(builder, config.build.clone());
        let tree = session.refresh().await.context(TreeUnavailableSnafu)?;
        info!("Loaded tree rooted at '{}'", tree.name);

        for intent in config.intents() {
            let outcome = session.apply(intent);
            debug!("Outcome: {:?}", outcome);
        }

        if let Some(path) = &config.open {
            match session.apply(Intent::OpenFile(path.clone())) {
                Outcome::Open(absolute) => return Ok(format!("{}\n", absolute.display())),
                _ => warn!("Cannot open '{}': not a file of the workspace tree", path),
            }
        }

        Self::render(config, &session)
    }

    fn render<F: Filesystem, G: GitStatusSource>(
        config: &RuntimeConfig,
        session: &Session<F, G>,
    ) -> Result<String, ApplicationError> {
        match config.format {
            OutputFormat::Text => Ok(match session.visible() {
                Some((root, expansion)) => {
                    let style = TextStyle {
                        show_labels: session.filter().show_labels,
                        color: supports_color::on(Stream::Stdout).is_some(),
                        highlighted: session.search_matches(),
                    };
                    render_text(&root, &expansion, &style)
                }
                None => match session.tree() {
                    Some(tree) if tree.children().is_empty() => format!("{} (empty)\n", tree.name),
                    _ => "Nothing matches the current filter\n".to_string(),
                },
            }),
            OutputFormat::TreeJson => {
                let tree = session.filtered_tree();
                render_tree_json(tree.as_ref())
                    .map(with_newline)
                    .context(SerializeSnafu)
            }
            OutputFormat::GraphJson => {
                let breadcrumb = session.breadcrumb();
                let graph = session.graph_data();
                let document = GraphDocument {
                    layout: &config.layout,
                    breadcrumb: &breadcrumb,
                    search_matches: session.search_matches(),
                    graph: &graph,
                };
                render_graph_json(&document)
                    .map(with_newline)
                    .context(SerializeSnafu)
            }
        }
    }
}

fn with_newline(mut output: String) -> String {
    output.push('\n');
    output
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: ProjectConfigError },
    #[snafu(display("Critical failure encountered while building the tree"))]
    TreeUnavailable { source: TreeBuildError },
    #[snafu(display("Failed to serialize the output"))]
    SerializeError { source: serde_json::Error },
    #[snafu(display("Failed to write the output"))]
    WriteError { source: std::io::Error },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::ExclusionMode;
    use crate::session::BuildSettings;
    use crate::view::FilterSpec;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn workspace() -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src/bin")).expect("Failed to create dirs");
        fs::create_dir_all(root.join("node_modules/pkg")).expect("Failed to create dirs");
        fs::write(root.join("src/lib.rs"), "pub fn a() {}").expect("Failed to write file");
        fs::write(root.join("src/bin/tool.rs"), "fn main() {}").expect("Failed to write file");
        fs::write(root.join("README.md"), "# readme").expect("Failed to write file");
        temp_dir
    }

    fn config(root: &Path, format: OutputFormat) -> RuntimeConfig {
        RuntimeConfig {
            root: Some(root.to_path_buf()),
            build: BuildSettings {
                max_depth: 10,
                exclude_patterns: vec!["node_modules".to_string()],
                include_git_status: false,
            },
            exclude_mode: ExclusionMode::Substring,
            layout: "breadthfirst".to_string(),
            filter: FilterSpec {
                show_labels: false,
                ..FilterSpec::default()
            },
            expand_all: false,
            collapse_all: false,
            toggles: Vec::new(),
            search: None,
            focus: None,
            open: None,
            format,
        }
    }

    fn root_name(root: &Path) -> String {
        use crate::ext::BestEffortPathExt;
        root.display_name()
    }

    #[compio::test]
    async fn text_output_shows_the_expanded_root() {
        let workspace = workspace();
        let output = Application::present(&config(workspace.path(), OutputFormat::Text), NoGit)
            .await
            .expect("present");
        let expected = format!(
            "{}/\n├── src/ (+2)\n└── README.md\n",
            root_name(workspace.path())
        );
        assert_eq!(output, expected);
    }

    #[compio::test]
    async fn toggles_and_focus_shape_the_text_output() {
        let workspace = workspace();
        let mut config = config(workspace.path(), OutputFormat::Text);
        config.toggles = vec!["src".to_string()];
        config.focus = Some("src".to_string());

        let output = Application::present(&config, NoGit).await.expect("present");
        assert_eq!(output, "src/\n├── bin/ (+1)\n└── lib.rs\n");
    }

    #[compio::test]
    async fn collapse_all_after_expand_all_leaves_the_root_open() {
        let workspace = workspace();
        let mut config = config(workspace.path(), OutputFormat::Text);
        config.expand_all = true;
        config.collapse_all = true;

        let output = Application::present(&config, NoGit).await.expect("present");
        let expected = format!(
            "{}/\n├── src/ (+2)\n└── README.md\n",
            root_name(workspace.path())
        );
        assert_eq!(output, expected);
    }

    #[compio::test]
    async fn tree_json_is_the_filtered_tree() {
        let workspace = workspace();
        let mut config = config(workspace.path(), OutputFormat::TreeJson);
        config.filter.allowed_types = crate::view::AllowedTypes::only(["md", "folder"]);

        let output = Application::present(&config, NoGit).await.expect("present");
        let tree: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(tree["children"].as_array().map(Vec::len), Some(1));
        assert_eq!(tree["children"][0]["name"], "README.md");
    }

    #[compio::test]
    async fn graph_json_reveals_search_matches() {
        let workspace = workspace();
        let mut config = config(workspace.path(), OutputFormat::GraphJson);
        config.search = Some("tool".to_string());

        let output = Application::present(&config, NoGit).await.expect("present");
        let graph: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(graph["searchMatches"], serde_json::json!(["src/bin/tool.rs"]));
        let paths: Vec<&str> = graph["nodes"]
            .as_array()
            .expect("nodes")
            .iter()
            .filter_map(|node| node["path"].as_str())
            .collect();
        assert!(paths.contains(&"src/bin/tool.rs"));
    }

    #[compio::test]
    async fn open_prints_the_absolute_path() {
        let workspace = workspace();
        let mut config = config(workspace.path(), OutputFormat::Text);
        config.open = Some("src/lib.rs".to_string());

        let output = Application::present(&config, NoGit).await.expect("present");
        assert_eq!(
            output,
            format!("{}\n", workspace.path().join("src/lib.rs").display())
        );
    }

    #[compio::test]
    async fn missing_workspace_renders_the_placeholder() {
        let mut config = config(Path::new("/unused"), OutputFormat::Text);
        config.root = None;

        let output = Application::present(&config, NoGit).await.expect("present");
        assert_eq!(output, "No workspace (empty)\n");
    }

    #[compio::test]
    async fn filtering_everything_out_says_so() {
        let workspace = workspace();
        let mut config = config(workspace.path(), OutputFormat::Text);
        config.filter.allowed_types = crate::view::AllowedTypes::only(["folder"]);

        let output = Application::present(&config, NoGit).await.expect("present");
        assert_eq!(output, "Nothing matches the current filter\n");

        config.format = OutputFormat::TreeJson;
        let output = Application::present(&config, NoGit).await.expect("present");
        assert_eq!(output, "null\n");
    }

    #[compio::test]
    async fn unreadable_root_is_an_error() {
        let config = config(Path::new("/this/path/does/not/exist"), OutputFormat::Text);
        let result = Application::present(&config, NoGit).await;
        assert!(matches!(result, Err(ApplicationError::TreeUnavailable { .. })));
    }
}

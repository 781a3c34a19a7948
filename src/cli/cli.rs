use std::path::PathBuf;

use clap::Parser;

use crate::application::data::{LogLevel, OutputFormat};
use crate::filesystem::ExclusionMode;
use crate::view::SizeBucket;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Show a workspace as an expandable file tree")]
pub struct Cli {
    /// The workspace root, defaults to the current directory
    pub root: Option<PathBuf>,
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Deepest level the tree builder descends to, overrides strukt.yaml
    #[clap(long)]
    pub max_depth: Option<usize>,
    /// Extra exclusion pattern, added to the configured ones
    #[clap(long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,
    #[clap(long, value_enum)]
    pub exclude_mode: Option<ExclusionMode>,
    /// Skip querying git for file states
    #[clap(long)]
    pub no_git: bool,

    /// Comma separated extensions to keep, `folder` keeps folders
    #[clap(long, value_delimiter = ',', value_name = "TYPES")]
    pub types: Vec<String>,
    /// Deepest level shown after filtering
    #[clap(long, default_value_t = 10)]
    pub filter_depth: usize,
    #[clap(long, default_value = "all", value_enum)]
    pub size: SizeBucket,
    /// Hide size labels in text output
    #[clap(long)]
    pub no_labels: bool,

    #[clap(long)]
    pub expand_all: bool,
    /// Close every folder but the root, applied after --expand-all
    #[clap(long)]
    pub collapse_all: bool,
    /// Toggle a folder, applied in the order given
    #[clap(long = "toggle", value_name = "PATH")]
    pub toggle: Vec<String>,
    /// Reveal every node whose name contains this text
    #[clap(long)]
    pub search: Option<String>,
    /// Show only the subtree of this folder
    #[clap(long, value_name = "PATH")]
    pub focus: Option<String>,
    /// Print the absolute path of this file instead of the tree
    #[clap(long, value_name = "PATH")]
    pub open: Option<String>,

    #[clap(long, short, default_value = "text", value_enum)]
    pub format: OutputFormat,
}

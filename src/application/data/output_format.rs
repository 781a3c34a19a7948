use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Indented tree for terminals
    #[default]
    Text,
    /// The filtered tree as nested JSON
    TreeJson,
    /// Visible nodes and links as flat JSON
    GraphJson,
}

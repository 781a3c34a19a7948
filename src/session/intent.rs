use std::path::PathBuf;

use crate::view::FilterSpec;

/// A user action coming from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    OpenFile(String),
    ToggleFolder(String),
    SetFilter(FilterSpec),
    Search(String),
    Focus(Option<String>),
    ExpandAll,
    CollapseAll,
}

/// What the presentation layer should do after an intent was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Open this file in an editor.
    Open(PathBuf),
    /// Visible state changed; render again.
    Redraw,
    /// Nothing changed.
    Ignored,
}

use colored::{Color, Colorize};

use crate::filesystem::FileNode;
use crate::git::GitStatus;
use crate::view::ExpansionState;

/// Presentation switches for [`render_text`].
#[derive(Debug, Clone, Default)]
pub struct TextStyle<'a> {
    pub show_labels: bool,
    pub color: bool,
    /// Paths to highlight, usually the last search matches.
    pub highlighted: &'a [String],
}

/// Draws `root` as a box-drawing tree, descending only into expanded
/// folders. Collapsed folders with content show how many children they
/// hide.
pub fn render_text(root: &FileNode, expansion: &ExpansionState, style: &TextStyle) -> String {
    let mut output = String::new();
    output.push_str(&line(root, expansion, style));
    output.push('\n');
    if expansion.is_expanded(&root.path) {
        render_children(root, expansion, style, "", &mut output);
    }
    output
}

fn render_children(
    folder: &FileNode,
    expansion: &ExpansionState,
    style: &TextStyle,
    prefix: &str,
    output: &mut String,
) {
    let children = folder.children();
    for (i, child) in children.iter().enumerate() {
        let is_last = i + 1 == children.len();
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(connector);
        output.push_str(&line(child, expansion, style));
        output.push('\n');

        if child.is_folder() && expansion.is_expanded(&child.path) {
            let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
            render_children(child, expansion, style, &child_prefix, output);
        }
    }
}

fn line(node: &FileNode, expansion: &ExpansionState, style: &TextStyle) -> String {
    let mut text = if node.is_folder() {
        format!("{}/", node.name)
    } else {
        node.name.clone()
    };

    if style.highlighted.contains(&node.path) {
        text = if style.color {
            text.as_str().bold().underline().to_string()
        } else {
            format!("{} *", text)
        };
    }

    if let Some(status) = node.git_status() {
        let marker = marker(status);
        let marker = if style.color {
            marker.color(marker_color(status)).to_string()
        } else {
            marker.to_string()
        };
        text = format!("{} [{}]", text, marker);
    }

    if node.is_folder() && !expansion.is_expanded(&node.path) && !node.children().is_empty() {
        text = format!("{} (+{})", text, node.children().len());
    }

    if style.show_labels {
        let size = format_size(node.total_size());
        let size = if style.color {
            size.as_str().dimmed().to_string()
        } else {
            size
        };
        text = format!("{}  {}", text, size);
    }
    text
}

fn marker(status: GitStatus) -> &'static str {
    match status {
        GitStatus::Modified => "M",
        GitStatus::Untracked => "U",
        GitStatus::Staged => "S",
        GitStatus::Deleted => "D",
    }
}

fn marker_color(status: GitStatus) -> Color {
    match status {
        GitStatus::Modified => Color::Yellow,
        GitStatus::Untracked => Color::Green,
        GitStatus::Staged => Color::Cyan,
        GitStatus::Deleted => Color::Red,
    }
}

/// Binary units with one decimal above a KiB.
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;

    if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}

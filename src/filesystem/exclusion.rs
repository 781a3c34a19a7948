use clap::ValueEnum;
use derive_more::Display;
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::warn;

/// How exclusion patterns are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, ValueEnum)]
pub enum ExclusionMode {
    /// Every `*` and `/` is stripped and the remainder is matched as a
    /// substring anywhere in the path, so `*.log` excludes `a.logger/x`.
    #[default]
    #[display("substring")]
    Substring,
    /// Real globs, matched against the whole relative path or its last
    /// component.
    #[display("glob")]
    Glob,
}

impl ExclusionMode {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "substring" => Some(ExclusionMode::Substring),
            "glob" => Some(ExclusionMode::Glob),
            _ => None,
        }
    }
}

/// Reduces a pattern to the bare substring used in substring mode.
fn bare_pattern(pattern: &str) -> String {
    pattern.chars().filter(|c| *c != '*' && *c != '/').collect()
}

#[derive(Debug, Clone)]
enum Matcher {
    Substring(Vec<String>),
    Glob(GlobSet),
}

/// Exclusion patterns prepared once per build.
#[derive(Debug, Clone)]
pub struct ExclusionMatcher {
    matcher: Matcher,
}

impl ExclusionMatcher {
    pub fn new(patterns: &[String], mode: ExclusionMode) -> Self {
        let matcher = match mode {
            ExclusionMode::Substring => Matcher::Substring(Self::bare_patterns(patterns)),
            ExclusionMode::Glob => Matcher::Glob(Self::glob_set(patterns)),
        };
        Self { matcher }
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        match &self.matcher {
            Matcher::Substring(bare) => bare.iter().any(|b| path.contains(b.as_str())),
            Matcher::Glob(set) => {
                let name = path.rsplit('/').next().unwrap_or(path);
                set.is_match(path) || set.is_match(name)
            }
        }
    }

    fn bare_patterns(patterns: &[String]) -> Vec<String> {
        patterns
            .iter()
            .filter_map(|pattern| {
                let bare = bare_pattern(pattern);
                if bare.is_empty() {
                    warn!("Ignoring exclude pattern '{}': it would match every path", pattern);
                    None
                } else {
                    Some(bare)
                }
            })
            .collect()
    }

    fn glob_set(patterns: &[String]) -> GlobSet {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => warn!("Ignoring invalid exclude glob '{}': {}", pattern, e),
            }
        }
        builder.build().unwrap_or_else(|e| {
            warn!("Failed to compile exclude globs: {}", e);
            GlobSet::empty()
        })
    }
}

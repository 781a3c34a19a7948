//! Repository state lookups for files of the workspace tree.

mod source;
mod status;

pub use source::{GitCli, GitStatusSource, NoGit};
pub use status::{GitStatus, GitStatusReport};

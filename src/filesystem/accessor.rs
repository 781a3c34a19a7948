use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryStat {
    pub kind: EntryKind,
    pub size: u64,
}

/// Read-only view of a filesystem, as needed by the tree builder.
pub trait Filesystem {
    async fn stat(&self, path: &Path) -> io::Result<EntryStat>;
    /// Names of the entries of a directory, in no particular order.
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<String>>;
}

/// The machine's own filesystem, driven by the compio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl Filesystem for LocalFilesystem {
    async fn stat(&self, path: &Path) -> io::Result<EntryStat> {
        let metadata = compio::fs::metadata(path).await?;
        let kind = if metadata.is_file() {
            EntryKind::File
        } else if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::Other
        };
        Ok(EntryStat {
            kind,
            size: metadata.len(),
        })
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        // compio has no completion-based directory listing, so it runs on
        // the blocking pool and siblings keep walking meanwhile
        let path = path.to_path_buf();
        compio::runtime::spawn_blocking(move || list_dir(&path))
            .await
            .map_err(|_| io::Error::other("directory listing panicked"))?
    }
}

fn list_dir(path: &Path) -> io::Result<Vec<String>> {
    std::fs::read_dir(path)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect()
}

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::effects::{Effects, FileSystemProbe, PathLookup};

/// Filesystem predicates and search-path lookup, routed through the
/// injected collaborators.
#[derive(Clone, Copy)]
pub struct PathTools<'a> {
    fs: &'a dyn FileSystemProbe,
    lookup: &'a dyn PathLookup,
}

impl<'a> PathTools<'a> {
    #[must_use]
    pub fn new(effects: &'a dyn Effects) -> Self {
        Self {
            fs: effects.fs(),
            lookup: effects.lookup(),
        }
    }

    #[must_use]
    pub fn file_exists(&self, path: &Path) -> bool {
        self.fs.is_file(path)
    }

    /// True only for directories; an existing regular file does not count.
    #[must_use]
    pub fn directory_exists(&self, path: &Path) -> bool {
        self.fs.is_dir(path)
    }

    #[must_use]
    pub fn which(&self, command: &str) -> Option<PathBuf> {
        let found = self.lookup.which(command);
        trace!(command, found = ?found, "search path lookup");
        found
    }
}

/// Parent directory of `path`, or `path` itself when there is none (the
/// filesystem root, a bare prefix, or an empty path).
#[must_use]
pub fn parent_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => path.to_path_buf(),
    }
}

/// Joins segments with the platform separator. `.` and `..` are kept as-is.
#[must_use]
pub fn join_path<I, S>(segments: I) -> PathBuf
where
    I: IntoIterator<Item = S>,
    S: AsRef<Path>,
{
    let mut joined = PathBuf::new();
    for segment in segments {
        joined.push(segment);
    }
    joined
}

//! Source provider abstraction for filesystem-independent loading.
//!
//! The [`SourceProvider`] trait abstracts file I/O so the resolver and the
//! attachment check can run against an in-memory tree in tests.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Trait that abstracts file I/O for the loader.
pub trait SourceProvider {
    /// Read the raw bytes of a file.
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, std::io::Error>;

    /// Whether a regular file exists at `path`.
    fn is_file(&self, path: &Path) -> bool;
}

/// Default filesystem-backed source provider.
pub struct FileSystemProvider;

impl SourceProvider for FileSystemProvider {
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, std::io::Error> {
        std::fs::read(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// In-memory source provider for testing.
///
/// Maps normalized paths to file contents.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProvider {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl InMemoryProvider {
    /// Create a new in-memory provider from a map of paths to file bytes.
    pub fn new(files: HashMap<PathBuf, Vec<u8>>) -> Self {
        let files = files
            .into_iter()
            .map(|(k, v)| (normalize_path(&k), v))
            .collect();
        Self { files }
    }

    /// Builder-style insert of a text file.
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        self.files
            .insert(normalize_path(path.as_ref()), contents.into());
        self
    }
}

impl SourceProvider for InMemoryProvider {
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, std::io::Error> {
        let normalized = normalize_path(path);
        self.files.get(&normalized).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found in memory: {}", normalized.display()),
            )
        })
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(&normalize_path(path))
    }
}

/// Normalize a path by resolving `.` and `..` components without
/// touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                // `..` above the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            other => components.push(other),
        }
    }
    if components.is_empty() {
        return PathBuf::from(".");
    }
    components.iter().collect()
}

/// Resolve `value` against the directory of `owner`. Absolute values are
/// used verbatim (after normalization).
///
/// Model files are usually written on Windows, so `\` is read as a
/// separator on platforms where it is not one.
pub fn resolve_relative(owner: &Path, value: &str) -> PathBuf {
    let value = if std::path::MAIN_SEPARATOR == '/' {
        value.replace('\\', "/")
    } else {
        value.to_owned()
    };
    let candidate = Path::new(&value);
    if candidate.is_absolute() {
        normalize_path(candidate)
    } else {
        let base = owner.parent().unwrap_or(Path::new("."));
        normalize_path(&base.join(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_path_resolves_dot_and_dotdot() {
        let p = Path::new("/a/b/../c/./d");
        assert_eq!(normalize_path(p), PathBuf::from("/a/c/d"));
    }

    #[test]
    fn normalize_path_keeps_leading_parent_of_relative_path() {
        assert_eq!(
            normalize_path(Path::new("../model/x.tgc")),
            PathBuf::from("../model/x.tgc")
        );
    }

    #[test]
    fn normalize_path_does_not_climb_above_root() {
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn resolve_relative_against_owner_directory() {
        let owner = Path::new("/models/runs/root.tcf");
        assert_eq!(
            resolve_relative(owner, "../model/geom.tgc"),
            PathBuf::from("/models/model/geom.tgc")
        );
        assert_eq!(
            resolve_relative(owner, "/abs/geom.tgc"),
            PathBuf::from("/abs/geom.tgc")
        );
    }

    #[cfg(unix)]
    #[test]
    fn resolve_relative_accepts_backslash_separators() {
        let owner = Path::new("/models/runs/root.tcf");
        assert_eq!(
            resolve_relative(owner, "..\\model\\geom.tgc"),
            PathBuf::from("/models/model/geom.tgc")
        );
    }

    #[test]
    fn in_memory_read_bytes_found() {
        let provider = InMemoryProvider::default().with_file("/m/a.tcf", "x == 1");
        let content = provider.read_bytes(Path::new("/m/./a.tcf")).unwrap();
        assert_eq!(content, b"x == 1");
    }

    #[test]
    fn in_memory_read_bytes_not_found() {
        let provider = InMemoryProvider::new(HashMap::new());
        let err = provider.read_bytes(Path::new("/missing.tcf")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
        assert!(!provider.is_file(Path::new("/missing.tcf")));
    }
}

//! Pass 1: discover the control-file tree from the root.
//!
//! Depth-first, pre-order traversal driven by an explicit stack of open
//! files. Each open file is read line by line; a line that references
//! another control file suspends its owner until the referenced file has
//! been fully expanded. The per-rank line streams of the store therefore
//! hold every included file's lines at the point of inclusion.
//!
//! A reference that cannot be followed is recorded and its subtree skipped.
//! Only an unreadable root is fatal.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::ast::Category;
use crate::decode::decode_lines;
use crate::error::{LoadError, LoadErrorKind, LoadErrorRecord};
use crate::raw_file::{FileId, ParentRef, RawFile, RawFileStore};
use crate::scan::{scan_line, PendingReference};
use crate::source::{normalize_path, SourceProvider};

/// Output of pass 1.
#[derive(Debug)]
pub struct Discovery {
    pub store: RawFileStore,
    pub load_errors: Vec<LoadErrorRecord>,
}

struct Frame {
    file: FileId,
    next: usize,
}

/// Load the root control file and every file it transitively references.
pub fn discover(root: &Path, provider: &dyn SourceProvider) -> Result<Discovery, LoadError> {
    let root = absolute_root(root);
    let category = Category::from_path(&root).ok_or_else(|| LoadError::UnsupportedRoot {
        path: root.clone(),
    })?;

    let bytes = provider
        .read_bytes(&root)
        .map_err(|source| LoadError::RootUnavailable {
            path: root.clone(),
            source,
        })?;
    let lines =
        decode_lines(&bytes).map_err(|_| LoadError::RootEncoding { path: root.clone() })?;

    let mut store = RawFileStore::new();
    let mut load_errors = Vec::new();
    // Paths currently open on the stack, for cycle detection.
    let mut open: HashSet<PathBuf> = HashSet::new();

    debug!(path = %root.display(), %category, "loading root control file");
    let root_id = store.insert(RawFile {
        path: root.clone(),
        category,
        parent: None,
        lines,
        valid: true,
    });
    open.insert(root);
    let mut stack = vec![Frame {
        file: root_id,
        next: 0,
    }];

    while let Some(top) = stack.last_mut() {
        let file_id = top.file;
        let index = top.next;
        if index >= store.get(file_id).lines.len() {
            stack.pop();
            open.remove(&store.get(file_id).path);
            continue;
        }
        top.next += 1;
        store.push_line(file_id, index);

        let owner = store.get(file_id);
        let Some(reference) = scan_line(&owner.lines[index], &owner.path, owner.category) else {
            continue;
        };
        let parent = ParentRef {
            file: file_id,
            path: owner.path.clone(),
            category: owner.category,
            command_line: reference.command_line.clone(),
            line: reference.line,
        };

        if open.contains(&reference.path) {
            warn!(path = %reference.path.display(), parent = %parent.path.display(), "cyclic control file reference");
            load_errors.push(record(
                &reference,
                &parent,
                LoadErrorKind::CyclicReference,
                "file is already open further up the reference chain".to_owned(),
            ));
            continue;
        }

        match follow(&reference, provider) {
            Ok(lines) => {
                debug!(path = %reference.path.display(), category = %reference.category, "loading control file");
                let id = store.insert(RawFile {
                    path: reference.path.clone(),
                    category: reference.category,
                    parent: Some(parent),
                    lines,
                    valid: true,
                });
                open.insert(reference.path);
                stack.push(Frame { file: id, next: 0 });
            }
            Err((kind, message)) => {
                warn!(path = %reference.path.display(), ?kind, "skipping unreadable control file");
                load_errors.push(record(&reference, &parent, kind, message));
                store.insert(RawFile {
                    path: reference.path,
                    category: reference.category,
                    parent: Some(parent),
                    lines: Vec::new(),
                    valid: false,
                });
            }
        }
    }

    Ok(Discovery { store, load_errors })
}

fn follow(
    reference: &PendingReference,
    provider: &dyn SourceProvider,
) -> Result<Vec<crate::decode::DecodedLine>, (LoadErrorKind, String)> {
    let bytes = provider.read_bytes(&reference.path).map_err(|e| {
        let kind = if e.kind() == std::io::ErrorKind::NotFound {
            LoadErrorKind::Missing
        } else {
            LoadErrorKind::Unreadable
        };
        (kind, e.to_string())
    })?;
    decode_lines(&bytes).map_err(|e| (LoadErrorKind::Encoding, e.to_string()))
}

fn record(
    reference: &PendingReference,
    parent: &ParentRef,
    kind: LoadErrorKind,
    message: String,
) -> LoadErrorRecord {
    LoadErrorRecord {
        path: reference.path.clone(),
        kind,
        command_line: reference.command_line.clone(),
        parent: parent.path.clone(),
        line: reference.line,
        message,
    }
}

fn absolute_root(root: &Path) -> PathBuf {
    if root.is_absolute() {
        return normalize_path(root);
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize_path(&cwd.join(root)),
        Err(_) => normalize_path(root),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemoryProvider;

    fn texts(d: &Discovery, rank: usize) -> Vec<String> {
        d.store.stream(rank).map(|(_, _, l)| l.text.clone()).collect()
    }

    #[test]
    fn missing_root_is_fatal() {
        let provider = InMemoryProvider::default();
        let err = discover(Path::new("/m/root.tcf"), &provider).unwrap_err();
        assert!(matches!(err, LoadError::RootUnavailable { .. }));
    }

    #[test]
    fn unknown_root_extension_is_rejected() {
        let provider = InMemoryProvider::default().with_file("/m/root.txt", "a == 1");
        let err = discover(Path::new("/m/root.txt"), &provider).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedRoot { .. }));
    }

    #[test]
    fn root_encoding_failure_is_fatal() {
        let provider = InMemoryProvider::default().with_file("/m/root.tcf", vec![0xffu8, 0xfe]);
        let err = discover(Path::new("/m/root.tcf"), &provider).unwrap_err();
        assert!(matches!(err, LoadError::RootEncoding { .. }));
    }

    #[test]
    fn included_lines_are_spliced_at_point_of_inclusion() {
        let provider = InMemoryProvider::default()
            .with_file(
                "/m/root.tcf",
                "A == 1\nRead File == common.trd\nB == 2\n",
            )
            .with_file("/m/common.trd", "C == 3\n");
        let d = discover(Path::new("/m/root.tcf"), &provider).unwrap();
        assert_eq!(
            texts(&d, 0),
            vec!["A == 1", "Read File == common.trd", "C == 3", "B == 2"]
        );
        assert_eq!(d.store.get(FileId(1)).category, Category::Control);
    }

    #[test]
    fn depth_first_order_follows_reference_order() {
        let provider = InMemoryProvider::default()
            .with_file(
                "/m/root.tcf",
                "Geometry Control File == a.tgc\nGeometry Control File == b.tgc\n",
            )
            .with_file("/m/a.tgc", "Read File == a1.trd\nA == 1\n")
            .with_file("/m/a1.trd", "A1 == 1\n")
            .with_file("/m/b.tgc", "B == 1\n");
        let d = discover(Path::new("/m/root.tcf"), &provider).unwrap();
        let paths: Vec<_> = d.store.files().iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/m/root.tcf"),
                PathBuf::from("/m/a.tgc"),
                PathBuf::from("/m/a1.trd"),
                PathBuf::from("/m/b.tgc"),
            ]
        );
        assert_eq!(
            texts(&d, 1),
            vec!["Read File == a1.trd", "A1 == 1", "A == 1", "B == 1"]
        );
    }

    #[test]
    fn missing_include_is_recorded_and_siblings_still_load() {
        let provider = InMemoryProvider::default()
            .with_file(
                "/m/root.tcf",
                "Geometry Control File == gone.tgc\nBC Control File == bc.tbc\n",
            )
            .with_file("/m/bc.tbc", "X == 1\n");
        let d = discover(Path::new("/m/root.tcf"), &provider).unwrap();
        assert_eq!(d.load_errors.len(), 1);
        assert_eq!(d.load_errors[0].path, PathBuf::from("/m/gone.tgc"));
        assert_eq!(d.load_errors[0].kind, LoadErrorKind::Missing);
        assert_eq!(d.load_errors[0].parent, PathBuf::from("/m/root.tcf"));
        assert_eq!(texts(&d, 2), vec!["X == 1"]);
        assert!(!d.store.get(FileId(1)).valid);
    }

    #[test]
    fn undecodable_include_is_recorded_not_fatal() {
        let provider = InMemoryProvider::default()
            .with_file("/m/root.tcf", "BC Control File == bc.tbc\nT == 1\n")
            .with_file("/m/bc.tbc", vec![b'x', 0xff]);
        let d = discover(Path::new("/m/root.tcf"), &provider).unwrap();
        assert_eq!(d.load_errors.len(), 1);
        assert_eq!(d.load_errors[0].kind, LoadErrorKind::Encoding);
        assert_eq!(texts(&d, 0), vec!["BC Control File == bc.tbc", "T == 1"]);
    }

    #[test]
    fn cyclic_reference_is_recorded_and_broken() {
        let provider = InMemoryProvider::default()
            .with_file("/m/root.tcf", "ESTRY Control File Auto\n")
            .with_file("/m/root.ecf", "Read File == back.trd\n")
            .with_file("/m/back.trd", "Read File == back.trd\n");
        let d = discover(Path::new("/m/root.tcf"), &provider).unwrap();
        assert_eq!(d.load_errors.len(), 1);
        assert_eq!(d.load_errors[0].kind, LoadErrorKind::CyclicReference);
        assert_eq!(d.store.len(), 3);
    }

    #[test]
    fn same_file_may_be_included_twice() {
        let provider = InMemoryProvider::default()
            .with_file("/m/root.tcf", "Read File == x.trd\nRead File == x.trd\n")
            .with_file("/m/x.trd", "X == 1\n");
        let d = discover(Path::new("/m/root.tcf"), &provider).unwrap();
        assert!(d.load_errors.is_empty());
        assert_eq!(d.store.len(), 3);
    }
}

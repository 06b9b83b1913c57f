//! Raw file store: loaded control files and their decoded lines.
//!
//! Files are kept in discovery order. Alongside them the store keeps one
//! line stream per assembly rank: the order in which lines must be turned
//! into parts, with each included file's lines spliced in at the point of
//! its inclusion.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ast::Category;
use crate::decode::DecodedLine;

/// Index of a file in the store.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FileId(pub usize);

/// The reference that caused a non-root file to be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    pub file: FileId,
    pub path: PathBuf,
    pub category: Category,
    /// The referencing line as written, comments stripped.
    pub command_line: String,
    pub line: u32,
}

/// One physically loaded control file.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub path: PathBuf,
    pub category: Category,
    /// `None` only for the root.
    pub parent: Option<ParentRef>,
    pub lines: Vec<DecodedLine>,
    /// The file existed, was readable and decoded.
    pub valid: bool,
}

/// Line-free description of a loaded file, kept in the final model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub path: PathBuf,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,
    pub valid: bool,
    pub line_count: usize,
}

/// Position of one decoded line in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRef {
    pub file: FileId,
    pub index: usize,
}

#[derive(Debug, Default)]
pub struct RawFileStore {
    files: Vec<RawFile>,
    streams: [Vec<LineRef>; Category::RANKS],
}

impl RawFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file: RawFile) -> FileId {
        let id = FileId(self.files.len());
        self.files.push(file);
        id
    }

    /// Append a line of `file` to the stream of the file's rank.
    pub fn push_line(&mut self, file: FileId, index: usize) {
        let rank = self.files[file.0].category.rank();
        self.streams[rank].push(LineRef { file, index });
    }

    pub fn get(&self, id: FileId) -> &RawFile {
        &self.files[id.0]
    }

    pub fn files(&self) -> &[RawFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files of one category, in discovery order.
    pub fn bucket(&self, category: Category) -> impl Iterator<Item = (FileId, &RawFile)> {
        self.files
            .iter()
            .enumerate()
            .filter(move |(_, f)| f.category == category)
            .map(|(i, f)| (FileId(i), f))
    }

    /// Ordered lines for an assembly rank.
    pub fn stream(&self, rank: usize) -> impl Iterator<Item = (FileId, &RawFile, &DecodedLine)> {
        self.streams[rank].iter().map(move |r| {
            let file = &self.files[r.file.0];
            (r.file, file, &file.lines[r.index])
        })
    }

    /// Drop the line buffers, keeping only file metadata.
    pub fn into_file_infos(self) -> Vec<FileInfo> {
        self.files
            .into_iter()
            .map(|f| FileInfo {
                line_count: f.lines.len(),
                path: f.path,
                category: f.category,
                parent: f.parent,
                valid: f.valid,
            })
            .collect()
    }
}

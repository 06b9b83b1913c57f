//! Shared types for the loader.
//!
//! These are produced by the early passes and consumed throughout the
//! pipeline. They live here so that pass modules can import them without
//! depending on each other.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ──────────────────────────────────────────────
// Provenance
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub file: PathBuf,
    /// 1-based physical line number.
    pub line: u32,
}

impl Provenance {
    pub fn new(file: impl Into<PathBuf>, line: u32) -> Self {
        Provenance {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

// ──────────────────────────────────────────────
// Control-file categories
// ──────────────────────────────────────────────

/// The kind of a control file. Decided by the root's extension or by the
/// command that referenced the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Root model control file (`.tcf`).
    Control,
    /// 1D (estry) control file (`.ecf`).
    Estry,
    /// Geometry control file (`.tgc`).
    Geometry,
    /// Boundary condition control file (`.tbc`).
    Boundary,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Control,
        Category::Estry,
        Category::Geometry,
        Category::Boundary,
    ];

    /// Number of assembly buckets. Control and Estry share the first one.
    pub const RANKS: usize = 3;

    pub fn from_extension(ext: &str) -> Option<Category> {
        match ext.to_ascii_lowercase().as_str() {
            "tcf" => Some(Category::Control),
            "ecf" => Some(Category::Estry),
            "tgc" => Some(Category::Geometry),
            "tbc" => Some(Category::Boundary),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Category> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Category::from_extension)
    }

    pub fn extension(self) -> &'static str {
        match self {
            Category::Control => "tcf",
            Category::Estry => "ecf",
            Category::Geometry => "tgc",
            Category::Boundary => "tbc",
        }
    }

    /// Position in the fixed cross-category assembly order.
    pub fn rank(self) -> usize {
        match self {
            Category::Control | Category::Estry => 0,
            Category::Geometry => 1,
            Category::Boundary => 2,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// ──────────────────────────────────────────────
// Components
// ──────────────────────────────────────────────

/// Semantic grouping of parts after assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    #[serde(rename = "control_1d")]
    Control1D,
    #[serde(rename = "control_2d")]
    Control2D,
    Geometry,
    Boundary,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::Control1D,
        ComponentKind::Control2D,
        ComponentKind::Geometry,
        ComponentKind::Boundary,
    ];

    pub fn for_category(category: Category) -> ComponentKind {
        match category {
            Category::Control => ComponentKind::Control2D,
            Category::Estry => ComponentKind::Control1D,
            Category::Geometry => ComponentKind::Geometry,
            Category::Boundary => ComponentKind::Boundary,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Control1D => "control-1d",
            ComponentKind::Control2D => "control-2d",
            ComponentKind::Geometry => "geometry",
            ComponentKind::Boundary => "boundary",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Namespace of a conditional block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicType {
    Scenario,
    Event,
}

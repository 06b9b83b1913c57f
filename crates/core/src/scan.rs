//! Reference scanner: finds lines that direct the loader to another control
//! file.

use std::path::{Path, PathBuf};

use crate::ast::Category;
use crate::command::{normalize_command, split_assignment};
use crate::decode::DecodedLine;
use crate::source::{normalize_path, resolve_relative};

/// Directive implying an estry control file next to the referencing file.
pub const ESTRY_AUTO: &str = "estry control file auto";

/// A reference found in a file that has not been followed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReference {
    pub path: PathBuf,
    pub category: Category,
    /// Normalized command that produced the reference.
    pub command: String,
    pub command_line: String,
    pub line: u32,
}

/// Category of the file a reference command points to, or `None` when the
/// command does not reference a control file. `read file` includes keep
/// the category of the file that reads them.
pub fn reference_category(command: &str, owner: Category) -> Option<Category> {
    match command {
        "geometry control file" => Some(Category::Geometry),
        "bc control file" => Some(Category::Boundary),
        "estry control file" | ESTRY_AUTO => Some(Category::Estry),
        "read file" => Some(owner),
        _ => None,
    }
}

/// Path of the estry file implied by an auto directive in `owner`.
pub fn auto_estry_path(owner: &Path) -> PathBuf {
    normalize_path(&owner.with_extension(Category::Estry.extension()))
}

/// Inspect one decoded line of `owner_path`.
pub fn scan_line(
    line: &DecodedLine,
    owner_path: &Path,
    owner_category: Category,
) -> Option<PendingReference> {
    if let Some((command, value)) = split_assignment(&line.text) {
        let category = reference_category(&command, owner_category)?;
        if value.is_empty() {
            return None;
        }
        let path = if command == "estry control file" && value.eq_ignore_ascii_case("auto") {
            auto_estry_path(owner_path)
        } else {
            resolve_relative(owner_path, &value)
        };
        return Some(PendingReference {
            path,
            category,
            command,
            command_line: line.text.clone(),
            line: line.number,
        });
    }

    if normalize_command(&line.text).starts_with(ESTRY_AUTO) {
        return Some(PendingReference {
            path: auto_estry_path(owner_path),
            category: Category::Estry,
            command: ESTRY_AUTO.to_owned(),
            command_line: line.text.clone(),
            line: line.number,
        });
    }
    None
}

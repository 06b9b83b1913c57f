//! The loaded model handed to collaborators.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::ast::ComponentKind;
use crate::component::{Component, Components};
use crate::error::Diagnostics;
use crate::parts::Part;
use crate::pass5_settings::ControlSettings;
use crate::raw_file::FileInfo;
use crate::scenario::ScenarioEventContext;

/// Result of a completed load. Read-only by convention: every pass has
/// already run when a caller sees it.
#[derive(Debug, Clone, Serialize)]
pub struct Model {
    pub root: PathBuf,
    /// Every file reached, in discovery order, including ones that failed.
    pub files: Vec<FileInfo>,
    pub components: Components,
    /// The scenario/event bindings in effect, defaults applied.
    pub context: ScenarioEventContext,
    /// Effective variables, keyed by lowercased name.
    pub variables: BTreeMap<String, String>,
    pub settings: ControlSettings,
    pub diagnostics: Diagnostics,
}

impl Model {
    /// Traversal completed but something was recorded along the way.
    pub fn is_partial(&self) -> bool {
        !self.diagnostics.is_clean()
    }

    pub fn component(&self, kind: ComponentKind) -> &Component {
        self.components.get(kind)
    }

    /// Active parts of every component, in component order.
    pub fn active_parts(&self) -> impl Iterator<Item = &Part> {
        self.components.iter().flat_map(Component::active_parts)
    }

    /// Every attached file of an active part, deduplicated, in first-seen
    /// order.
    pub fn attached_files(&self) -> Vec<PathBuf> {
        let mut seen = Vec::new();
        for file in self.active_parts().flat_map(|p| p.files.iter()) {
            if !seen.contains(&file.path) {
                seen.push(file.path.clone());
            }
        }
        seen
    }
}

//! Fatal load errors and the recoverable diagnostics accumulated during a load.
//!
//! Only [`LoadError`] aborts a load. Everything else is recorded in
//! [`Diagnostics`] and the load keeps going.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ast::Provenance;

/// A fatal error. When one of these is returned no model is produced.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The root control file could not be opened or read.
    #[error("cannot open root control file '{}': {source}", path.display())]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The root control file is not valid UTF-8.
    #[error("root control file '{}' is not valid UTF-8", path.display())]
    RootEncoding { path: PathBuf },

    /// The root path does not carry a recognized control-file extension.
    #[error("'{}' is not a control file (expected .tcf, .ecf, .tgc or .tbc)", path.display())]
    UnsupportedRoot { path: PathBuf },

    /// The scenario/event specification was rejected before traversal.
    #[error(transparent)]
    Scenario(#[from] ScenarioSpecError),
}

impl LoadError {
    /// Short machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::RootUnavailable { .. } => "root_unavailable",
            LoadError::RootEncoding { .. } => "root_encoding",
            LoadError::UnsupportedRoot { .. } => "unsupported_root",
            LoadError::Scenario(_) => "scenario_spec",
        }
    }

    /// Serialize to a JSON object with `kind`, `path` and `message` fields.
    /// `path` is null for errors that are not tied to a file.
    pub fn to_json_value(&self) -> serde_json::Value {
        let path = match self {
            LoadError::RootUnavailable { path, .. }
            | LoadError::RootEncoding { path }
            | LoadError::UnsupportedRoot { path } => Some(path.display().to_string()),
            LoadError::Scenario(_) => None,
        };
        serde_json::json!({
            "kind":    self.kind(),
            "path":    path,
            "message": self.to_string(),
        })
    }
}

/// A malformed scenario/event specification string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioSpecError {
    #[error("scenario/event key '{key}' has no value")]
    MissingValue { key: String },

    #[error("'{key}' is not a scenario (s, s1..s9) or event (e, e1..e9) key")]
    UnknownKey { key: String },

    #[error("slot '{key}' is out of range (1..=9)")]
    SlotOutOfRange { key: String },

    #[error("slot '{key}' is given more than once")]
    DuplicateSlot { key: String },
}

// ──────────────────────────────────────────────
// Recoverable diagnostics
// ──────────────────────────────────────────────

/// Why a referenced control file was not loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadErrorKind {
    Missing,
    Unreadable,
    Encoding,
    CyclicReference,
}

/// A referenced file that could not be resolved. Its subtree is skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadErrorRecord {
    pub path: PathBuf,
    pub kind: LoadErrorKind,
    /// The line that referenced the file, as written.
    pub command_line: String,
    pub parent: PathBuf,
    pub line: u32,
    pub message: String,
}

/// A placeholder left in a value because nothing was bound to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnresolvedPlaceholder {
    pub placeholder: String,
    pub command: String,
    pub file: PathBuf,
    pub line: u32,
}

/// Everything else worth telling the caller about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A line with neither `==` nor a recognized directive keyword.
    MalformedLine { file: PathBuf, line: u32, text: String },
    /// `Else`, `Else If` or `End If` with no open `If`, or an `If` never closed.
    UnbalancedLogic { file: PathBuf, line: u32, text: String },
    /// A known setting whose value could not be parsed.
    InvalidSetting {
        file: PathBuf,
        line: u32,
        command: String,
        value: String,
    },
    /// An attached file, or one of its sidecar files, does not exist.
    MissingAttachment {
        file: PathBuf,
        line: u32,
        command: String,
        path: PathBuf,
    },
}

impl Warning {
    pub fn malformed_line(prov: &Provenance, text: &str) -> Self {
        Warning::MalformedLine {
            file: prov.file.clone(),
            line: prov.line,
            text: text.to_owned(),
        }
    }

    pub fn unbalanced_logic(prov: &Provenance, text: &str) -> Self {
        Warning::UnbalancedLogic {
            file: prov.file.clone(),
            line: prov.line,
            text: text.to_owned(),
        }
    }
}

/// Ordered, non-fatal findings of a load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub load_errors: Vec<LoadErrorRecord>,
    pub unresolved: Vec<UnresolvedPlaceholder>,
    pub warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn is_clean(&self) -> bool {
        self.load_errors.is_empty() && self.unresolved.is_empty() && self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.load_errors.len() + self.unresolved.len() + self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

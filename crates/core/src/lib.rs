#![allow(clippy::result_large_err)]
//! weir-core: control-file resolution engine for hydraulic model files.
//!
//! Takes a root control file (`.tcf`, `.ecf`, `.tgc` or `.tbc`), discovers
//! every file it transitively references, and assembles the lines into
//! typed, ordered, variable-resolved parts grouped by component.
//!
//! # Public API
//!
//! - [`load()`] / [`load_with_provider()`] -- run the full pipeline
//! - [`Model`] -- the loaded model: files, components, settings, diagnostics
//! - [`LoadOptions`] -- scenario/event string, variables, attachment check
//! - [`LoadError`] -- the fatal errors; everything else is in [`Diagnostics`]
//! - [`SourceProvider`] -- file I/O seam, with filesystem and in-memory
//!   implementations
//!
//! Individual pass entry points are public for selective use.

pub mod ast;
pub mod command;
pub mod component;
pub mod decode;
pub mod error;
pub mod load;
pub mod model;
pub mod options;
pub mod parts;
pub mod pass1_tree;
pub mod pass2_assemble;
pub mod pass3_logic;
pub mod pass4_variables;
pub mod pass5_settings;
pub mod pass6_check;
pub mod raw_file;
pub mod scan;
pub mod scenario;
pub mod source;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{Category, ComponentKind, LogicType, Provenance};
pub use component::{Component, Components};
pub use error::{
    Diagnostics, LoadError, LoadErrorKind, LoadErrorRecord, ScenarioSpecError,
    UnresolvedPlaceholder, Warning,
};
pub use model::Model;
pub use options::LoadOptions;
pub use parts::{FileRef, Part, PartKind};
pub use pass5_settings::ControlSettings;
pub use raw_file::FileInfo;
pub use scenario::ScenarioEventContext;
pub use source::{FileSystemProvider, InMemoryProvider, SourceProvider};

// ── Convenience re-exports: pipeline entry points ────────────────────

pub use load::{load, load_with_provider};
pub use pass1_tree::discover;
pub use pass2_assemble::assemble;
pub use pass3_logic::apply_logic;
pub use pass4_variables::resolve_variables;
pub use pass6_check::check_attachments;

//! Pass 6: optional attachment check.
//!
//! Every attached file of an active part must exist. GIS layers also need
//! their sidecar files. Control files are skipped (pass 1 already recorded
//! those) and so are output locations, which need not exist before a run.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::component::Components;
use crate::error::Warning;
use crate::parts::{Part, PartKind};
use crate::source::SourceProvider;

/// Sidecar extensions required next to a file with the given extension.
fn sidecars(ext: &str) -> &'static [&'static str] {
    match ext.to_ascii_lowercase().as_str() {
        "shp" => &["shx", "dbf"],
        "mif" => &["mid"],
        _ => &[],
    }
}

pub fn check_attachments(components: &Components, provider: &dyn SourceProvider) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let mut checked = 0usize;

    for part in components.iter().flat_map(|c| c.active_parts()) {
        if matches!(part.kind, PartKind::ControlFile | PartKind::OutputPath) {
            continue;
        }
        for file in &part.files {
            checked += 1;
            if !provider.is_file(&file.path) {
                warnings.push(missing(part, file.path.clone()));
                continue;
            }
            for sidecar in sidecar_paths(&file.path) {
                if !provider.is_file(&sidecar) {
                    warnings.push(missing(part, sidecar));
                }
            }
        }
    }

    debug!(checked, missing = warnings.len(), "checked attached files");
    warnings
}

fn sidecar_paths(path: &Path) -> Vec<PathBuf> {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return Vec::new();
    };
    let upper = ext.chars().all(|c| !c.is_ascii_lowercase());
    sidecars(ext)
        .iter()
        .map(|s| {
            if upper {
                path.with_extension(s.to_ascii_uppercase())
            } else {
                path.with_extension(s)
            }
        })
        .collect()
}

fn missing(part: &Part, path: PathBuf) -> Warning {
    Warning::MissingAttachment {
        file: part.source.file.clone(),
        line: part.source.line,
        command: part.command.clone(),
        path,
    }
}

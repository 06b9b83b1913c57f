//! Optional `weir.toml` configuration.
//!
//! The file has the shape of [`LoadOptions`]:
//!
//! ```toml
//! scenarios = "s1 BAS s2 5m e1 Q0100"
//! check_files = true
//!
//! [variables]
//! GIS = "../gis"
//! ```
//!
//! Flags given on the command line win over the file.

use std::path::Path;

use weir_core::LoadOptions;

use crate::LoadArgs;

pub(crate) fn read_config(path: &Path) -> Result<LoadOptions, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}

/// Apply command-line overrides on top of `base`.
pub(crate) fn merge(mut base: LoadOptions, args: &LoadArgs, check_files: bool) -> LoadOptions {
    if let Some(spec) = &args.scenarios {
        base.scenarios = spec.clone();
    }
    for (name, value) in &args.variables {
        base.variables.insert(name.clone(), value.clone());
    }
    base.check_files |= check_files;
    base
}

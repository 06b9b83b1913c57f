use std::path::Path;
use std::process;

use tracing::debug;
use weir_core::LoadOptions;

use super::{describe_diagnostics, load_or_exit, print_json};
use crate::OutputFormat;

/// Exit status when the load completed but recorded diagnostics.
const EXIT_PARTIAL: i32 = 2;

pub(crate) fn cmd_load(root: &Path, options: &LoadOptions, output: OutputFormat, quiet: bool) {
    let model = load_or_exit(root, options, output, quiet);

    match output {
        OutputFormat::Json => print_json(&model),
        OutputFormat::Text => {
            if !quiet {
                println!("root: {}", model.root.display());
                println!("scenarios: {}", model.context);
                let failed = model.files.iter().filter(|f| !f.valid).count();
                println!("files: {} ({} failed)", model.files.len(), failed);
                for component in model.components.iter() {
                    let active = component.active_parts().count();
                    println!(
                        "{:<12} {} parts ({} inactive)",
                        component.kind.name(),
                        active,
                        component.len() - active
                    );
                }
                let lines = describe_diagnostics(&model.diagnostics);
                if !lines.is_empty() {
                    println!("diagnostics: {}", lines.len());
                    for line in lines {
                        println!("  {}", line);
                    }
                }
            }
        }
    }

    if model.is_partial() {
        debug!(diagnostics = model.diagnostics.len(), "load was partial");
        process::exit(EXIT_PARTIAL);
    }
}

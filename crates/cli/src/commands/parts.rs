use std::path::Path;

use weir_core::{ComponentKind, LoadOptions, Part};

use super::{load_or_exit, print_json};
use crate::OutputFormat;

pub(crate) fn cmd_parts(
    root: &Path,
    options: &LoadOptions,
    component: Option<ComponentKind>,
    all: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let model = load_or_exit(root, options, output, quiet);

    let selected: Vec<(ComponentKind, &Part)> = model
        .components
        .iter()
        .filter(|c| component.map_or(true, |k| c.kind == k))
        .flat_map(|c| c.parts.iter().map(move |p| (c.kind, p)))
        .filter(|(_, p)| all || p.active)
        .collect();

    match output {
        OutputFormat::Json => {
            let parts: Vec<&Part> = selected.iter().map(|(_, p)| *p).collect();
            print_json(&parts);
        }
        OutputFormat::Text => {
            for (kind, part) in &selected {
                let marker = if part.active { ' ' } else { '-' };
                let mut line = format!(
                    "{}{:<10} {}:{}  {}",
                    marker,
                    kind.name(),
                    part.source.file.display(),
                    part.source.line,
                    part.command
                );
                if !part.value.is_empty() {
                    line.push_str(&format!(" == {}", part.value));
                }
                println!("{}", line);
            }
        }
    }
}

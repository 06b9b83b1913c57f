use std::path::Path;

use weir_core::{FileInfo, LoadOptions};

use super::{load_or_exit, print_json};
use crate::OutputFormat;

pub(crate) fn cmd_files(root: &Path, options: &LoadOptions, output: OutputFormat, quiet: bool) {
    let model = load_or_exit(root, options, output, quiet);

    match output {
        OutputFormat::Json => print_json(&model.files),
        OutputFormat::Text => {
            for (i, file) in model.files.iter().enumerate() {
                let indent = "  ".repeat(depth(&model.files, i));
                let mut line = format!("{}{} [{}]", indent, file.path.display(), file.category);
                if let Some(parent) = &file.parent {
                    line.push_str(&format!(" (line {})", parent.line));
                }
                if !file.valid {
                    line.push_str(" FAILED");
                }
                println!("{}", line);
            }
        }
    }
}

/// Number of references between `files[index]` and the root.
fn depth(files: &[FileInfo], index: usize) -> usize {
    let mut depth = 0;
    let mut current = &files[index];
    while let Some(parent) = &current.parent {
        depth += 1;
        match files.get(parent.file.0) {
            Some(next) => current = next,
            None => break,
        }
    }
    depth
}

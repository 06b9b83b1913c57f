pub(crate) mod files;
pub(crate) mod load;
pub(crate) mod parts;

use std::path::Path;

use weir_core::{Diagnostics, LoadErrorKind, LoadOptions, Model, Warning};

use crate::{fail_load, OutputFormat};

/// Run the pipeline or exit with status 1.
pub(crate) fn load_or_exit(
    root: &Path,
    options: &LoadOptions,
    output: OutputFormat,
    quiet: bool,
) -> Model {
    match weir_core::load(root, options) {
        Ok(model) => model,
        Err(e) => fail_load(&e, output, quiet),
    }
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) {
    let pretty = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("serialization error: {}", e));
    println!("{}", pretty);
}

/// One human-readable line per diagnostic, in recording order.
pub(crate) fn describe_diagnostics(diagnostics: &Diagnostics) -> Vec<String> {
    let mut lines = Vec::with_capacity(diagnostics.len());
    for e in &diagnostics.load_errors {
        let what = match e.kind {
            LoadErrorKind::Missing => "missing file",
            LoadErrorKind::Unreadable => "unreadable file",
            LoadErrorKind::Encoding => "file is not UTF-8",
            LoadErrorKind::CyclicReference => "cyclic reference",
        };
        lines.push(format!(
            "{}:{}: {} '{}'",
            e.parent.display(),
            e.line,
            what,
            e.path.display()
        ));
    }
    for u in &diagnostics.unresolved {
        lines.push(format!(
            "{}:{}: unresolved placeholder {} in '{}'",
            u.file.display(),
            u.line,
            u.placeholder,
            u.command
        ));
    }
    for w in &diagnostics.warnings {
        lines.push(match w {
            Warning::MalformedLine { file, line, text } => {
                format!("{}:{}: malformed line '{}'", file.display(), line, text)
            }
            Warning::UnbalancedLogic { file, line, text } => {
                format!("{}:{}: unbalanced '{}'", file.display(), line, text)
            }
            Warning::InvalidSetting {
                file,
                line,
                command,
                value,
            } => format!(
                "{}:{}: invalid value '{}' for '{}'",
                file.display(),
                line,
                value,
                command
            ),
            Warning::MissingAttachment {
                file,
                line,
                command,
                path,
            } => format!(
                "{}:{}: '{}' attaches missing file '{}'",
                file.display(),
                line,
                command,
                path.display()
            ),
        });
    }
    lines
}

//! Command-line text helpers shared by the scanner and the part factory.

/// Assignment separator between a command and its value.
pub const ASSIGN: &str = "==";

/// Trim, collapse internal whitespace and lower-case a command keyword.
///
/// Idempotent: normalizing a normalized command returns it unchanged.
pub fn normalize_command(command: &str) -> String {
    command
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Split `command == value` on the first separator. Returns `None` for
/// lines without a separator.
pub fn split_assignment(line: &str) -> Option<(String, String)> {
    let (command, value) = line.split_once(ASSIGN)?;
    Some((normalize_command(command), value.trim().to_owned()))
}

/// Split a piped value (`a.shp | b.shp`) into its trimmed, non-empty parts.
pub fn split_pipes(value: &str) -> Vec<String> {
    value
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_and_lowercases() {
        assert_eq!(
            normalize_command("  Geometry   Control\tFile "),
            "geometry control file"
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_command("Read  GIS   Z Shape");
        assert_eq!(normalize_command(&once), once);
    }

    #[test]
    fn split_assignment_uses_first_separator() {
        let (cmd, value) = split_assignment("Set Variable  X == a == b").unwrap();
        assert_eq!(cmd, "set variable x");
        assert_eq!(value, "a == b");
        assert!(split_assignment("Start 1D Domain").is_none());
    }

    #[test]
    fn split_pipes_drops_empty_parts() {
        assert_eq!(
            split_pipes(" a.shp |b.shp|  "),
            vec!["a.shp".to_string(), "b.shp".to_string()]
        );
    }
}

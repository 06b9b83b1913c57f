//! Line decoder: bytes to numbered, comment-free, non-blank lines.

/// Internal comment marker. `#` is folded onto it before scanning.
pub const COMMENT_MARKER: char = '!';
const ALT_COMMENT_MARKER: char = '#';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLine {
    /// 1-based physical line number.
    pub number: u32,
    /// Trimmed text with any trailing comment removed.
    pub text: String,
}

/// The buffer is not valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid UTF-8 sequence after byte {valid_up_to}")]
pub struct EncodingError {
    pub valid_up_to: usize,
}

/// Decode a control file buffer.
///
/// Blank lines and whole-line comments are dropped; line numbers of the
/// surviving lines still refer to the physical file.
pub fn decode_lines(bytes: &[u8]) -> Result<Vec<DecodedLine>, EncodingError> {
    let text = std::str::from_utf8(bytes).map_err(|e| EncodingError {
        valid_up_to: e.valid_up_to(),
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut out = Vec::new();
    for (idx, raw) in text.split('\n').enumerate() {
        let line = strip_comment(raw);
        if line.is_empty() {
            continue;
        }
        out.push(DecodedLine {
            number: line_number(idx),
            text: line.to_owned(),
        });
    }
    Ok(out)
}

/// 1-based line number for a 0-based index, saturating at `u32::MAX`.
fn line_number(idx: usize) -> u32 {
    u32::try_from(idx).map_or(u32::MAX, |n| n.saturating_add(1))
}

/// Remove everything from the first comment marker on and trim the rest.
pub fn strip_comment(line: &str) -> &str {
    let end = line
        .find([COMMENT_MARKER, ALT_COMMENT_MARKER])
        .unwrap_or(line.len());
    line[..end].trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[DecodedLine]) -> Vec<(u32, &str)> {
        lines.iter().map(|l| (l.number, l.text.as_str())).collect()
    }

    #[test]
    fn drops_blank_and_comment_lines() {
        let src = b"! header\n\n   \n  # hashed\nTimestep == 2\n";
        let lines = decode_lines(src).unwrap();
        assert_eq!(texts(&lines), vec![(5, "Timestep == 2")]);
    }

    #[test]
    fn strips_inline_comments_with_either_marker() {
        let src = b"Cell Size == 5 ! metres\nEnd Time == 3 # hours";
        let lines = decode_lines(src).unwrap();
        assert_eq!(
            texts(&lines),
            vec![(1, "Cell Size == 5"), (2, "End Time == 3")]
        );
    }

    #[test]
    fn normalizes_line_endings() {
        let src = b"a == 1\r\nb == 2\rc == 3";
        let lines = decode_lines(src).unwrap();
        assert_eq!(texts(&lines), vec![(1, "a == 1"), (2, "b == 2"), (3, "c == 3")]);
    }

    #[test]
    fn ignores_byte_order_mark() {
        let src = "\u{feff}Timestep == 1".as_bytes();
        let lines = decode_lines(src).unwrap();
        assert_eq!(lines[0].text, "Timestep == 1");
    }

    #[test]
    fn line_numbers_saturate_instead_of_wrapping() {
        assert_eq!(line_number(0), 1);
        assert_eq!(line_number(41), 42);
        assert_eq!(line_number(u32::MAX as usize), u32::MAX);
        assert_eq!(line_number(usize::MAX), u32::MAX);
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let err = decode_lines(&[b'o', b'k', 0xff, b'\n']).unwrap_err();
        assert_eq!(err.valid_up_to, 2);
    }
}

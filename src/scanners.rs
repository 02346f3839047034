//! Line-level recognizers for block openers. Each scanner looks at a single already-normalized
//! source line and answers "does this line open/continue a construct of kind X", returning
//! just enough structure (an offset, a count) for the block parser to act on. Hand-rolled byte
//! matching rather than a grammar crate or regex, in the same spirit as a reference CommonMark
//! implementation: these are hot, tiny, and the patterns involved don't benefit from generality.

use crate::ctype::{isdigit, isspace};

/// An ATX heading: 1-6 `#` at column 0, followed by a space/tab or end of line. Returns the
/// heading level and the byte offset where the heading content begins (the `#` run plus the
/// separating whitespace already skipped). A run of 7+ `#` does not match; callers fall back
/// to treating the line as a paragraph.
pub fn atx_heading_start(line: &str) -> Option<(u8, usize)> {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() && bytes[i] == b'#' {
        i += 1;
    }
    let level = i;
    if level == 0 || level > 6 {
        return None;
    }
    if i == bytes.len() {
        return Some((level as u8, i));
    }
    if !isspace(bytes[i]) {
        return None;
    }
    while i < bytes.len() && isspace(bytes[i]) {
        i += 1;
    }
    Some((level as u8, i))
}

/// Strips a trailing ATX closing sequence (one or more spaces, then one or more `#`, then
/// only spaces to end of line) from a heading's content, per the "optionally trailing #s
/// removed" rule. Leaves the content untouched if the trailing run isn't preceded by
/// whitespace (a bare `foo#` is not a closing sequence).
pub fn strip_atx_closing_sequence(content: &str) -> &str {
    let trimmed = content.trim_end_matches(' ');
    let hashes_stripped = trimmed.trim_end_matches('#');
    if hashes_stripped.len() == trimmed.len() {
        return content;
    }
    if hashes_stripped.is_empty() || hashes_stripped.ends_with(' ') {
        return hashes_stripped.trim_end_matches(' ');
    }
    content
}

/// A setext underline: a line of only `=` (level 1) or only `-` (level 2), at least one
/// character, optionally preceded by up to 3 spaces.
pub fn setext_heading_line(line: &str) -> Option<u8> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 || trimmed.is_empty() {
        return None;
    }
    if trimmed.bytes().all(|b| b == b'=') {
        Some(1)
    } else if trimmed.bytes().all(|b| b == b'-') {
        Some(2)
    } else {
        None
    }
}

/// A thematic break: a line (ignoring up to 3 leading spaces) of 3+ of the same `-`, `*`, or
/// `_` character, optionally separated by spaces, and nothing else.
pub fn thematic_break(line: &str) -> bool {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return false;
    }
    let mut marker = None;
    let mut count = 0;
    for c in trimmed.chars() {
        match c {
            '-' | '*' | '_' => {
                if marker.is_none() {
                    marker = Some(c);
                } else if marker != Some(c) {
                    return false;
                }
                count += 1;
            }
            ' ' | '\t' => {}
            _ => return false,
        }
    }
    count >= 3
}

/// The opening delimiter of a fenced code block: 3+ backticks or 3+ tildes at the start of the
/// (already left-trimmed by up to 3 spaces) line, plus whatever follows as the raw info-string.
/// Backtick fences may not have a further backtick in their info-string; tilde fences have no
/// such restriction.
pub fn open_code_fence(line: &str) -> Option<(u8, usize, &str)> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let rest = &line[indent..];
    let bytes = rest.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let fence_char = bytes[0];
    if fence_char != b'`' && fence_char != b'~' {
        return None;
    }
    let mut len = 0;
    while len < bytes.len() && bytes[len] == fence_char {
        len += 1;
    }
    if len < 3 {
        return None;
    }
    let info = rest[len..].trim();
    if fence_char == b'`' && info.contains('`') {
        return None;
    }
    Some((fence_char, len, info))
}

/// A closing fence: the same character as `fence_char`, at least `min_len` long, with only
/// whitespace (and up to 3 leading spaces) otherwise on the line.
pub fn close_code_fence(line: &str, fence_char: u8, min_len: usize) -> bool {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return false;
    }
    let rest = line[indent..].trim_end();
    let bytes = rest.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    if !bytes.iter().all(|&b| b == fence_char) {
        return false;
    }
    bytes.len() >= min_len
}

/// The 4-space (or tab-expanded equivalent) indent of an indented code block line.
pub fn indented_code_line(line: &str) -> Option<&str> {
    if line.starts_with("    ") {
        Some(&line[4..])
    } else {
        None
    }
}

/// A blockquote marker `>` with an optional single following space, returning the offset past
/// the marker. Up to 3 leading spaces are permitted before the `>`.
pub fn block_quote_start(line: &str) -> Option<usize> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let rest = &line[indent..];
    if !rest.starts_with('>') {
        return None;
    }
    let mut offset = indent + 1;
    if line.as_bytes().get(offset) == Some(&b' ') {
        offset += 1;
    }
    Some(offset)
}

/// A bullet list marker (`-`, `*`, `+`) followed by whitespace or end of line. Returns the
/// marker character and the byte offset of the item content (after marker + one space, or
/// just after the marker for an otherwise-blank item).
pub fn bullet_list_marker(line: &str) -> Option<(u8, usize)> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let bytes = line.as_bytes();
    let marker_pos = indent;
    let marker = *bytes.get(marker_pos)?;
    if marker != b'-' && marker != b'*' && marker != b'+' {
        return None;
    }
    let after = marker_pos + 1;
    if after == bytes.len() {
        return Some((marker, after));
    }
    if !isspace(bytes[after]) {
        return None;
    }
    Some((marker, after + 1))
}

/// An ordered list marker: 1-9 digits followed by `.` or `)`, then whitespace or end of line.
/// Returns the parsed start number, the delimiter byte, and the content offset.
pub fn ordered_list_marker(line: &str) -> Option<(u64, u8, usize)> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let bytes = line.as_bytes();
    let mut i = indent;
    let digits_start = i;
    while i < bytes.len() && isdigit(bytes[i]) {
        i += 1;
    }
    let digit_count = i - digits_start;
    if digit_count == 0 || digit_count > 9 {
        return None;
    }
    let delim = *bytes.get(i)?;
    if delim != b'.' && delim != b')' {
        return None;
    }
    let after = i + 1;
    let content_offset = if after == bytes.len() {
        after
    } else if isspace(bytes[after]) {
        after + 1
    } else {
        return None;
    };
    let start: u64 = line[digits_start..i].parse().ok()?;
    Some((start, delim, content_offset))
}

/// A task marker at the start of list-item content: `[ ]`, `[x]`, or `[X]` followed by
/// whitespace. Returns whether it's checked and the offset past the marker + one space.
pub fn task_marker(content: &str) -> Option<(bool, usize)> {
    let bytes = content.as_bytes();
    if bytes.len() < 4 || bytes[0] != b'[' || bytes[2] != b']' {
        return None;
    }
    let checked = match bytes[1] {
        b' ' => false,
        b'x' | b'X' => true,
        _ => return None,
    };
    if !isspace(bytes[3]) {
        return None;
    }
    Some((checked, 4))
}

/// A footnote definition opener: `[^label]:` at column 0. Returns the label and the offset
/// where the definition's own content starts.
pub fn footnote_definition_start(line: &str) -> Option<(&str, usize)> {
    let bytes = line.as_bytes();
    if bytes.len() < 4 || bytes[0] != b'[' || bytes[1] != b'^' {
        return None;
    }
    let close = line[2..].find(']')? + 2;
    if close == 2 {
        return None; // empty label
    }
    if line.as_bytes().get(close + 1) != Some(&b':') {
        return None;
    }
    let label = &line[2..close];
    let mut offset = close + 2;
    while line.as_bytes().get(offset) == Some(&b' ') {
        offset += 1;
    }
    Some((label, offset))
}

/// A GFM table alignment row: pipe-separated cells each matching `:?-+:?`, at least one cell,
/// with no character other than `-`, `:`, whitespace, and `|` anywhere on the line. A row with
/// no `|` at all is never a table delimiter, even if it's otherwise all dashes/colons — that
/// shape is a setext heading underline (`---`) or a thematic break, and must be left for those
/// scanners rather than collapsing into a spurious single-column table.
pub fn table_alignment_row(line: &str) -> Option<smallvec::SmallVec<[crate::ast::Alignment; 4]>> {
    let trimmed = crate::strings::trim(line);
    if trimmed.is_empty() || !trimmed.contains('|') {
        return None;
    }
    if !trimmed
        .bytes()
        .all(|b| matches!(b, b'-' | b':' | b'|' | b' ' | b'\t'))
    {
        return None;
    }

    let cells = split_table_row(trimmed);
    if cells.is_empty() {
        return None;
    }

    let mut alignments = smallvec::SmallVec::with_capacity(cells.len());
    for cell in cells {
        let cell = crate::strings::trim(cell);
        if cell.is_empty() || !cell.bytes().all(|b| b == b'-' || b == b':') {
            return None;
        }
        let dashes = cell.trim_matches(':');
        if dashes.is_empty() {
            return None;
        }
        let left = cell.starts_with(':');
        let right = cell.ends_with(':');
        alignments.push(match (left, right) {
            (true, true) => crate::ast::Alignment::Center,
            (true, false) => crate::ast::Alignment::Left,
            (false, true) => crate::ast::Alignment::Right,
            (false, false) => crate::ast::Alignment::Default,
        });
    }
    Some(alignments)
}

/// Splits a table row on unescaped `|`, trimming one set of enclosing pipes if present.
/// `\|` is an escaped pipe and does not split; the parser unescapes it when building cell text.
pub fn split_table_row(line: &str) -> Vec<&str> {
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);

    let bytes = line.as_bytes();
    let mut cells = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            i += 2;
            continue;
        }
        if bytes[i] == b'|' {
            cells.push(&line[start..i]);
            start = i + 1;
        }
        i += 1;
    }
    cells.push(&line[start..]);
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atx_headings() {
        assert_eq!(atx_heading_start("# Title"), Some((1, 2)));
        assert_eq!(atx_heading_start("###### Title"), Some((6, 7)));
        assert_eq!(atx_heading_start("####### Title"), None);
        assert_eq!(atx_heading_start("#NoSpace"), None);
        assert_eq!(atx_heading_start("#"), Some((1, 1)));
    }

    #[test]
    fn thematic_breaks() {
        assert!(thematic_break("---"));
        assert!(thematic_break("* * *"));
        assert!(thematic_break("___"));
        assert!(!thematic_break("--"));
        assert!(!thematic_break("- - a"));
    }

    #[test]
    fn fences() {
        assert_eq!(open_code_fence("```rust"), Some((b'`', 3, "rust")));
        assert_eq!(open_code_fence("~~~~"), Some((b'~', 4, "")));
        assert!(close_code_fence("```", b'`', 3));
        assert!(!close_code_fence("``", b'`', 3));
        assert!(close_code_fence("~~~~~", b'~', 3));
    }

    #[test]
    fn bullets_and_ordered() {
        assert_eq!(bullet_list_marker("- item"), Some((b'-', 2)));
        assert_eq!(bullet_list_marker("-"), Some((b'-', 1)));
        assert_eq!(ordered_list_marker("12. item"), Some((12, b'.', 4)));
        assert_eq!(ordered_list_marker("1) item"), Some((1, b')', 3)));
    }

    #[test]
    fn tasks() {
        assert_eq!(task_marker("[x] done"), Some((true, 4)));
        assert_eq!(task_marker("[ ] todo"), Some((false, 4)));
        assert_eq!(task_marker("[x]nospace"), None);
    }

    #[test]
    fn footnote_defs() {
        assert_eq!(footnote_definition_start("[^a]: text"), Some(("a", 6)));
        assert_eq!(footnote_definition_start("[^]: text"), None);
    }

    #[test]
    fn table_alignment() {
        use crate::ast::Alignment::*;
        assert_eq!(
            table_alignment_row("|:--|--:|:-:|---|").as_deref(),
            Some(&[Left, Right, Center, Default][..])
        );
        assert_eq!(table_alignment_row("not a row"), None);
    }

    #[test]
    fn table_alignment_rejects_pipeless_dash_runs() {
        assert_eq!(table_alignment_row("---"), None);
        assert_eq!(table_alignment_row("-"), None);
        assert_eq!(table_alignment_row(":--:"), None);
    }
}

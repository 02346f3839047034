//! Small string utilities shared by the scanners and parser. Kept free of any Markdown
//! semantics of its own — just byte/line massaging.

use crate::ctype::isspace;

const TAB_STOP: usize = 4;

/// Strips a leading UTF-8 BOM, normalizes CRLF and lone CR to LF, and expands tabs to spaces
/// column-aware (so a tab always advances to the next multiple of [`TAB_STOP`]), exactly the
/// normalization the parser contract in §4.2 requires before indent analysis.
pub fn normalize_source(input: &str) -> String {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);

    let mut normalized = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                normalized.push('\n');
            }
            _ => normalized.push(c),
        }
    }

    expand_tabs(&normalized)
}

fn expand_tabs(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut column = 0usize;
    for c in input.chars() {
        match c {
            '\t' => {
                let spaces = TAB_STOP - (column % TAB_STOP);
                for _ in 0..spaces {
                    out.push(' ');
                }
                column += spaces;
            }
            '\n' => {
                out.push('\n');
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

/// Trims ASCII whitespace from both ends.
pub fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| (c as u32) < 128 && isspace(c as u8))
}

/// Collapses any run of Unicode whitespace to a single space, per the `normalize_whitespace`
/// treatment CommonMark formatters apply to things like link titles and alt text.
pub fn normalize_whitespace(v: &str) -> String {
    let mut last_was_space = false;
    let mut out = String::with_capacity(v.len());
    for c in v.chars() {
        if crate::ctype::is_unicode_whitespace(c) {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out
}

/// Splits normalized source into lines without their trailing `\n`, matching the parser's
/// line-oriented scanning approach (`scanners` operates one line at a time).
pub fn split_lines(normalized: &str) -> Vec<&str> {
    if normalized.is_empty() {
        return vec![];
    }
    let mut lines: Vec<&str> = normalized.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_crlf_and_bom() {
        let input = "\u{feff}a\r\nb\rc\n";
        assert_eq!(normalize_source(input), "a\nb\nc\n");
    }

    #[test]
    fn expands_tabs_to_next_stop() {
        assert_eq!(expand_tabs("a\tb"), "a   b");
        assert_eq!(expand_tabs("\tx"), "    x");
    }

    #[test]
    fn trims_ascii_whitespace() {
        assert_eq!(trim("  hi  "), "hi");
    }

    #[test]
    fn splits_lines_dropping_final_empty() {
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b"]);
        assert_eq!(split_lines(""), Vec::<&str>::new());
    }
}

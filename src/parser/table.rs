//! GFM table construction: turns a recognized header line, an alignment row (already parsed by
//! [`crate::scanners::table_alignment_row`]), and the following body lines into a [`Table`].

use smallvec::SmallVec;

use crate::ast::{Alignment, Inline, Table};
use crate::scanners::split_table_row;
use crate::strings;

use super::inlines::parse_inlines;

pub fn build_table(header_line: &str, alignments: SmallVec<[Alignment; 4]>, body_lines: &[String]) -> Table {
    let col_count = alignments.len();
    let header = pad_row(split_row_cells(header_line), col_count);
    let rows = body_lines
        .iter()
        .map(|line| pad_row(split_row_cells(line), col_count))
        .collect();

    Table {
        alignments,
        header,
        rows,
    }
}

fn split_row_cells(line: &str) -> Vec<Vec<Inline>> {
    split_table_row(strings::trim(line))
        .into_iter()
        .map(|cell| parse_inlines(&unescape_pipes(strings::trim(cell))))
        .collect()
}

fn unescape_pipes(s: &str) -> String {
    s.replace("\\|", "|")
}

/// Pads with empty cells or truncates, per the data model's "header row length equals the
/// alignment vector length; body rows are padded or truncated to match" rule (§4.3).
fn pad_row(mut cells: Vec<Vec<Inline>>, col_count: usize) -> Vec<Vec<Inline>> {
    cells.truncate(col_count);
    while cells.len() < col_count {
        cells.push(Vec::new());
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(cell: &[Inline]) -> String {
        cell.iter()
            .filter_map(|n| match n {
                Inline::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn builds_uniform_rows() {
        let alignments = SmallVec::from_vec(vec![Alignment::Left, Alignment::Right]);
        let table = build_table("a|b", alignments, &["1|2".to_string(), "x".to_string()]);
        assert_eq!(texts(&table.header[0]), "a");
        assert_eq!(texts(&table.header[1]), "b");
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(texts(&table.rows[1][0]), "x");
        assert_eq!(texts(&table.rows[1][1]), "");
    }

    #[test]
    fn truncates_extra_cells() {
        let alignments = SmallVec::from_vec(vec![Alignment::Default]);
        let table = build_table("a|b|c", alignments, &[]);
        assert_eq!(table.header.len(), 1);
        assert_eq!(texts(&table.header[0]), "a");
    }

    #[test]
    fn unescapes_pipes_in_cells() {
        let alignments = SmallVec::from_vec(vec![Alignment::Default]);
        let table = build_table(r"a\|b", alignments, &[]);
        assert_eq!(texts(&table.header[0]), "a|b");
    }
}

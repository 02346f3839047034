//! The Table Handler (C3): turns a [`Table`] AST node into an `<hp:tbl>` subtree, wrapped in the
//! single `<hp:p>` that carries it as a floating paragraph-level object. Column widths are
//! uniform across a fixed total writable width, with the last column absorbing the remainder of
//! an uneven division — there is no cell merging, so every row always has exactly as many
//! `<hp:tc>` children as the table has columns.

use crate::ast::{Alignment, Inline, Table};
use crate::style::ParaRole;
use crate::xmltree::Element;

use super::inline::{render_inline_list, Capability};
use super::Renderer;

/// Default total writable width for a table, in HWP units (1/100 mm).
const TOTAL_WIDTH: u32 = 40_000;

pub(super) fn render_table_paragraph(r: &mut Renderer, table: &Table, indent: u32) -> Element {
    let col_count = table.alignments.len().max(1);
    let base_width = TOTAL_WIDTH / col_count as u32;
    let remainder = TOTAL_WIDTH - base_width * col_count as u32;

    let mut tbl = Element::new("hp:tbl")
        .attr("rowCnt", (table.rows.len() + 1).to_string())
        .attr("colCnt", col_count.to_string());

    tbl.push_child(render_row(r, &table.header, &table.alignments, true, base_width, remainder, col_count));
    for row in &table.rows {
        tbl.push_child(render_row(r, row, &table.alignments, false, base_width, remainder, col_count));
    }

    let id = r.alloc_paragraph_id();
    let mut p = Element::new("hp:p")
        .attr("id", id.to_string())
        .attr("paraPrIDRef", r.catalog.para_id(ParaRole::Body).to_string())
        .attr("styleIDRef", r.catalog.style_id(ParaRole::Body).to_string());
    if indent > 0 {
        p = p.attr("indent", (r.base_indent * indent).to_string());
    }
    p.child(tbl)
}

fn render_row(
    r: &mut Renderer,
    cells: &[Vec<Inline>],
    alignments: &[Alignment],
    is_header: bool,
    base_width: u32,
    remainder: u32,
    col_count: usize,
) -> Element {
    let mut tr = Element::new("hp:tr");
    for (idx, cell) in cells.iter().enumerate() {
        let width = if idx + 1 == col_count { base_width + remainder } else { base_width };
        let alignment = alignments.get(idx).copied().unwrap_or(Alignment::Default);
        tr.push_child(render_cell(r, cell, alignment, is_header, width));
    }
    tr
}

fn render_cell(r: &mut Renderer, inlines: &[Inline], alignment: Alignment, is_header: bool, width: u32) -> Element {
    let cell_id = r.alloc_table_cell_id();
    let align_attr = match alignment {
        Alignment::Left | Alignment::Default => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
    };

    let para_id = r.alloc_paragraph_id();
    let mut p = Element::new("hp:p")
        .attr("id", para_id.to_string())
        .attr("paraPrIDRef", r.catalog.para_id(ParaRole::TableCell).to_string())
        .attr("styleIDRef", r.catalog.style_id(ParaRole::TableCell).to_string())
        .attr("align", align_attr);

    let mut cap = Capability::default();
    if is_header {
        cap.bold = true;
    }
    for run in render_inline_list(r, inlines, cap) {
        p.push_child(run);
    }

    let mut tc = Element::new("hp:tc").attr("id", cell_id.to_string()).attr("width", width.to_string());
    if is_header {
        tc = tc.attr("header", "1");
    }
    tc.child(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Warning;
    use crate::style;

    fn render(table: &Table) -> String {
        let catalog = style::resolve("default").unwrap();
        let mut warnings: Vec<Warning> = Vec::new();
        let mut renderer = super::super::Renderer {
            catalog: &catalog,
            warnings: &mut warnings,
            next_paragraph_id: 0,
            next_table_cell_id: 0,
            footnote_ids: Default::default(),
            base_indent: 1_000,
            image_resolver: None,
            next_binary_id: 1,
            binaries: Vec::new(),
            footnote_bodies: Default::default(),
        };
        let mut out = String::new();
        render_table_paragraph(&mut renderer, table, 0).serialize(&mut out);
        out
    }

    fn table_of(cols: usize, rows: usize) -> Table {
        Table {
            alignments: smallvec::smallvec![Alignment::Default; cols],
            header: vec![vec![Inline::Text("h".into())]; cols],
            rows: vec![vec![vec![Inline::Text("c".into())]; cols]; rows],
        }
    }

    #[test]
    fn last_column_absorbs_width_remainder() {
        let xml = render(&table_of(3, 1));
        assert!(xml.contains("width=\"13334\""));
        assert!(xml.matches("width=\"13333\"").count() == 2);
    }

    #[test]
    fn header_row_marked_and_bold() {
        let xml = render(&table_of(2, 1));
        assert_eq!(xml.matches("header=\"1\"").count(), 2);
    }

    #[test]
    fn cell_count_matches_column_count() {
        let xml = render(&table_of(4, 2));
        assert_eq!(xml.matches("<hp:tc ").count(), 12);
    }
}

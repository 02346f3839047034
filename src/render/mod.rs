//! The renderer (C4): walks the [`crate::ast::Document`] depth-first and produces the
//! `section0.xml` body plus any binary payloads collected from an image resolver.
//!
//! Unlike comrak's single-pass `html.rs` formatter, footnotes need a pass over the whole inline
//! tree before any XML is emitted, since a reference can precede its definition in source order
//! but its rendered footnote ID has to be known at the point the reference itself is rendered.

pub mod inline;
pub mod table;

use std::collections::HashMap;

use rustc_hash::FxHashMap;

use crate::ast::{Block, CodeBlock, Document, FootnoteDefinition, Inline as InlineNode, ListItem, TaskState};
use crate::error::{Warning, WarningKind};
use crate::style::{BorderFillRole, Catalog, CharRole, NumberingRole, ParaRole};
use crate::xmltree::Element;

pub struct RenderOutput {
    pub section0_xml: String,
    pub binaries: Vec<(u32, Vec<u8>)>,
}

pub fn render(
    document: &Document,
    catalog: &Catalog,
    base_indent: u32,
    image_resolver: Option<&dyn Fn(&str) -> Option<Vec<u8>>>,
    warnings: &mut Vec<Warning>,
) -> RenderOutput {
    let footnote_ids = assign_footnote_ids(document);

    let mut renderer = Renderer {
        catalog,
        warnings,
        next_paragraph_id: 0,
        next_table_cell_id: 0,
        footnote_ids,
        base_indent,
        image_resolver,
        next_binary_id: 1,
        binaries: Vec::new(),
        footnote_bodies: HashMap::new(),
    };

    let ctx = Context {
        indent: 0,
        in_quote: false,
        in_footnote: false,
    };
    let mut body: Vec<Element> = document
        .blocks
        .iter()
        .flat_map(|b| render_block(&mut renderer, b, ctx))
        .collect();

    if body.is_empty() {
        body.push(renderer.paragraph(ParaRole::Body, &[], 0));
    }

    let mut footnote_id_order: Vec<u32> = renderer.footnote_bodies.keys().copied().collect();
    footnote_id_order.sort_unstable();
    for id in footnote_id_order {
        let paragraphs = renderer.footnote_bodies.remove(&id).unwrap_or_default();
        let mut fn_el = Element::new("hp:footNote").attr("id", id.to_string());
        for p in paragraphs {
            fn_el.push_child(p);
        }
        body.push(fn_el);
    }

    let mut root = Element::new("hs:sec")
        .attr("xmlns:hp", "http://www.hancom.co.kr/hwpml/2011/paragraph")
        .attr("xmlns:hs", "http://www.hancom.co.kr/hwpml/2011/section");
    for el in body {
        root.push_child(el);
    }

    RenderOutput {
        section0_xml: root.to_document_string(),
        binaries: renderer.binaries,
    }
}

#[derive(Debug, Clone, Copy)]
struct Context {
    indent: u32,
    in_quote: bool,
    in_footnote: bool,
}

pub(crate) struct Renderer<'a> {
    pub(crate) catalog: &'a Catalog,
    warnings: &'a mut Vec<Warning>,
    next_paragraph_id: u32,
    next_table_cell_id: u32,
    pub(crate) footnote_ids: FxHashMap<String, u32>,
    pub(crate) base_indent: u32,
    image_resolver: Option<&'a dyn Fn(&str) -> Option<Vec<u8>>>,
    next_binary_id: u32,
    binaries: Vec<(u32, Vec<u8>)>,
    footnote_bodies: HashMap<u32, Vec<Element>>,
}

impl<'a> Renderer<'a> {
    fn alloc_paragraph_id(&mut self) -> u32 {
        let id = self.next_paragraph_id;
        self.next_paragraph_id += 1;
        id
    }

    pub(crate) fn alloc_table_cell_id(&mut self) -> u32 {
        let id = self.next_table_cell_id;
        self.next_table_cell_id += 1;
        id
    }

    pub(crate) fn push_warning(&mut self, kind: WarningKind, message: impl Into<String>) {
        self.warnings.push(Warning::new(kind, None, message));
    }

    pub(crate) fn resolve_image(&mut self, src: &str) -> u32 {
        if let Some(resolver) = self.image_resolver {
            if let Some(bytes) = resolver(src) {
                let id = self.next_binary_id;
                self.next_binary_id += 1;
                self.binaries.push((id, bytes));
                return id;
            }
        }
        0
    }

    fn paragraph(&mut self, role: ParaRole, inlines: &[InlineNode], indent: u32) -> Element {
        let id = self.alloc_paragraph_id();
        let mut p = Element::new("hp:p")
            .attr("id", id.to_string())
            .attr("paraPrIDRef", self.catalog.para_id(role).to_string())
            .attr("styleIDRef", self.catalog.style_id(role).to_string());
        if indent > 0 {
            p = p.attr("indent", (self.base_indent * indent).to_string());
        }
        for run in inline::render_inline_list(self, inlines, inline::Capability::default()) {
            p.push_child(run);
        }
        p
    }

    /// `start`, when `Some` and not 1, overrides the numbering's default starting ordinal for
    /// this paragraph — the renumbering instance an ordered list's `start` (§3) maps onto,
    /// carried as a paragraph-level attribute rather than a new numbering ID, since the numbering
    /// table itself is declared once in `header.xml` (§4.1) and shared by every ordered list in
    /// the document.
    fn list_item_paragraph(
        &mut self,
        inlines: &[InlineNode],
        indent: u32,
        numbering: NumberingRole,
        start: Option<u64>,
    ) -> Element {
        let id = self.alloc_paragraph_id();
        let mut p = Element::new("hp:p")
            .attr("id", id.to_string())
            .attr("paraPrIDRef", self.catalog.para_id(ParaRole::ListItem).to_string())
            .attr("styleIDRef", self.catalog.style_id(ParaRole::ListItem).to_string())
            .attr("numberingIDRef", self.catalog.numbering_id(numbering).to_string())
            .attr("indent", (self.base_indent * indent).to_string());
        if let Some(n) = start {
            if n != 1 {
                p = p.attr("numberStart", n.to_string());
            }
        }
        for run in inline::render_inline_list(self, inlines, inline::Capability::default()) {
            p.push_child(run);
        }
        p
    }

    fn hr_paragraph(&mut self, indent: u32) -> Element {
        let id = self.alloc_paragraph_id();
        let mut p = Element::new("hp:p")
            .attr("id", id.to_string())
            .attr("paraPrIDRef", self.catalog.para_id(ParaRole::Hr).to_string())
            .attr("styleIDRef", self.catalog.style_id(ParaRole::Hr).to_string())
            .attr(
                "borderFillIDRef",
                self.catalog.border_fill_id(BorderFillRole::HrBorder).to_string(),
            );
        if indent > 0 {
            p = p.attr("indent", (self.base_indent * indent).to_string());
        }
        p
    }

    fn code_block_paragraphs(&mut self, code: &CodeBlock, indent: u32) -> Vec<Element> {
        let mut out = Vec::new();
        let lines: Vec<&str> = if code.literal.is_empty() {
            vec![""]
        } else {
            code.literal.split('\n').collect()
        };

        for (idx, line) in lines.iter().enumerate() {
            let id = self.alloc_paragraph_id();
            let mut p = Element::new("hp:p")
                .attr("id", id.to_string())
                .attr("paraPrIDRef", self.catalog.para_id(ParaRole::CodeBlock).to_string())
                .attr("styleIDRef", self.catalog.style_id(ParaRole::CodeBlock).to_string());
            if indent > 0 {
                p = p.attr("indent", (self.base_indent * indent).to_string());
            }
            if idx == 0 && !code.info.is_empty() {
                p = p.attr("codeInfo", code.info.clone());
            }
            p = p.child(
                Element::new("hp:t")
                    .attr("charPrIDRef", self.catalog.char_id(CharRole::InlineCode).to_string())
                    .text(line.to_string()),
            );
            out.push(p);
        }

        out.push(self.paragraph(ParaRole::Body, &[], indent));
        out
    }

    fn record_footnote_content(&mut self, def: &FootnoteDefinition) {
        let Some(&id) = self.footnote_ids.get(&def.label) else {
            return;
        };
        let ctx = Context {
            indent: 0,
            in_quote: false,
            in_footnote: true,
        };
        let paragraphs: Vec<Element> = def
            .children
            .iter()
            .flat_map(|b| render_block(self, b, ctx))
            .collect();
        self.footnote_bodies.insert(id, paragraphs);
    }
}

fn render_block(r: &mut Renderer, block: &Block, ctx: Context) -> Vec<Element> {
    match block {
        Block::Heading(h) => vec![r.paragraph(ParaRole::heading(h.level), &h.content, ctx.indent)],
        Block::Paragraph(inlines) => {
            let role = if ctx.in_footnote {
                ParaRole::FootnoteDef
            } else if ctx.in_quote {
                ParaRole::BlockQuote
            } else {
                ParaRole::Body
            };
            vec![r.paragraph(role, inlines, ctx.indent)]
        }
        Block::ThematicBreak => vec![r.hr_paragraph(ctx.indent)],
        Block::CodeBlock(code) => r.code_block_paragraphs(code, ctx.indent),
        Block::BlockQuote(children) => {
            let inner = Context {
                indent: ctx.indent + 1,
                in_quote: true,
                in_footnote: ctx.in_footnote,
            };
            children.iter().flat_map(|b| render_block(r, b, inner)).collect()
        }
        Block::BulletList(list) => render_list_items(r, &list.items, ctx, NumberingRole::Bullet, None),
        Block::OrderedList(list) => render_list_items(r, &list.items, ctx, NumberingRole::Ordered, Some(list.start)),
        Block::Table(tbl) => vec![table::render_table_paragraph(r, tbl, ctx.indent)],
        Block::FootnoteDefinition(def) => {
            if r.footnote_ids.contains_key(&def.label) {
                r.record_footnote_content(def);
                Vec::new()
            } else {
                r.push_warning(
                    WarningKind::UnreferencedFootnoteDefinition,
                    format!("footnote definition [^{}] is never referenced; rendering as body text", def.label),
                );
                def.children.iter().flat_map(|b| render_block(r, b, ctx)).collect()
            }
        }
    }
}

fn render_list_items(
    r: &mut Renderer,
    items: &[ListItem],
    ctx: Context,
    default_numbering: NumberingRole,
    start: Option<u64>,
) -> Vec<Element> {
    let mut out = Vec::new();
    let inner_ctx = Context {
        indent: ctx.indent + 1,
        in_quote: ctx.in_quote,
        in_footnote: ctx.in_footnote,
    };

    for (idx, item) in items.iter().enumerate() {
        let numbering = match item.task {
            TaskState::Checked => NumberingRole::TaskChecked,
            TaskState::Unchecked => NumberingRole::TaskUnchecked,
            TaskState::None => default_numbering,
        };
        // Only the first item's first paragraph carries the override; later items continue
        // numbering from there the way the numbering definition's own auto-increment does.
        let item_start = if idx == 0 { start } else { None };

        match item.children.split_first() {
            None => out.push(r.list_item_paragraph(&[], ctx.indent, numbering, item_start)),
            Some((Block::Paragraph(inlines), rest)) => {
                out.push(r.list_item_paragraph(inlines, ctx.indent, numbering, item_start));
                out.extend(rest.iter().flat_map(|b| render_block(r, b, inner_ctx)));
            }
            Some((Block::Heading(h), rest)) => {
                out.push(r.list_item_paragraph(&h.content, ctx.indent, numbering, item_start));
                out.extend(rest.iter().flat_map(|b| render_block(r, b, inner_ctx)));
            }
            Some((first, rest)) => {
                out.push(r.list_item_paragraph(&[], ctx.indent, numbering, item_start));
                out.extend(render_block(r, first, inner_ctx));
                out.extend(rest.iter().flat_map(|b| render_block(r, b, inner_ctx)));
            }
        }
    }

    out
}

fn assign_footnote_ids(document: &Document) -> FxHashMap<String, u32> {
    let mut ids = FxHashMap::default();
    let mut next = 0u32;
    visit_blocks_inlines(&document.blocks, &mut |inline| {
        if let InlineNode::FootnoteReference(label) = inline {
            if document.footnotes.contains_key(label) && !ids.contains_key(label) {
                ids.insert(label.clone(), next);
                next += 1;
            }
        }
    });
    ids
}

fn visit_blocks_inlines(blocks: &[Block], visit: &mut impl FnMut(&InlineNode)) {
    for block in blocks {
        match block {
            Block::Heading(h) => visit_inlines(&h.content, visit),
            Block::Paragraph(inlines) => visit_inlines(inlines, visit),
            Block::BulletList(list) => {
                for item in &list.items {
                    visit_blocks_inlines(&item.children, visit);
                }
            }
            Block::OrderedList(list) => {
                for item in &list.items {
                    visit_blocks_inlines(&item.children, visit);
                }
            }
            Block::BlockQuote(children) => visit_blocks_inlines(children, visit),
            Block::Table(table) => {
                for cell in &table.header {
                    visit_inlines(cell, visit);
                }
                for row in &table.rows {
                    for cell in row {
                        visit_inlines(cell, visit);
                    }
                }
            }
            Block::FootnoteDefinition(def) => visit_blocks_inlines(&def.children, visit),
            Block::CodeBlock(_) | Block::ThematicBreak => {}
        }
    }
}

fn visit_inlines(inlines: &[InlineNode], visit: &mut impl FnMut(&InlineNode)) {
    for inline in inlines {
        visit(inline);
        match inline {
            InlineNode::Emphasis(e) => visit_inlines(&e.children, visit),
            InlineNode::Strikethrough(children) => visit_inlines(children, visit),
            InlineNode::Link(link) => visit_inlines(&link.children, visit),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn render_source(src: &str) -> (RenderOutput, Vec<Warning>) {
        let outcome = parser::parse(src);
        let catalog = crate::style::resolve("default").unwrap();
        let mut warnings = outcome.warnings;
        let output = render(&outcome.document, &catalog, 1_000, None, &mut warnings);
        (output, warnings)
    }

    #[test]
    fn empty_input_yields_one_empty_paragraph() {
        let (output, warnings) = render_source("");
        assert_eq!(output.section0_xml.matches("<hp:p ").count(), 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn headings_get_distinct_paragraph_styles() {
        let catalog = crate::style::resolve("default").unwrap();
        let (output, _) = render_source("# A\n## B\n### C\n#### D\n##### E\n###### F\n");
        for role in [
            ParaRole::H1,
            ParaRole::H2,
            ParaRole::H3,
            ParaRole::H4,
            ParaRole::H5,
            ParaRole::H6,
        ] {
            let needle = format!("paraPrIDRef=\"{}\"", catalog.para_id(role));
            assert!(output.section0_xml.contains(&needle));
        }
    }

    #[test]
    fn task_list_uses_distinct_numberings() {
        let catalog = crate::style::resolve("default").unwrap();
        let (output, _) = render_source("- [x] done\n- [ ] todo\n");
        let checked = format!(
            "numberingIDRef=\"{}\"",
            catalog.numbering_id(NumberingRole::TaskChecked)
        );
        let unchecked = format!(
            "numberingIDRef=\"{}\"",
            catalog.numbering_id(NumberingRole::TaskUnchecked)
        );
        assert!(output.section0_xml.contains(&checked));
        assert!(output.section0_xml.contains(&unchecked));
    }

    #[test]
    fn footnote_reference_and_definition_share_id() {
        let (output, warnings) = render_source("see[^a].\n\n[^a]: note\n");
        assert!(output.section0_xml.contains("footNoteIDRef=\"0\""));
        assert!(output.section0_xml.contains("<hp:footNote id=\"0\""));
        assert!(warnings.is_empty());
    }

    #[test]
    fn unreferenced_footnote_becomes_body_text() {
        let (output, warnings) = render_source("para\n\n[^a]: orphaned\n");
        assert!(!output.section0_xml.contains("hp:footNote"));
        assert!(warnings
            .iter()
            .any(|w| w.kind == WarningKind::UnreferencedFootnoteDefinition));
    }

    #[test]
    fn unresolved_reference_becomes_literal_text() {
        let (output, warnings) = render_source("see[^missing].\n");
        assert!(output.section0_xml.contains("[^missing]"));
        assert!(warnings
            .iter()
            .any(|w| w.kind == WarningKind::UnresolvedFootnoteReference));
    }

    #[test]
    fn table_renders_with_cell_count() {
        let (output, _) = render_source("| a | b |\n|:--|--:|\n| 1 | 2 |\n");
        assert_eq!(output.section0_xml.matches("<hp:tc ").count(), 4);
    }

    #[test]
    fn ordered_list_start_overrides_only_first_paragraph() {
        let (output, _) = render_source("3. a\n4. b\n");
        assert_eq!(output.section0_xml.matches("numberStart=\"3\"").count(), 1);
    }

    #[test]
    fn ordered_list_starting_at_one_omits_override() {
        let (output, _) = render_source("1. a\n2. b\n");
        assert!(!output.section0_xml.contains("numberStart"));
    }

    #[test]
    fn paragraph_ids_are_sequential() {
        let (output, _) = render_source("a\n\nb\n\nc\n");
        assert!(output.section0_xml.contains("id=\"0\""));
        assert!(output.section0_xml.contains("id=\"1\""));
        assert!(output.section0_xml.contains("id=\"2\""));
    }
}

//! The block-level parser: turns normalized source lines into a [`crate::ast::Document`].
//!
//! Rather than comrak's incremental line-at-a-time feeding through an arena of open blocks,
//! this parser works over the whole, already-split line buffer and decides nesting immediately
//! through plain recursion: a container's own lines (with its prefix stripped) are handed back
//! into [`parse_blocks`]. There's no need to reparent anything after the fact, since by the time
//! a container's content lines are known, they're known completely.

pub mod inlines;
pub mod table;

use std::collections::HashMap;

use crate::ast::{
    Block, BulletList, CodeBlock, Document, FootnoteDefinition, Heading, ListItem, OrderedList,
    TaskState,
};
use crate::error::{Warning, WarningKind};
use crate::scanners;
use crate::strings;

/// The result of parsing a document: the tree plus any recoverable diagnostics collected along
/// the way.
pub struct ParseOutcome {
    pub document: Document,
    pub warnings: Vec<Warning>,
}

pub fn parse(source: &str) -> ParseOutcome {
    let normalized = strings::normalize_source(source);
    let lines: Vec<String> = strings::split_lines(&normalized)
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut warnings = Vec::new();
    let blocks = parse_blocks(&lines, &mut warnings);

    let mut footnotes = HashMap::new();
    collect_footnotes(&blocks, &mut footnotes);

    ParseOutcome {
        document: Document { blocks, footnotes },
        warnings,
    }
}

fn collect_footnotes(blocks: &[Block], out: &mut HashMap<String, FootnoteDefinition>) {
    for block in blocks {
        match block {
            Block::FootnoteDefinition(def) => {
                collect_footnotes(&def.children, out);
                out.insert(def.label.clone(), def.clone());
            }
            Block::BlockQuote(children) => collect_footnotes(children, out),
            Block::BulletList(list) => {
                for item in &list.items {
                    collect_footnotes(&item.children, out);
                }
            }
            Block::OrderedList(list) => {
                for item in &list.items {
                    collect_footnotes(&item.children, out);
                }
            }
            _ => {}
        }
    }
}

fn is_blank(line: &str) -> bool {
    strings::trim(line).is_empty()
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Parses one container's worth of lines (the whole document, or a blockquote's/list item's
/// content with its prefix already stripped) into a sequence of blocks.
fn parse_blocks(lines: &[String], warnings: &mut Vec<Warning>) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if is_blank(&lines[i]) {
            i += 1;
            continue;
        }

        let line = lines[i].as_str();
        let indent = leading_spaces(line);

        if indent >= 4 {
            let (block, next) = parse_indented_code(lines, i);
            blocks.push(block);
            i = next;
            continue;
        }

        if let Some((level, off)) = scanners::atx_heading_start(&line[indent..]) {
            let raw = &line[indent + off..];
            let content = scanners::strip_atx_closing_sequence(raw);
            blocks.push(Block::Heading(Heading {
                level,
                content: inlines::parse_inlines(content),
            }));
            i += 1;
            continue;
        }

        if scanners::thematic_break(line) {
            blocks.push(Block::ThematicBreak);
            i += 1;
            continue;
        }

        if let Some((fence_char, fence_len, info)) = scanners::open_code_fence(line) {
            let info = info.to_string();
            let (block, next) = parse_fenced_code(lines, i, fence_char, fence_len, &info, indent, warnings);
            blocks.push(block);
            i = next;
            continue;
        }

        if scanners::block_quote_start(line).is_some() {
            let (block, next) = parse_block_quote(lines, i, warnings);
            blocks.push(block);
            i = next;
            continue;
        }

        if scanners::bullet_list_marker(line).is_some() {
            let (block, next) = parse_bullet_list(lines, i, warnings);
            blocks.push(block);
            i = next;
            continue;
        }

        if scanners::ordered_list_marker(line).is_some() {
            let (block, next) = parse_ordered_list(lines, i, warnings);
            blocks.push(block);
            i = next;
            continue;
        }

        if let Some((label, off)) = scanners::footnote_definition_start(line) {
            let label = label.to_string();
            let (block, next) = parse_footnote_definition(lines, i, &label, off, warnings);
            blocks.push(block);
            i = next;
            continue;
        }

        if let Some((block, next)) = try_parse_table(lines, i, warnings) {
            blocks.push(block);
            i = next;
            continue;
        }

        let (block, next) = parse_paragraph(lines, i);
        blocks.push(block);
        i = next;
    }

    blocks
}

fn parse_indented_code(lines: &[String], start: usize) -> (Block, usize) {
    let mut collected = Vec::new();
    let mut i = start;
    let mut trailing_blanks = 0;

    while i < lines.len() {
        let line = &lines[i];
        if is_blank(line) {
            trailing_blanks += 1;
            i += 1;
            continue;
        }
        match scanners::indented_code_line(line) {
            Some(content) => {
                for _ in 0..trailing_blanks {
                    collected.push(String::new());
                }
                trailing_blanks = 0;
                collected.push(content.to_string());
                i += 1;
            }
            None => break,
        }
    }

    i -= trailing_blanks;
    let literal = collected.join("\n");
    (
        Block::CodeBlock(CodeBlock {
            info: String::new(),
            literal,
        }),
        i,
    )
}

fn parse_fenced_code(
    lines: &[String],
    start: usize,
    fence_char: u8,
    fence_len: usize,
    info: &str,
    fence_indent: usize,
    warnings: &mut Vec<Warning>,
) -> (Block, usize) {
    let mut collected = Vec::new();
    let mut i = start + 1;
    let mut closed = false;

    while i < lines.len() {
        if scanners::close_code_fence(&lines[i], fence_char, fence_len) {
            closed = true;
            i += 1;
            break;
        }
        collected.push(strip_up_to(&lines[i], fence_indent));
        i += 1;
    }

    if !closed {
        warnings.push(Warning::new(
            WarningKind::UnterminatedCodeFence,
            Some((start + 1) as u32),
            format!("code fence opened at line {} was never closed", start + 1),
        ));
    }

    let literal = collected.join("\n");
    (
        Block::CodeBlock(CodeBlock {
            info: info.to_string(),
            literal,
        }),
        i,
    )
}

fn strip_up_to(line: &str, n: usize) -> String {
    let actual = leading_spaces(line).min(n);
    line[actual..].to_string()
}

fn parse_block_quote(lines: &[String], start: usize, warnings: &mut Vec<Warning>) -> (Block, usize) {
    let mut inner = Vec::new();
    let mut i = start;
    let mut last_had_marker = false;

    while i < lines.len() {
        let line = &lines[i];
        if is_blank(line) {
            break;
        }
        if let Some(off) = scanners::block_quote_start(line) {
            inner.push(line[off..].to_string());
            last_had_marker = true;
            i += 1;
        } else if last_had_marker {
            inner.push(line.clone());
            i += 1;
        } else {
            break;
        }
    }

    let children = parse_blocks(&inner, warnings);
    (Block::BlockQuote(children), i)
}

/// Gathers continuation lines for a list item or footnote definition starting at `start`: blank
/// lines are buffered and only committed if a further indented line follows, and lines indented
/// at least `content_indent` have that much stripped and continue the item.
fn gather_continuation_lines(lines: &[String], start: usize, content_indent: usize) -> (Vec<String>, usize) {
    let mut collected = Vec::new();
    let mut i = start;
    let mut trailing_blanks = 0;

    while i < lines.len() {
        let line = &lines[i];
        if is_blank(line) {
            trailing_blanks += 1;
            i += 1;
            continue;
        }
        if leading_spaces(line) >= content_indent {
            for _ in 0..trailing_blanks {
                collected.push(String::new());
            }
            trailing_blanks = 0;
            collected.push(line[content_indent.min(line.len())..].to_string());
            i += 1;
        } else {
            i -= trailing_blanks;
            return (collected, i);
        }
    }

    i -= trailing_blanks;
    (collected, i)
}

fn parse_bullet_list(lines: &[String], start: usize, warnings: &mut Vec<Warning>) -> (Block, usize) {
    let mut items = Vec::new();
    let mut i = start;

    loop {
        if i >= lines.len() {
            break;
        }
        let Some((_, off)) = scanners::bullet_list_marker(&lines[i]) else {
            break;
        };
        let content_indent = off;
        let mut item_lines = vec![lines[i][off..].to_string()];
        let (cont, next_i) = gather_continuation_lines(lines, i + 1, content_indent);
        item_lines.extend(cont);
        i = next_i;

        let mut task = TaskState::None;
        if let Some((checked, toff)) = scanners::task_marker(&item_lines[0]) {
            task = if checked { TaskState::Checked } else { TaskState::Unchecked };
            item_lines[0] = item_lines[0][toff..].to_string();
        }

        let children = parse_blocks(&item_lines, warnings);
        items.push(ListItem { task, children });
    }

    (Block::BulletList(BulletList { items }), i)
}

fn parse_ordered_list(lines: &[String], start: usize, warnings: &mut Vec<Warning>) -> (Block, usize) {
    let mut items = Vec::new();
    let mut i = start;
    let mut list_start = 1u64;
    let mut first = true;

    loop {
        if i >= lines.len() {
            break;
        }
        let Some((num, _delim, off)) = scanners::ordered_list_marker(&lines[i]) else {
            break;
        };
        if first {
            list_start = num;
            first = false;
        }
        let content_indent = off;
        let mut item_lines = vec![lines[i][off..].to_string()];
        let (cont, next_i) = gather_continuation_lines(lines, i + 1, content_indent);
        item_lines.extend(cont);
        i = next_i;

        let children = parse_blocks(&item_lines, warnings);
        items.push(ListItem {
            task: TaskState::None,
            children,
        });
    }

    (
        Block::OrderedList(OrderedList {
            start: list_start,
            items,
        }),
        i,
    )
}

fn parse_footnote_definition(
    lines: &[String],
    start: usize,
    label: &str,
    off: usize,
    warnings: &mut Vec<Warning>,
) -> (Block, usize) {
    let mut def_lines = vec![lines[start][off..].to_string()];
    let (cont, next_i) = gather_continuation_lines(lines, start + 1, 4);
    def_lines.extend(cont);

    let children = parse_blocks(&def_lines, warnings);
    (
        Block::FootnoteDefinition(FootnoteDefinition {
            label: label.to_string(),
            children,
        }),
        next_i,
    )
}

fn try_parse_table(lines: &[String], start: usize, warnings: &mut Vec<Warning>) -> Option<(Block, usize)> {
    if start + 1 >= lines.len() {
        return None;
    }
    let header_line = &lines[start];
    let alignments = scanners::table_alignment_row(&lines[start + 1])?;

    let mut i = start + 2;
    let mut body_lines = Vec::new();
    while i < lines.len() && !is_blank(&lines[i]) {
        body_lines.push(lines[i].clone());
        i += 1;
    }

    let header_cell_count = scanners::split_table_row(strings::trim(header_line)).len();
    if header_cell_count != alignments.len() {
        warnings.push(Warning::new(
            WarningKind::MalformedTable,
            Some((start + 1) as u32),
            format!(
                "table header has {} cell(s) but the alignment row declares {}; padding/truncating to match",
                header_cell_count,
                alignments.len()
            ),
        ));
    }

    let table = table::build_table(header_line, alignments, &body_lines);
    Some((Block::Table(table), i))
}

fn parse_paragraph(lines: &[String], start: usize) -> (Block, usize) {
    let mut raw_lines: Vec<String> = vec![lines[start].clone()];
    let mut i = start + 1;

    loop {
        if i >= lines.len() {
            break;
        }
        let line = &lines[i];
        if is_blank(line) {
            break;
        }
        if let Some(level) = scanners::setext_heading_line(line) {
            let content = join_paragraph_lines(&raw_lines);
            return (
                Block::Heading(Heading {
                    level,
                    content: inlines::parse_inlines(&content),
                }),
                i + 1,
            );
        }
        if interrupts_paragraph(line) {
            break;
        }
        raw_lines.push(line.clone());
        i += 1;
    }

    let content = join_paragraph_lines(&raw_lines);
    (Block::Paragraph(inlines::parse_inlines(&content)), i)
}

fn interrupts_paragraph(line: &str) -> bool {
    let indent = leading_spaces(line);
    (indent < 4 && scanners::atx_heading_start(&line[indent..]).is_some())
        || scanners::thematic_break(line)
        || scanners::open_code_fence(line).is_some()
        || scanners::block_quote_start(line).is_some()
        || scanners::bullet_list_marker(line).is_some()
        || scanners::ordered_list_marker(line).is_some()
        || scanners::footnote_definition_start(line).is_some()
}

fn join_paragraph_lines(raw_lines: &[String]) -> String {
    raw_lines
        .iter()
        .map(|l| l.trim_start_matches(' '))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Alignment, Inline};

    fn blocks_of(src: &str) -> Vec<Block> {
        parse(src).document.blocks
    }

    #[test]
    fn heading_and_paragraph() {
        let blocks = blocks_of("# Title\n\nHello world.\n");
        assert!(matches!(&blocks[0], Block::Heading(h) if h.level == 1));
        assert!(matches!(&blocks[1], Block::Paragraph(_)));
    }

    #[test]
    fn setext_heading_promotes_paragraph() {
        let blocks = blocks_of("Title\n=====\n\nbody\n");
        match &blocks[0] {
            Block::Heading(h) => assert_eq!(h.level, 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn thematic_break_not_confused_with_setext_at_top_level() {
        let blocks = blocks_of("---\n");
        assert!(matches!(blocks[0], Block::ThematicBreak));
    }

    #[test]
    fn dash_setext_heading_is_not_mistaken_for_a_table() {
        let blocks = blocks_of("Title\n---\n");
        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            Block::Heading(h) => assert_eq!(h.level, 2),
            other => panic!("unexpected {other:?}"),
        }

        let blocks = blocks_of("Title\n-\n");
        match &blocks[0] {
            Block::Heading(h) => assert_eq!(h.level, 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn fenced_code_block() {
        let blocks = blocks_of("```rust\nfn main() {}\n```\n");
        match &blocks[0] {
            Block::CodeBlock(c) => {
                assert_eq!(c.info, "rust");
                assert_eq!(c.literal, "fn main() {}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unterminated_fence_warns() {
        let outcome = parse("```rust\nfn main() {}\n");
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].kind, WarningKind::UnterminatedCodeFence);
    }

    #[test]
    fn blockquote_nesting() {
        let blocks = blocks_of("> outer\n> > inner\n");
        match &blocks[0] {
            Block::BlockQuote(children) => match &children[1] {
                Block::BlockQuote(_) => {}
                other => panic!("expected nested quote, got {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bullet_list_with_task_markers() {
        let blocks = blocks_of("- [x] done\n- [ ] todo\n- plain\n");
        match &blocks[0] {
            Block::BulletList(list) => {
                assert_eq!(list.items.len(), 3);
                assert_eq!(list.items[0].task, TaskState::Checked);
                assert_eq!(list.items[1].task, TaskState::Unchecked);
                assert_eq!(list.items[2].task, TaskState::None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn ordered_list_start_number() {
        let blocks = blocks_of("5. five\n6. six\n");
        match &blocks[0] {
            Block::OrderedList(list) => {
                assert_eq!(list.start, 5);
                assert_eq!(list.items.len(), 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn footnote_definition_collected() {
        let outcome = parse("see[^a].\n\n[^a]: the note\n");
        assert!(outcome.document.footnotes.contains_key("a"));
        match &outcome.document.blocks[0] {
            Block::Paragraph(inlines) => {
                assert!(inlines.iter().any(|n| matches!(n, Inline::FootnoteReference(l) if l == "a")));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn table_with_alignment() {
        let blocks = blocks_of("a|b\n-|-:\n1|2\n");
        match &blocks[0] {
            Block::Table(t) => {
                assert_eq!(&t.alignments[..], [Alignment::Default, Alignment::Right]);
                assert_eq!(t.header.len(), 2);
                assert_eq!(t.rows.len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn malformed_table_shape_warns_and_pads() {
        let outcome = parse("a|b|c\n-|-\n1|2\n");
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::MalformedTable));
        match &outcome.document.blocks[0] {
            Block::Table(t) => assert_eq!(t.header.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }
}

//! The Markdown document tree produced by the parser and consumed by the renderer.
//!
//! Unlike an arena-of-nodes representation, this tree is plain owned data: a `Document` is a
//! `Vec<Block>`, and every block that can nest holds its children directly. Back-references
//! (a footnote reference pointing at its definition) are resolved by label lookup in a table
//! built once after parsing, not by an in-tree pointer, so the tree carries no cycles and no
//! shared mutable state.

use std::collections::HashMap;

use smallvec::SmallVec;

/// A complete parsed document: an ordered sequence of top-level blocks, plus the collected
/// footnote definitions referenced from anywhere in the tree by label.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Top-level blocks in source order. `FootnoteDefinition` blocks are *not* duplicated here
    /// and in `footnotes`; a definition appears in `blocks` at its point of occurrence and is
    /// also indexed in `footnotes` for reference resolution.
    pub blocks: Vec<Block>,

    /// Footnote definitions keyed by label, for O(1) reference resolution during rendering.
    pub footnotes: HashMap<String, FootnoteDefinition>,
}

/// A block-level node. Every variant is either a leaf or contains further blocks/inlines.
#[derive(Debug, Clone)]
pub enum Block {
    /// An ATX or setext heading. Setext headings are normalized to `level` 1 or 2.
    Heading(Heading),

    /// A paragraph of inline content.
    Paragraph(Vec<Inline>),

    /// A bullet (unordered) list.
    BulletList(BulletList),

    /// An ordered list, numbered starting at `start`.
    OrderedList(OrderedList),

    /// A fenced or indented code block. `literal` preserves the source lines verbatim,
    /// newline-delimited, with no trailing-newline trimming beyond what the parser collected.
    CodeBlock(CodeBlock),

    /// A block quote; nests arbitrarily by repeating `>` markers.
    BlockQuote(Vec<Block>),

    /// A GitHub-flavored Markdown table.
    Table(Table),

    /// A thematic break (`---`, `***`, `___`).
    ThematicBreak,

    /// A footnote definition. Rendered out-of-line from its point of occurrence; see
    /// [`Document::footnotes`].
    FootnoteDefinition(FootnoteDefinition),
}

/// A heading block.
#[derive(Debug, Clone)]
pub struct Heading {
    /// 1 through 6. Headings of level 7+ never occur; a source line of seven or more `#`
    /// characters is parsed as a paragraph instead (see [`crate::scanners::atx_heading_start`]).
    pub level: u8,
    pub content: Vec<Inline>,
}

#[derive(Debug, Clone)]
pub struct BulletList {
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone)]
pub struct OrderedList {
    /// The ordinal the list starts at, taken from the first item marker.
    pub start: u64,
    pub items: Vec<ListItem>,
}

/// A single list item. `task` is only ever non-[`TaskState::None`] for items that began with
/// a `[ ]`/`[x]`/`[X]` marker; per the data model this only happens inside bullet lists, since
/// ordered-list markers have no room for a task checkbox in the recognized grammar.
#[derive(Debug, Clone)]
pub struct ListItem {
    pub task: TaskState,
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    None,
    Unchecked,
    Checked,
}

#[derive(Debug, Clone)]
pub struct CodeBlock {
    /// The fence info-string, or the empty string for indented code blocks and bare fences.
    pub info: String,
    /// Literal source lines, newline-delimited, not parsed as Markdown.
    pub literal: String,
}

#[derive(Debug, Clone)]
pub struct Table {
    /// Most Markdown tables have a handful of columns; inlining up to 4 avoids a heap
    /// allocation for the common case.
    pub alignments: SmallVec<[Alignment; 4]>,
    pub header: Vec<Vec<Inline>>,
    pub rows: Vec<Vec<Vec<Inline>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Default,
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone)]
pub struct FootnoteDefinition {
    pub label: String,
    pub children: Vec<Block>,
}

/// An inline-level node. Sequences of these make up the content of any block that carries
/// "inline content" (paragraphs, headings, list items, table cells).
#[derive(Debug, Clone)]
pub enum Inline {
    Text(String),
    Emphasis(Emphasis),
    Strikethrough(Vec<Inline>),
    InlineCode(String),
    Link(Link),
    Image(Image),
    FootnoteReference(String),
    HardBreak,
    SoftBreak,
}

#[derive(Debug, Clone)]
pub struct Emphasis {
    pub kind: EmphasisKind,
    pub children: Vec<Inline>,
}

/// Emphasis composes: italic nested inside bold (or vice versa) becomes `BoldItalic`, never a
/// nested pair of single-kind emphasis nodes. See [`crate::parser::inlines`] for how the
/// delimiter stack produces this directly, and [`crate::render::inline`] for how a capability
/// set re-derives it when overlays compose during rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmphasisKind {
    Italic,
    Bold,
    BoldItalic,
}

#[derive(Debug, Clone)]
pub struct Link {
    pub href: String,
    pub title: Option<String>,
    pub children: Vec<Inline>,
}

#[derive(Debug, Clone)]
pub struct Image {
    pub src: String,
    pub title: Option<String>,
    pub alt: String,
}

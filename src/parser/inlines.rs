//! Inline content scanning: emphasis, strikethrough, code spans, links, images, autolinks,
//! footnote references, and line breaks.
//!
//! Rather than a full CommonMark delimiter-stack with run-length bookkeeping across multiple
//! partial matches, emphasis and strikethrough here use a forward search for an exact-length,
//! correctly-flanked closing run, recursing on the text found between. This covers the
//! grammar's stated scope (§4.2) — ordinary, non-adversarial Markdown — without the
//! substantial extra complexity the general algorithm needs for pathological delimiter
//! mixtures. A delimiter that never finds a partner becomes literal text directly, which is
//! exactly the documented edge policy.

use crate::ast::{Emphasis, EmphasisKind, Image, Inline, Link};
use crate::ctype::ispunct;

pub fn parse_inlines(text: &str) -> Vec<Inline> {
    let mut parser = InlineParser {
        chars: text.chars().collect(),
        pos: 0,
        nodes: Vec::new(),
        pending: String::new(),
    };
    parser.run()
}

struct InlineParser {
    chars: Vec<char>,
    pos: usize,
    nodes: Vec<Inline>,
    pending: String,
}

impl InlineParser {
    fn run(&mut self) -> Vec<Inline> {
        while self.pos < self.chars.len() {
            match self.chars[self.pos] {
                '\\' => self.scan_backslash_escape(),
                '`' => self.scan_code_span(),
                '~' if self.chars.get(self.pos + 1) == Some(&'~') => self.scan_strikethrough(),
                '!' if self.chars.get(self.pos + 1) == Some(&'[') => self.scan_image(),
                '[' => self.scan_bracket(),
                '<' => self.scan_autolink(),
                '*' | '_' => self.scan_emphasis_delim(),
                '\n' => self.scan_line_break(),
                c => {
                    self.pending.push(c);
                    self.pos += 1;
                }
            }
        }
        self.flush_pending();
        std::mem::take(&mut self.nodes)
    }

    fn flush_pending(&mut self) {
        if !self.pending.is_empty() {
            self.nodes.push(Inline::Text(std::mem::take(&mut self.pending)));
        }
    }

    fn scan_backslash_escape(&mut self) {
        if let Some(&next) = self.chars.get(self.pos + 1) {
            if is_ascii_punct_char(next) {
                self.pending.push(next);
                self.pos += 2;
                return;
            }
        }
        self.pending.push('\\');
        self.pos += 1;
    }

    fn scan_line_break(&mut self) {
        let trailing_spaces = self.pending.chars().rev().take_while(|&c| c == ' ').count();
        if trailing_spaces > 0 {
            self.pending.truncate(self.pending.len() - trailing_spaces);
        }
        self.flush_pending();
        if trailing_spaces >= 2 {
            self.nodes.push(Inline::HardBreak);
        } else {
            self.nodes.push(Inline::SoftBreak);
        }
        self.pos += 1;
        while self.pos < self.chars.len() && self.chars[self.pos] == ' ' {
            self.pos += 1;
        }
    }

    fn scan_code_span(&mut self) {
        let start = self.pos;
        let mut run = 0;
        while self.pos < self.chars.len() && self.chars[self.pos] == '`' {
            self.pos += 1;
            run += 1;
        }
        if let Some(close_start) = self.find_backtick_run(self.pos, run) {
            let content: String = self.chars[self.pos..close_start].iter().collect();
            self.flush_pending();
            self.nodes.push(Inline::InlineCode(normalize_code_span(&content)));
            self.pos = close_start + run;
        } else {
            self.pending.extend(self.chars[start..self.pos].iter());
        }
    }

    fn find_backtick_run(&self, from: usize, len: usize) -> Option<usize> {
        let mut i = from;
        while i < self.chars.len() {
            if self.chars[i] == '`' {
                let run_start = i;
                let mut run_len = 0;
                while i < self.chars.len() && self.chars[i] == '`' {
                    i += 1;
                    run_len += 1;
                }
                if run_len == len {
                    return Some(run_start);
                }
            } else {
                i += 1;
            }
        }
        None
    }

    fn scan_strikethrough(&mut self) {
        if let Some(end) = self.find_strike_close(self.pos + 2) {
            let content: String = self.chars[self.pos + 2..end].iter().collect();
            let children = parse_inlines(&content);
            self.flush_pending();
            self.nodes.push(Inline::Strikethrough(children));
            self.pos = end + 2;
        } else {
            self.pending.push('~');
            self.pending.push('~');
            self.pos += 2;
        }
    }

    fn find_strike_close(&self, from: usize) -> Option<usize> {
        let mut i = from;
        while i + 1 < self.chars.len() {
            if self.chars[i] == '~' && self.chars[i + 1] == '~' {
                return Some(i);
            }
            i += 1;
        }
        None
    }

    fn scan_emphasis_delim(&mut self) {
        let marker = self.chars[self.pos];
        let start = self.pos;
        let mut run_len = 0;
        while self.pos < self.chars.len() && self.chars[self.pos] == marker {
            self.pos += 1;
            run_len += 1;
        }
        if run_len > 3 {
            for _ in 0..run_len {
                self.pending.push(marker);
            }
            return;
        }

        let prev = if start == 0 { None } else { Some(self.chars[start - 1]) };
        let next = self.chars.get(self.pos).copied();
        let left_flanking = next.map_or(false, |c| !c.is_whitespace());
        let intraword_guard = marker != '_' || prev.map_or(true, |c| !c.is_alphanumeric());
        let can_open = left_flanking && intraword_guard;

        if can_open {
            if let Some(content_end) = self.find_closing_emphasis_run(self.pos, marker, run_len) {
                let content: String = self.chars[self.pos..content_end].iter().collect();
                let children = parse_inlines(&content);
                let kind = match run_len {
                    1 => EmphasisKind::Italic,
                    2 => EmphasisKind::Bold,
                    _ => EmphasisKind::BoldItalic,
                };
                self.flush_pending();
                self.nodes.push(Inline::Emphasis(Emphasis { kind, children }));
                self.pos = content_end + run_len;
                return;
            }
        }

        for _ in 0..run_len {
            self.pending.push(marker);
        }
    }

    fn find_closing_emphasis_run(&self, from: usize, marker: char, len: usize) -> Option<usize> {
        let mut i = from;
        while i < self.chars.len() {
            if self.chars[i] == marker {
                let run_start = i;
                let mut run_len = 0;
                while i < self.chars.len() && self.chars[i] == marker {
                    i += 1;
                    run_len += 1;
                }
                if run_len == len {
                    let right_flanking = run_start > 0 && !self.chars[run_start - 1].is_whitespace();
                    let next = self.chars.get(i).copied();
                    let intraword_guard = marker != '_' || next.map_or(true, |c| !c.is_alphanumeric());
                    if right_flanking && intraword_guard {
                        return Some(run_start);
                    }
                }
            } else {
                i += 1;
            }
        }
        None
    }

    fn scan_bracket(&mut self) {
        if self.chars.get(self.pos + 1) == Some(&'^') {
            if let Some(end) = self.find_unescaped(']', self.pos + 2) {
                let label: String = self.chars[self.pos + 2..end].iter().collect();
                if !label.is_empty() && !label.chars().any(|c| c.is_whitespace()) {
                    self.flush_pending();
                    self.nodes.push(Inline::FootnoteReference(label));
                    self.pos = end + 1;
                    return;
                }
            }
        } else if let Some(end) = self.find_unescaped(']', self.pos + 1) {
            if self.chars.get(end + 1) == Some(&'(') {
                if let Some((href, title, close_paren)) = self.parse_link_destination(end + 2) {
                    let text: String = self.chars[self.pos + 1..end].iter().collect();
                    self.flush_pending();
                    let children = parse_inlines(&text);
                    self.nodes.push(Inline::Link(Link { href, title, children }));
                    self.pos = close_paren + 1;
                    return;
                }
            }
        }

        self.pending.push('[');
        self.pos += 1;
    }

    fn scan_image(&mut self) {
        if let Some(end) = self.find_unescaped(']', self.pos + 2) {
            if self.chars.get(end + 1) == Some(&'(') {
                if let Some((src, title, close_paren)) = self.parse_link_destination(end + 2) {
                    let raw_alt: String = self.chars[self.pos + 2..end].iter().collect();
                    let alt = crate::strings::normalize_whitespace(&raw_alt);
                    self.flush_pending();
                    self.nodes.push(Inline::Image(Image { src, title, alt }));
                    self.pos = close_paren + 1;
                    return;
                }
            }
        }

        self.pending.push('!');
        self.pos += 1;
    }

    fn scan_autolink(&mut self) {
        if let Some(end) = self.find_unescaped('>', self.pos + 1) {
            let content: String = self.chars[self.pos + 1..end].iter().collect();
            if is_plausible_autolink(&content) {
                self.flush_pending();
                self.nodes.push(Inline::Link(Link {
                    href: content.clone(),
                    title: None,
                    children: vec![Inline::Text(content)],
                }));
                self.pos = end + 1;
                return;
            }
        }

        self.pending.push('<');
        self.pos += 1;
    }

    fn find_unescaped(&self, target: char, from: usize) -> Option<usize> {
        let mut i = from;
        while i < self.chars.len() {
            if self.chars[i] == '\\' && i + 1 < self.chars.len() {
                i += 2;
                continue;
            }
            if self.chars[i] == target {
                return Some(i);
            }
            i += 1;
        }
        None
    }

    /// Parses `<ws>* url <ws>* ("title")? <ws>* )` starting right after the opening `(`.
    /// Returns the href, optional title, and the index of the closing `)`.
    fn parse_link_destination(&self, mut i: usize) -> Option<(String, Option<String>, usize)> {
        let len = self.chars.len();
        while i < len && self.chars[i] == ' ' {
            i += 1;
        }
        let url_start = i;
        while i < len && self.chars[i] != ' ' && self.chars[i] != ')' {
            i += 1;
        }
        let href: String = self.chars[url_start..i].iter().collect();
        while i < len && self.chars[i] == ' ' {
            i += 1;
        }

        let mut title = None;
        if i < len && self.chars[i] == '"' {
            let title_start = i + 1;
            let title_end = self.find_unescaped('"', title_start)?;
            let raw: String = self.chars[title_start..title_end].iter().collect();
            title = Some(crate::strings::normalize_whitespace(&raw));
            i = title_end + 1;
            while i < len && self.chars[i] == ' ' {
                i += 1;
            }
        }

        if i < len && self.chars[i] == ')' {
            Some((href, title, i))
        } else {
            None
        }
    }
}

fn is_ascii_punct_char(c: char) -> bool {
    (c as u32) < 128 && ispunct(c as u8)
}

fn is_plausible_autolink(s: &str) -> bool {
    if s.is_empty() || s.chars().any(|c| c.is_whitespace() || c == '<') {
        return false;
    }
    match s.find(':') {
        Some(idx) if idx > 0 => {
            let scheme = &s[..idx];
            scheme.chars().next().map_or(false, |c| c.is_ascii_alphabetic())
                && scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        }
        _ => false,
    }
}

fn normalize_code_span(s: &str) -> String {
    let replaced: String = s.chars().map(|c| if c == '\n' { ' ' } else { c }).collect();
    if replaced.len() >= 2
        && replaced.starts_with(' ')
        && replaced.ends_with(' ')
        && !replaced.trim().is_empty()
    {
        replaced[1..replaced.len() - 1].to_string()
    } else {
        replaced
    }
}

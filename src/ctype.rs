//! Byte/char classification used throughout the scanners and parsers. Table-driven rather than
//! a chain of range comparisons, matching the classic CommonMark reference implementation's
//! approach.

#[rustfmt::skip]
const CTYPE_CLASS: [u8; 256] = [
    /*      0  1  2  3  4  5  6  7  8  9  a  b  c  d  e  f */
    /* 0 */ 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 1, 0, 0,
    /* 1 */ 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    /* 2 */ 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
    /* 3 */ 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 2, 2, 2, 2, 2, 2,
    /* 4 */ 2, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4,
    /* 5 */ 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 2, 2, 2, 2, 2,
    /* 6 */ 2, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4,
    /* 7 */ 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 2, 2, 2, 2, 0,
    /* 8 */ 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    /* 9 */ 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    /* a */ 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    /* b */ 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    /* c */ 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    /* d */ 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    /* e */ 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    /* f */ 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

pub fn isspace(ch: u8) -> bool {
    CTYPE_CLASS[ch as usize] == 1
}

pub fn ispunct(ch: u8) -> bool {
    CTYPE_CLASS[ch as usize] == 2
}

pub fn isdigit(ch: u8) -> bool {
    CTYPE_CLASS[ch as usize] == 3
}

pub fn isalpha(ch: u8) -> bool {
    CTYPE_CLASS[ch as usize] == 4
}

pub fn isalnum(ch: u8) -> bool {
    matches!(CTYPE_CLASS[ch as usize], 3 | 4)
}

/// Unicode-aware whitespace/punctuation classification for delimiter flanking rules (CommonMark
/// emphasis needs this beyond ASCII). ASCII bytes are resolved via the table above; everything
/// else defers to `unicode_categories`, matching the corpus's split between a fast ASCII table
/// and a general Unicode fallback.
pub fn is_unicode_whitespace(ch: char) -> bool {
    if (ch as u32) < 128 {
        isspace(ch as u8)
    } else {
        ch.is_whitespace()
    }
}

pub fn is_unicode_punctuation(ch: char) -> bool {
    use unicode_categories::UnicodeCategories;
    if (ch as u32) < 128 {
        ispunct(ch as u8)
    } else {
        ch.is_punctuation() || ch.is_symbol()
    }
}

//! Error types and the warnings side channel returned alongside a successful conversion.

use std::fmt;

/// Everything that can stop a conversion outright. Anything recoverable (malformed table
/// shapes, unresolved footnote references, an unterminated fence) is not an error: it is
/// handled locally per the parser/renderer recovery policies and reported, if at all, as a
/// [`Warning`].
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// An unknown style preset name, or an unrecognized `ConvertOptions` key reaching the
    /// core from a stringly-typed boundary (CLI, HTTP).
    #[error("config error: {0}")]
    ConfigError(String),

    /// The input bytes are not valid UTF-8.
    #[error("encoding error: {0}")]
    EncodingError(#[from] std::str::Utf8Error),

    /// An invariant the renderer or packager assumed was violated. Should not occur on
    /// well-formed AST; indicates a bug in this crate rather than a malformed input document.
    #[error("internal error: {0}")]
    InternalError(String),
}

/// The kind of a recoverable diagnostic, distinguishing warnings a caller may want to
/// surface differently (e.g. "this document used a feature we degraded gracefully" vs.
/// "this document referenced something that doesn't exist").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    MalformedTable,
    UnresolvedFootnoteReference,
    UnreferencedFootnoteDefinition,
    UnterminatedCodeFence,
    UnresolvedEmphasis,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WarningKind::MalformedTable => "malformed-table",
            WarningKind::UnresolvedFootnoteReference => "unresolved-footnote-reference",
            WarningKind::UnreferencedFootnoteDefinition => "unreferenced-footnote-definition",
            WarningKind::UnterminatedCodeFence => "unterminated-code-fence",
            WarningKind::UnresolvedEmphasis => "unresolved-emphasis",
        };
        f.write_str(s)
    }
}

/// A single recoverable diagnostic produced while converting a document. The core never logs;
/// these accumulate on a `Vec<Warning>` returned alongside the produced bytes.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    /// 1-based source line, when the condition can be attributed to one.
    pub line: Option<u32>,
    pub message: String,
}

impl Warning {
    pub(crate) fn new(kind: WarningKind, line: Option<u32>, message: impl Into<String>) -> Self {
        Warning {
            kind,
            line,
            message: message.into(),
        }
    }
}

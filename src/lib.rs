//! `md2hwpx` converts CommonMark-flavored Markdown into HWPX (OWPML/KS X 6101) word-processor
//! documents.
//!
//! The pipeline is a straight line: [`parser`] turns source text into a [`Document`] AST,
//! [`style`] resolves a named preset into a fixed palette of property IDs, [`render`] walks the
//! AST into `section0.xml` using that palette (delegating table layout to [`render::table`]),
//! and [`package`] zips the result into a `.hwpx` archive. [`convert`] wires the four stages
//! together behind one call.
//!
//! ```
//! use md2hwpx::{convert, ConvertOptions};
//!
//! let result = convert(b"# Hello\n\nWorld.\n", "default", ConvertOptions::default()).unwrap();
//! assert!(!result.bytes.is_empty());
//! ```

pub mod ast;
pub mod ctype;
pub mod error;
pub mod package;
pub mod parser;
pub mod render;
pub mod scanners;
pub mod strings;
pub mod style;
pub mod xmltree;

mod convert;

#[cfg(test)]
mod tests;

pub use ast::Document;
pub use convert::{convert, ConvertOptions, ConvertResult, ImageResolver};
pub use error::{ConversionError, Warning, WarningKind};

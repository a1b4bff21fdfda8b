//! # Blockdown Core
//!
//! Converts between line-oriented markdown and the flat list of typed
//! content blocks used by a knowledge-graph store.
//!
//! The block vocabulary is small: headings, fenced code, horizontal
//! rules, and text lines (paragraphs, list items, quotes) carrying bold
//! and italic spans. Markdown outside that vocabulary degrades to a
//! plain paragraph, and parsing never fails.
//!
//! ## Quick Start
//!
//! ```rust
//! use blockdown_core::{parse, render, Block};
//!
//! let input = "# Hello World\n\nThis is a **paragraph**.";
//! let blocks = parse(input);
//! assert_eq!(blocks.len(), 2);
//! assert!(matches!(blocks[0], Block::Heading(_)));
//!
//! assert_eq!(render(&blocks), input);
//! ```
//!
//! ## Round Trips
//!
//! Rendering normalises: ordered items become `1.` and backtick spans
//! become bold. Reparsing the rendered text gives back the same blocks.
//!
//! ```rust
//! use blockdown_core::roundtrip;
//!
//! let trip = roundtrip("2. two\n3. `three`");
//! assert!(trip.is_equivalent());
//! assert_eq!(trip.rendered, "1. two\n1. **three**");
//! ```
//!
//! ## Store Blocks
//!
//! The [`wire`] module maps blocks to and from the store's JSON records.

pub mod ast;
pub mod error;
pub mod inline;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod span;
pub mod wire;

pub use ast::{Block, CodeBlock, Heading, ListKind, Located, Style, TextLine, TextSpan};
pub use error::WireError;
pub use inline::tokenize;
pub use parser::{parse, parse_located, Parser};
pub use render::{render, render_spans, roundtrip, roundtrip_with, Mismatch, RoundTrip};
pub use span::Span;

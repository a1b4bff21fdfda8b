//! Block segmenter.
//!
//! Walks the document one line at a time. Every line that starts a block
//! is classified afresh ([`Line::classify`]); only fences, quotes and
//! paragraphs look ahead to pull in more lines. Malformed input never
//! fails: anything unrecognised becomes a paragraph.

use tracing::{debug, trace};

use crate::ast::{Block, CodeBlock, Heading, ListKind, Located, TextLine};
use crate::inline::tokenize;
use crate::lexer::{Lexer, Line, LineKind, FENCE};

/// Language recorded for a fence with no info string.
pub const DEFAULT_LANGUAGE: &str = "text";

/// Markdown to block segmenter.
///
/// The parser holds configuration only; each call builds its output
/// from scratch, so one `Parser` can be shared freely.
#[derive(Debug, Clone)]
pub struct Parser {
    default_language: String,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    #[inline]
    pub fn new() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Language used for fences without an info string.
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Parse a document into blocks.
    pub fn parse(&self, input: &str) -> Vec<Block> {
        self.parse_located(input)
            .into_iter()
            .map(Located::into_inner)
            .collect()
    }

    /// Parse a document, keeping the source span of every block.
    ///
    /// A block's span runs from the start of its first line to the end
    /// of the last line it consumed, closing fences included.
    pub fn parse_located(&self, input: &str) -> Vec<Located<Block>> {
        let mut lexer = Lexer::new(input);
        let mut blocks = Vec::with_capacity(16);

        while !lexer.is_eof() {
            lexer.skip_blank_lines();

            if lexer.is_eof() {
                break;
            }

            if let Some(block) = self.parse_block(&mut lexer) {
                trace!(
                    kind = block.node.kind_name(),
                    start = block.span.start,
                    end = block.span.end,
                    "block"
                );
                blocks.push(block);
            }
        }

        debug!(blocks = blocks.len(), bytes = input.len(), "parsed document");
        blocks
    }

    fn parse_block(&self, lexer: &mut Lexer<'_>) -> Option<Located<Block>> {
        let line = lexer.next_line()?;

        let block = match line.classify() {
            LineKind::Blank => return None,
            LineKind::Fence { language } => return Some(self.parse_code_block(lexer, line, language)),
            LineKind::Heading { level, text } => Block::Heading(Heading::new(level, tokenize(text))),
            LineKind::Rule => Block::HorizontalRule,
            LineKind::Quote { text } => return Some(self.parse_quote(lexer, line, text)),
            LineKind::Unordered { text } => {
                Block::TextLine(TextLine::item(ListKind::Unordered, tokenize(text)))
            }
            LineKind::Ordered { text } => {
                Block::TextLine(TextLine::item(ListKind::Ordered, tokenize(text)))
            }
            LineKind::Text { text } => return Some(self.parse_paragraph(lexer, line, text)),
        };

        Some(Located::new(block, line.span))
    }

    /// Everything up to the closing fence is kept verbatim. A missing
    /// close runs the block to the end of input.
    fn parse_code_block(&self, lexer: &mut Lexer<'_>, open: Line<'_>, language: &str) -> Located<Block> {
        let mut end = open.span;
        let mut lines: Vec<&str> = Vec::new();
        let mut closed = false;

        while let Some(line) = lexer.next_line() {
            end = line.span;
            if line.trimmed().starts_with(FENCE) {
                closed = true;
                break;
            }
            lines.push(line.text);
        }

        if !closed {
            debug!(start = open.span.start, "unterminated code fence runs to end of input");
        }

        let language = if language.is_empty() {
            self.default_language.clone()
        } else {
            language.to_string()
        };

        Located::new(
            Block::Code(CodeBlock {
                language,
                raw_text: lines.join("\n"),
            }),
            open.span.merge(end),
        )
    }

    /// Consecutive `>` lines form one quote, joined with `\n`.
    fn parse_quote(&self, lexer: &mut Lexer<'_>, first: Line<'_>, text: &str) -> Located<Block> {
        let mut joined = String::from(text);
        let mut end = first.span;

        while let Some(&line) = lexer.peek_line() {
            let LineKind::Quote { text } = line.classify() else {
                break;
            };
            joined.push('\n');
            joined.push_str(text);
            end = line.span;
            lexer.next_line();
        }

        Located::new(
            Block::TextLine(TextLine::quote(tokenize(&joined))),
            first.span.merge(end),
        )
    }

    /// Plain lines coalesce with single spaces until a blank line or a
    /// line that would open another block.
    fn parse_paragraph(&self, lexer: &mut Lexer<'_>, first: Line<'_>, text: &str) -> Located<Block> {
        let mut joined = String::from(text);
        let mut end = first.span;

        while let Some(&line) = lexer.peek_line() {
            if !line.classify().continues_paragraph() {
                break;
            }
            joined.push(' ');
            joined.push_str(line.trimmed());
            end = line.span;
            lexer.next_line();
        }

        Located::new(
            Block::TextLine(TextLine::paragraph(tokenize(&joined))),
            first.span.merge(end),
        )
    }
}

/// Parse `input` with the default configuration.
///
/// ```rust
/// use blockdown_core::{parse, Block};
///
/// let blocks = parse("# Title\n\nSome *text*.");
/// assert_eq!(blocks.len(), 2);
/// assert!(matches!(blocks[0], Block::Heading(_)));
/// ```
pub fn parse(input: &str) -> Vec<Block> {
    Parser::new().parse(input)
}

/// [`parse`] with source spans.
pub fn parse_located(input: &str) -> Vec<Located<Block>> {
    Parser::new().parse_located(input)
}

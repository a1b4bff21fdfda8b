//! Block and span types produced by the segmenter.
//!
//! The block vocabulary is deliberately small: it is exactly what the
//! knowledge store can hold. Anything markdown expresses beyond it
//! degrades to a plain paragraph during parsing.
//!
//! All nodes own their text. Blocks are built fresh per parse, handed to
//! the wire codec or the renderer, and dropped.

use crate::span::Span;

/// Inline style flags carried by a [`TextSpan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
}

impl Style {
    pub const PLAIN: Style = Style {
        bold: false,
        italic: false,
    };
    pub const BOLD: Style = Style {
        bold: true,
        italic: false,
    };
    pub const ITALIC: Style = Style {
        bold: false,
        italic: true,
    };
    pub const BOLD_ITALIC: Style = Style {
        bold: true,
        italic: true,
    };

    #[inline]
    pub const fn is_plain(self) -> bool {
        !self.bold && !self.italic
    }
}

/// A run of literal text with one style. Markers are already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub text: String,
    pub style: Style,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::PLAIN)
    }
}

/// List flavour of a [`TextLine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// Bulleted item (`-`, `*`, `+`).
    Unordered,
    /// Numbered item (`1.`). The number itself is not kept.
    Ordered,
}

/// Section heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading level, always within 1..=6.
    pub level: u8,
    pub spans: Vec<TextSpan>,
}

impl Heading {
    /// Build a heading, clamping `level` into 1..=6.
    pub fn new(level: u8, spans: Vec<TextSpan>) -> Self {
        Self {
            level: level.clamp(1, 6),
            spans,
        }
    }
}

/// Fenced code. The text is verbatim and never tokenized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: String,
    pub raw_text: String,
}

/// Paragraph, list item or quote.
///
/// List items are not grouped under a parent list: each item is its own
/// sibling block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
    pub list: Option<ListKind>,
    pub is_quote: bool,
}

impl TextLine {
    pub fn paragraph(spans: Vec<TextSpan>) -> Self {
        Self {
            spans,
            ..Self::default()
        }
    }

    pub fn item(kind: ListKind, spans: Vec<TextSpan>) -> Self {
        Self {
            spans,
            list: Some(kind),
            is_quote: false,
        }
    }

    pub fn quote(spans: Vec<TextSpan>) -> Self {
        Self {
            spans,
            list: None,
            is_quote: true,
        }
    }
}

/// One structural unit of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(Heading),
    Code(CodeBlock),
    HorizontalRule,
    TextLine(TextLine),
}

impl Block {
    /// Short name of the block kind, stable across versions.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Block::Heading(_) => "heading",
            Block::Code(_) => "code",
            Block::HorizontalRule => "rule",
            Block::TextLine(t) => match (t.list, t.is_quote) {
                (Some(ListKind::Unordered), _) => "bullet",
                (Some(ListKind::Ordered), _) => "numbered",
                (None, true) => "quote",
                (None, false) => "paragraph",
            },
        }
    }

    /// Styled spans of a text-bearing block; empty for code and rules.
    pub fn spans(&self) -> &[TextSpan] {
        match self {
            Block::Heading(h) => &h.spans,
            Block::TextLine(t) => &t.spans,
            Block::Code(_) | Block::HorizontalRule => &[],
        }
    }

    /// Visible text with all styling dropped.
    ///
    /// Code blocks come back as a fenced snippet so they stay
    /// recognisable in plain-text contexts; rules yield an empty string.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Code(c) => format!("```{}\n{}\n```", c.language, c.raw_text),
            Block::HorizontalRule => String::new(),
            _ => self.spans().iter().map(|s| s.text.as_str()).collect(),
        }
    }
}

/// A node paired with the source span it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Located<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    pub fn into_inner(self) -> T {
        self.node
    }
}

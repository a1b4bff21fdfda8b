//! Block to markdown renderer and round-trip checker.
//!
//! Rendering is the approximate inverse of parsing. Ordered items always
//! come out as `1.`, and backtick spans come back as `**bold**`, so the
//! output is a normalised form of the source rather than a copy of it.

use std::fmt;

use crate::ast::{Block, ListKind, Style, TextSpan};
use crate::lexer::{Lexer, LineKind, FENCE};
use crate::parser::Parser;

/// Rebuild marker pairs around each span and concatenate them.
pub fn render_spans(spans: &[TextSpan]) -> String {
    let mut out = String::with_capacity(spans.iter().map(|s| s.text.len() + 6).sum());
    for span in spans {
        push_span(&mut out, span);
    }
    out
}

fn push_span(out: &mut String, span: &TextSpan) {
    push_marked(out, span, marker(span.style));
}

fn marker(style: Style) -> &'static str {
    match style {
        Style::BOLD_ITALIC => "***",
        Style::BOLD => "**",
        Style::ITALIC => "*",
        _ => "",
    }
}

fn push_marked(out: &mut String, span: &TextSpan, marker: &str) {
    out.push_str(marker);
    out.push_str(&span.text);
    out.push_str(marker);
}

/// Whether `text` would start a paragraph (or continue one) on reparse.
fn is_plain_line(text: &str) -> bool {
    Lexer::new(text)
        .next_line()
        .is_some_and(|line| matches!(line.classify(), LineKind::Text { .. }))
}

/// Render a paragraph so that it reparses as a paragraph.
///
/// Text such as `* x*` or `1. item` would open a list. It is broken after
/// the marker instead, since continuation lines rejoin with one space.
/// With no usable space, a styled first span switches to `_` markers.
fn render_paragraph(spans: &[TextSpan]) -> String {
    let text = render_spans(spans);
    if text.is_empty() || is_plain_line(&text) {
        return text;
    }

    let split = text.match_indices(' ').map(|(at, _)| at).find(|&at| {
        let (head, tail) = (&text[..at], &text[at + 1..]);
        head.trim() == head && tail.trim() == tail && is_plain_line(head) && is_plain_line(tail)
    });
    if let Some(at) = split {
        return format!("{}\n{}", &text[..at], &text[at + 1..]);
    }

    if let Some((first, rest)) = spans.split_first().filter(|(first, _)| !first.style.is_plain()) {
        let underscores = &"___"[..marker(first.style).len()];
        let mut underscored = String::with_capacity(text.len());
        push_marked(&mut underscored, first, underscores);
        underscored.push_str(&render_spans(rest));
        if is_plain_line(&underscored) {
            return underscored;
        }
    }
    text
}

/// Render blocks back to markdown.
///
/// List items sit on consecutive lines; every other block is followed
/// by a blank line. Leading and trailing newlines are trimmed.
///
/// ```rust
/// use blockdown_core::{parse, render};
///
/// let md = render(&parse("# Title\n3. third\n4. fourth"));
/// assert_eq!(md, "# Title\n\n1. third\n1. fourth");
/// ```
pub fn render(blocks: &[Block]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(blocks.len() * 2);

    for block in blocks {
        match block {
            Block::Heading(h) => {
                lines.push(format!("{} {}", "#".repeat(h.level as usize), render_spans(&h.spans)));
                lines.push(String::new());
            }
            Block::Code(c) => {
                lines.push(format!("{FENCE}{}", c.language));
                lines.push(c.raw_text.clone());
                lines.push(FENCE.to_string());
                lines.push(String::new());
            }
            Block::HorizontalRule => {
                lines.push("---".to_string());
                lines.push(String::new());
            }
            Block::TextLine(t) => match t.list {
                Some(ListKind::Unordered) => lines.push(format!("- {}", render_spans(&t.spans))),
                Some(ListKind::Ordered) => lines.push(format!("1. {}", render_spans(&t.spans))),
                None if t.is_quote => {
                    // Every quote line needs its own marker to survive a reparse.
                    let text = render_spans(&t.spans);
                    lines.extend(text.split('\n').map(|l| format!("> {l}")));
                    lines.push(String::new());
                }
                None => {
                    lines.push(render_paragraph(&t.spans));
                    lines.push(String::new());
                }
            },
        }
    }

    lines.join("\n").trim_matches('\n').to_string()
}

/// Outcome of parse, render, reparse.
#[derive(Debug, Clone)]
pub struct RoundTrip {
    pub original: Vec<Block>,
    pub rendered: String,
    pub reparsed: Vec<Block>,
}

/// A position where the reparsed blocks differ from the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch<'a> {
    pub index: usize,
    pub expected: Option<&'a Block>,
    pub actual: Option<&'a Block>,
}

impl RoundTrip {
    /// Same block kinds in the same order, with equal spans and payloads.
    pub fn is_equivalent(&self) -> bool {
        self.original == self.reparsed
    }

    pub fn mismatches(&self) -> Vec<Mismatch<'_>> {
        let len = self.original.len().max(self.reparsed.len());
        (0..len)
            .filter_map(|index| {
                let expected = self.original.get(index);
                let actual = self.reparsed.get(index);
                (expected != actual).then_some(Mismatch {
                    index,
                    expected,
                    actual,
                })
            })
            .collect()
    }
}

impl fmt::Display for Mismatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn describe(block: Option<&Block>) -> String {
            match block {
                Some(b) => format!("{} {:?}", b.kind_name(), b.plain_text()),
                None => "nothing".to_string(),
            }
        }
        write!(
            f,
            "block {}: expected {}, got {}",
            self.index,
            describe(self.expected),
            describe(self.actual)
        )
    }
}

/// Round-trip `document` with the default parser.
pub fn roundtrip(document: &str) -> RoundTrip {
    roundtrip_with(&Parser::new(), document)
}

/// Round-trip `document` with a configured parser.
pub fn roundtrip_with(parser: &Parser, document: &str) -> RoundTrip {
    let original = parser.parse(document);
    let rendered = render(&original);
    let reparsed = parser.parse(&rendered);
    RoundTrip {
        original,
        rendered,
        reparsed,
    }
}

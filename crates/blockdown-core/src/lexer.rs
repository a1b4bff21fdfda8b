//! Line splitting and per-line classification.
//!
//! The lexer hands the segmenter one source line at a time, with a
//! single line of lookahead for multi-line constructs (fences, quotes,
//! paragraphs). Newlines are found with `memchr`.
//!
//! Classification ([`Line::classify`]) only looks at the line itself;
//! every decision that spans lines belongs to the parser.

use crate::span::Span;
use memchr::memchr;

/// Three backticks open and close a code fence.
pub const FENCE: &str = "```";

/// A single line from the input with its source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// The line text without its trailing `\n` / `\r\n`.
    pub text: &'a str,
    /// Byte span in the original input.
    pub span: Span,
}

/// What a line would open if it started a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Whitespace only.
    Blank,
    /// Opening (or closing) code fence with the trimmed info string.
    Fence { language: &'a str },
    /// `#`..`######`, whitespace, text.
    Heading { level: u8, text: &'a str },
    /// Three or more of the same `-`, `_` or `*`.
    Rule,
    /// `>` prefix; `text` is the trimmed remainder (may be empty).
    Quote { text: &'a str },
    /// `-`, `*` or `+`, whitespace, text.
    Unordered { text: &'a str },
    /// Digits, `.`, whitespace, text.
    Ordered { text: &'a str },
    /// Anything else.
    Text { text: &'a str },
}

impl<'a> LineKind<'a> {
    /// Whether a line of this kind may continue an open paragraph.
    #[inline]
    pub fn continues_paragraph(&self) -> bool {
        matches!(self, LineKind::Text { .. })
    }
}

impl<'a> Line<'a> {
    #[inline(always)]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// The line with surrounding whitespace removed.
    #[inline(always)]
    pub fn trimmed(&self) -> &'a str {
        self.text.trim()
    }

    /// Classify the line. Checks run in a fixed order and the first
    /// match wins, so `---` is always a rule and never emphasis.
    pub fn classify(&self) -> LineKind<'a> {
        let t = self.trimmed();

        if t.is_empty() {
            return LineKind::Blank;
        }
        if let Some(info) = t.strip_prefix(FENCE) {
            return LineKind::Fence {
                language: info.trim(),
            };
        }
        if let Some((level, text)) = heading(t) {
            return LineKind::Heading { level, text };
        }
        if is_rule(t) {
            return LineKind::Rule;
        }
        if let Some(rest) = t.strip_prefix('>') {
            return LineKind::Quote { text: rest.trim() };
        }
        if let Some(text) = bullet(t) {
            return LineKind::Unordered { text };
        }
        if let Some(text) = numbered(t) {
            return LineKind::Ordered { text };
        }
        LineKind::Text { text: t }
    }
}

/// Strip at least one leading whitespace char and require text after it.
#[inline]
fn after_gap(rest: &str) -> Option<&str> {
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim_start();
    (!text.is_empty()).then_some(text)
}

fn heading(t: &str) -> Option<(u8, &str)> {
    let hashes = t.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    after_gap(&t[hashes..]).map(|text| (hashes as u8, text))
}

fn is_rule(t: &str) -> bool {
    let bytes = t.as_bytes();
    match bytes.first() {
        Some(&(c @ (b'-' | b'_' | b'*'))) => bytes.len() >= 3 && bytes.iter().all(|&b| b == c),
        _ => false,
    }
}

fn bullet(t: &str) -> Option<&str> {
    match t.as_bytes().first() {
        Some(b'-' | b'*' | b'+') => after_gap(&t[1..]),
        _ => None,
    }
}

fn numbered(t: &str) -> Option<&str> {
    let digits = t.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    after_gap(t[digits..].strip_prefix('.')?)
}

/// Line-based lexer with one line of lookahead.
pub struct Lexer<'a> {
    input: &'a str,
    offset: usize,
    peeked: Option<Line<'a>>,
}

impl<'a> Lexer<'a> {
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            peeked: None,
        }
    }

    #[inline(always)]
    pub fn is_eof(&self) -> bool {
        self.peeked.is_none() && self.offset >= self.input.len()
    }

    /// Peek at the next line without consuming it.
    #[inline]
    pub fn peek_line(&mut self) -> Option<&Line<'a>> {
        if self.peeked.is_none() {
            self.peeked = self.read_line();
        }
        self.peeked.as_ref()
    }

    /// Consume and return the next line.
    #[inline]
    pub fn next_line(&mut self) -> Option<Line<'a>> {
        if let Some(line) = self.peeked.take() {
            return Some(line);
        }
        self.read_line()
    }

    /// Skip blank lines and return how many were skipped.
    pub fn skip_blank_lines(&mut self) -> usize {
        let mut count = 0;
        while let Some(line) = self.peek_line() {
            if !line.is_blank() {
                break;
            }
            self.next_line();
            count += 1;
        }
        count
    }

    fn read_line(&mut self) -> Option<Line<'a>> {
        let bytes = self.input.as_bytes();
        if self.offset >= bytes.len() {
            return None;
        }

        let start = self.offset;
        let end = match memchr(b'\n', &bytes[start..]) {
            Some(pos) => start + pos,
            None => bytes.len(),
        };

        // CRLF: the `\r` belongs to the line terminator.
        let text_end = if end > start && bytes[end - 1] == b'\r' {
            end - 1
        } else {
            end
        };

        self.offset = if end < bytes.len() { end + 1 } else { end };

        // `\n` and `\r` are ASCII, so both ends sit on char boundaries.
        let text = &self.input[start..text_end];
        Some(Line {
            text,
            span: Span::new(start as u32, text_end as u32),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(text: &str) -> LineKind<'_> {
        Line {
            text,
            span: Span::default(),
        }
        .classify()
    }

    #[test]
    fn splits_lines_and_drops_carriage_returns() {
        let mut lexer = Lexer::new("one\r\ntwo\n\nthree");
        let texts: Vec<_> = std::iter::from_fn(|| lexer.next_line())
            .map(|l| l.text)
            .collect();
        assert_eq!(texts, vec!["one", "two", "", "three"]);
    }

    #[test]
    fn line_spans_exclude_terminators() {
        let mut lexer = Lexer::new("ab\r\ncd");
        assert_eq!(lexer.next_line().unwrap().span, Span::new(0, 2));
        assert_eq!(lexer.next_line().unwrap().span, Span::new(4, 6));
        assert!(lexer.is_eof());
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lexer = Lexer::new("a\nb");
        assert_eq!(lexer.peek_line().map(|l| l.text), Some("a"));
        assert_eq!(lexer.next_line().map(|l| l.text), Some("a"));
        assert_eq!(lexer.next_line().map(|l| l.text), Some("b"));
        assert_eq!(lexer.next_line(), None);
    }

    #[test]
    fn skip_blank_counts_whitespace_lines() {
        let mut lexer = Lexer::new("\n  \n\t\nx");
        assert_eq!(lexer.skip_blank_lines(), 3);
        assert_eq!(lexer.next_line().map(|l| l.text), Some("x"));
    }

    #[test]
    fn heading_needs_gap_and_at_most_six_hashes() {
        assert_eq!(
            kind("### Title"),
            LineKind::Heading {
                level: 3,
                text: "Title"
            }
        );
        assert_eq!(kind("#NoSpace"), LineKind::Text { text: "#NoSpace" });
        assert_eq!(
            kind("####### Seven"),
            LineKind::Text {
                text: "####### Seven"
            }
        );
        assert_eq!(kind("#"), LineKind::Text { text: "#" });
    }

    #[test]
    fn rule_beats_list_and_emphasis() {
        assert_eq!(kind("---"), LineKind::Rule);
        assert_eq!(kind("***"), LineKind::Rule);
        assert_eq!(kind("  _____  "), LineKind::Rule);
        assert_eq!(kind("--"), LineKind::Text { text: "--" });
        assert_eq!(kind("-*-"), LineKind::Text { text: "-*-" });
    }

    #[test]
    fn list_markers() {
        assert_eq!(kind("- a"), LineKind::Unordered { text: "a" });
        assert_eq!(kind("*\tb"), LineKind::Unordered { text: "b" });
        assert_eq!(kind("+  c"), LineKind::Unordered { text: "c" });
        assert_eq!(kind("12. d"), LineKind::Ordered { text: "d" });
        assert_eq!(kind("*emph*"), LineKind::Text { text: "*emph*" });
        assert_eq!(kind("2.5 units"), LineKind::Text { text: "2.5 units" });
        assert_eq!(kind("-"), LineKind::Text { text: "-" });
    }

    #[test]
    fn fence_and_quote() {
        assert_eq!(kind("```rust "), LineKind::Fence { language: "rust" });
        assert_eq!(kind("```"), LineKind::Fence { language: "" });
        assert_eq!(kind(">  quoted "), LineKind::Quote { text: "quoted" });
        assert_eq!(kind(">"), LineKind::Quote { text: "" });
    }
}

//! Inline span tokenizer.
//!
//! Turns one line (or one coalesced paragraph) of text into styled
//! [`TextSpan`]s. Seven delimiter patterns are recognised, in priority
//! order:
//!
//! | Pattern | Style |
//! |---|---|
//! | `***x***`, `___x___` | bold + italic |
//! | `**x**`, `__x__` | bold |
//! | `*x*`, `_x_` (marker not touching another of its kind) | italic |
//! | `` `x` `` | bold (the store has no inline code style) |
//!
//! Each pattern is scanned over the whole input independently. A match
//! is kept only if it does not overlap any match already kept by a
//! higher-priority pattern, so a range claimed by `***` can never be
//! re-used, even partially, by `*`. Surviving matches are ordered by
//! position and the gaps between them become plain spans.
//!
//! Pair content is the shortest run of at least one character that
//! reaches a valid closer, and never crosses a `\n`.

use memchr::{memchr, memchr2};

use crate::ast::{Style, TextSpan};

/// Split `text` into styled spans.
///
/// Returns an empty vector for empty input, and a single plain span
/// when no markers pair up.
///
/// ```rust
/// use blockdown_core::{tokenize, Style};
///
/// let spans = tokenize("say **hi**");
/// assert_eq!(spans.len(), 2);
/// assert_eq!(spans[1].text, "hi");
/// assert_eq!(spans[1].style, Style::BOLD);
/// ```
pub fn tokenize(text: &str) -> Vec<TextSpan> {
    if text.is_empty() {
        return Vec::new();
    }

    let matches = resolve(text.as_bytes());
    if matches.is_empty() {
        return vec![TextSpan::plain(text)];
    }

    let mut spans = Vec::with_capacity(matches.len() * 2 + 1);
    let mut pos = 0;
    for m in &matches {
        if m.start > pos {
            spans.push(TextSpan::plain(&text[pos..m.start]));
        }
        let width = m.marker.delimiter().len();
        spans.push(TextSpan::new(
            &text[m.start + width..m.end - width],
            m.marker.style(),
        ));
        pos = m.end;
    }
    if pos < text.len() {
        spans.push(TextSpan::plain(&text[pos..]));
    }
    spans
}

/// One delimiter pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    TripleStar,
    TripleUnderscore,
    DoubleStar,
    DoubleUnderscore,
    Star,
    Underscore,
    Backtick,
}

impl Marker {
    /// Highest priority first.
    const PRIORITY: [Marker; 7] = [
        Marker::TripleStar,
        Marker::TripleUnderscore,
        Marker::DoubleStar,
        Marker::DoubleUnderscore,
        Marker::Star,
        Marker::Underscore,
        Marker::Backtick,
    ];

    fn delimiter(self) -> &'static [u8] {
        match self {
            Marker::TripleStar => b"***",
            Marker::TripleUnderscore => b"___",
            Marker::DoubleStar => b"**",
            Marker::DoubleUnderscore => b"__",
            Marker::Star => b"*",
            Marker::Underscore => b"_",
            Marker::Backtick => b"`",
        }
    }

    fn style(self) -> Style {
        match self {
            Marker::TripleStar | Marker::TripleUnderscore => Style::BOLD_ITALIC,
            Marker::DoubleStar | Marker::DoubleUnderscore | Marker::Backtick => Style::BOLD,
            Marker::Star | Marker::Underscore => Style::ITALIC,
        }
    }

    /// Single markers must not touch another copy of their own char, so
    /// they never match inside `**` or `__`.
    fn isolated(self) -> bool {
        matches!(self, Marker::Star | Marker::Underscore)
    }
}

#[derive(Debug, Clone, Copy)]
struct Match {
    start: usize,
    end: usize,
    marker: Marker,
}

impl Match {
    #[inline]
    fn overlaps(&self, other: &Match) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }
}

/// Run every pattern, keep non-overlapping matches by priority, and
/// return them in source order.
fn resolve(bytes: &[u8]) -> Vec<Match> {
    let mut kept: Vec<Match> = Vec::new();
    for marker in Marker::PRIORITY {
        for m in Scanner::new(bytes, marker) {
            if !kept.iter().any(|k| k.overlaps(&m)) {
                kept.push(m);
            }
        }
    }
    kept.sort_by_key(|m| m.start);
    kept
}

/// Left-to-right, non-overlapping matches of a single pattern.
struct Scanner<'a> {
    bytes: &'a [u8],
    marker: Marker,
    delim: &'static [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(bytes: &'a [u8], marker: Marker) -> Self {
        Self {
            bytes,
            marker,
            delim: marker.delimiter(),
            pos: 0,
        }
    }

    #[inline]
    fn byte(&self, i: usize) -> Option<u8> {
        self.bytes.get(i).copied()
    }

    /// Whether a delimiter sits at `i`, honouring isolation for single
    /// markers.
    fn delimiter_at(&self, i: usize) -> bool {
        if !self.bytes[i..].starts_with(self.delim) {
            return false;
        }
        if !self.marker.isolated() {
            return true;
        }
        let c = self.delim[0];
        let before = i.checked_sub(1).and_then(|j| self.byte(j));
        before != Some(c) && self.byte(i + 1) != Some(c)
    }

    /// Try to match a pair opening at `start`; returns its end offset.
    fn pair_at(&self, start: usize) -> Option<usize> {
        if !self.delimiter_at(start) {
            return None;
        }
        let content_start = start + self.delim.len();
        let c = self.delim[0];

        let mut from = content_start;
        while from < self.bytes.len() {
            let offset = memchr2(c, b'\n', &self.bytes[from..])?;
            let at = from + offset;
            if self.bytes[at] == b'\n' {
                return None;
            }
            if at > content_start && self.delimiter_at(at) {
                return Some(at + self.delim.len());
            }
            from = at + 1;
        }
        None
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let c = self.delim[0];
        while self.pos < self.bytes.len() {
            let start = self.pos + memchr(c, &self.bytes[self.pos..])?;
            match self.pair_at(start) {
                Some(end) => {
                    self.pos = end;
                    return Some(Match {
                        start,
                        end,
                        marker: self.marker,
                    });
                }
                None => self.pos = start + 1,
            }
        }
        None
    }
}

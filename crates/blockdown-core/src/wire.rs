//! Store wire format.
//!
//! The knowledge store exchanges blocks as JSON objects tagged by a
//! `type` field. [`encode`] turns parsed [`Block`]s into that shape,
//! assigning ids from an injected [`IdGenerator`]; [`decode`] goes the
//! other way for export, tolerating block and token types this crate
//! does not model.
//!
//! ```rust
//! use blockdown_core::{parse, wire};
//!
//! let mut ids = wire::SequentialIds::new("b");
//! let encoded = wire::encode(&parse("# Hi"), &mut ids);
//! let json = wire::to_json(&encoded, false).unwrap();
//! assert!(json.starts_with(r#"[{"type":"HeadingBlock","id":"b-1","level":1"#));
//! ```

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::ast::{Block, CodeBlock, Heading, ListKind, Style, TextLine, TextSpan};
use crate::error::WireError;

/// Source of fresh block and token ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random UUID v4 ids, as the store expects for new content.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `"{prefix}-{n}"` ids, counting from 1.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// One block as the store represents it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WireBlock {
    #[serde(rename = "TextBlock")]
    Text(TextBlock),
    #[serde(rename = "HeadingBlock")]
    Heading(HeadingBlock),
    #[serde(rename = "CodeBlock")]
    Code(CodeBlockRecord),
    #[serde(rename = "HorizontalLineBlock")]
    HorizontalLine(HorizontalLineBlock),
    /// Entity embeds, tables and anything else the store adds later.
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextBlock {
    pub id: String,
    /// Child blocks. Always empty on encode; ignored on decode.
    pub blocks: Vec<Value>,
    pub hierarchy: Hierarchy,
    pub tokens: Vec<WireToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<ListInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<QuoteInfo>,
}

/// Indentation slot of a text block. Nesting is not produced, so every
/// encoded block sits at the base level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hierarchy {
    pub key: String,
    pub val: u32,
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self {
            key: "Base".to_string(),
            val: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListInfo {
    #[serde(rename = "type")]
    pub kind: WireListKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireListKind {
    Unordered,
    Ordered,
    /// Checklists and other list flavours; decoded as paragraphs.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteInfo {
    pub layout: String,
}

impl Default for QuoteInfo {
    fn default() -> Self {
        Self {
            layout: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingBlock {
    #[serde(default)]
    pub id: String,
    #[serde(default = "first_level")]
    pub level: i64,
    #[serde(default)]
    pub tokens: Vec<WireToken>,
}

fn first_level() -> i64 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeBlockRecord {
    pub id: String,
    pub text: String,
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizontalLineBlock {
    pub id: String,
}

/// One inline token.
///
/// Reading is lenient: a bare string is a plain text token, an object
/// without a `type` is read as a text token, and anything else that does
/// not fit becomes [`WireToken::Unsupported`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum WireToken {
    #[serde(rename = "TextToken")]
    Text(TextToken),
    /// Link to another entity; only its display text survives decode.
    #[serde(rename = "LinkToken")]
    Link(LinkToken),
    Unsupported,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum TaggedToken {
    #[serde(rename = "TextToken")]
    Text(TextToken),
    #[serde(rename = "LinkToken")]
    Link(LinkToken),
    #[serde(other)]
    Unsupported,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientToken {
    Tagged(TaggedToken),
    Bare(String),
    Untyped(TextToken),
    Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for WireToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = match LenientToken::deserialize(deserializer)? {
            LenientToken::Tagged(TaggedToken::Text(t)) | LenientToken::Untyped(t) => WireToken::Text(t),
            LenientToken::Tagged(TaggedToken::Link(l)) => WireToken::Link(l),
            LenientToken::Bare(text) => WireToken::Text(TextToken {
                text,
                ..TextToken::default()
            }),
            LenientToken::Tagged(TaggedToken::Unsupported) | LenientToken::Other(_) => WireToken::Unsupported,
        };
        Ok(token)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextToken {
    pub id: String,
    pub text: String,
    pub style: WireStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WireStyle {
    pub bold: bool,
    pub italic: bool,
}

impl From<Style> for WireStyle {
    fn from(style: Style) -> Self {
        Self {
            bold: style.bold,
            italic: style.italic,
        }
    }
}

impl From<WireStyle> for Style {
    fn from(style: WireStyle) -> Self {
        Style {
            bold: style.bold,
            italic: style.italic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkToken {
    pub id: String,
    pub text: String,
}

/// Convert parsed blocks to store records. Each block takes an id before
/// its tokens do.
pub fn encode<G>(blocks: &[Block], ids: &mut G) -> Vec<WireBlock>
where
    G: IdGenerator + ?Sized,
{
    blocks.iter().map(|block| encode_block(block, ids)).collect()
}

fn encode_block<G>(block: &Block, ids: &mut G) -> WireBlock
where
    G: IdGenerator + ?Sized,
{
    let id = ids.next_id();
    match block {
        Block::Heading(h) => WireBlock::Heading(HeadingBlock {
            id,
            level: i64::from(h.level),
            tokens: encode_tokens(&h.spans, ids),
        }),
        Block::Code(c) => WireBlock::Code(CodeBlockRecord {
            id,
            text: c.raw_text.clone(),
            lang: c.language.clone(),
        }),
        Block::HorizontalRule => WireBlock::HorizontalLine(HorizontalLineBlock { id }),
        Block::TextLine(t) => WireBlock::Text(TextBlock {
            id,
            tokens: encode_tokens(&t.spans, ids),
            list: t.list.map(|kind| ListInfo {
                kind: match kind {
                    ListKind::Unordered => WireListKind::Unordered,
                    ListKind::Ordered => WireListKind::Ordered,
                },
            }),
            quote: t.is_quote.then(QuoteInfo::default),
            ..TextBlock::default()
        }),
    }
}

fn encode_tokens<G>(spans: &[TextSpan], ids: &mut G) -> Vec<WireToken>
where
    G: IdGenerator + ?Sized,
{
    spans
        .iter()
        .map(|span| {
            WireToken::Text(TextToken {
                id: ids.next_id(),
                text: span.text.clone(),
                style: span.style.into(),
            })
        })
        .collect()
}

/// Convert store records back to blocks.
///
/// Unsupported block types are dropped. Tokens with no text are dropped
/// as well, since an empty styled span would render as a bare marker
/// run.
pub fn decode(blocks: &[WireBlock]) -> Vec<Block> {
    blocks
        .iter()
        .enumerate()
        .filter_map(|(index, block)| {
            let decoded = decode_block(block);
            if decoded.is_none() {
                debug!(index, "skipping unsupported block");
            }
            decoded
        })
        .collect()
}

fn decode_block(block: &WireBlock) -> Option<Block> {
    let block = match block {
        WireBlock::Heading(h) => {
            let level = h.level.clamp(1, 6) as u8;
            Block::Heading(Heading::new(level, decode_tokens(&h.tokens)))
        }
        WireBlock::Code(c) => Block::Code(CodeBlock {
            language: c.lang.clone(),
            raw_text: c.text.clone(),
        }),
        WireBlock::HorizontalLine(_) => Block::HorizontalRule,
        WireBlock::Text(t) => {
            let spans = decode_tokens(&t.tokens);
            match t.list.map(|l| l.kind) {
                Some(WireListKind::Unordered) => Block::TextLine(TextLine::item(ListKind::Unordered, spans)),
                Some(WireListKind::Ordered) => Block::TextLine(TextLine::item(ListKind::Ordered, spans)),
                Some(WireListKind::Other) => Block::TextLine(TextLine::paragraph(spans)),
                None if t.quote.is_some() => Block::TextLine(TextLine::quote(spans)),
                None => Block::TextLine(TextLine::paragraph(spans)),
            }
        }
        WireBlock::Unsupported => return None,
    };
    Some(block)
}

fn decode_tokens(tokens: &[WireToken]) -> Vec<TextSpan> {
    tokens
        .iter()
        .filter_map(|token| match token {
            WireToken::Text(t) => Some(TextSpan::new(t.text.as_str(), t.style.into())),
            WireToken::Link(l) => Some(TextSpan::plain(l.text.as_str())),
            WireToken::Unsupported => {
                debug!("skipping unsupported token");
                None
            }
        })
        .filter(|span| !span.text.is_empty())
        .collect()
}

/// Read a JSON array of store blocks.
///
/// Each element is checked separately so a malformed block is reported
/// by position. An object without a string `type` is read as
/// [`WireBlock::Unsupported`].
pub fn from_json(json: &str) -> Result<Vec<WireBlock>, WireError> {
    let value: Value = serde_json::from_str(json)?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(WireError::NotAnArray {
                found: json_kind(&other),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if is_untyped(&item) {
                debug!(index, "block has no type");
                return Ok(WireBlock::Unsupported);
            }
            serde_json::from_value(item).map_err(|source| WireError::Block { index, source })
        })
        .collect()
}

/// [`from_json`] followed by [`decode`].
pub fn decode_json(json: &str) -> Result<Vec<Block>, WireError> {
    Ok(decode(&from_json(json)?))
}

/// Serialize store blocks, optionally pretty-printed.
pub fn to_json(blocks: &[WireBlock], pretty: bool) -> Result<String, WireError> {
    let json = if pretty {
        serde_json::to_string_pretty(blocks)?
    } else {
        serde_json::to_string(blocks)?
    };
    Ok(json)
}

fn is_untyped(item: &Value) -> bool {
    item.as_object()
        .is_some_and(|fields| !fields.get("type").is_some_and(Value::is_string))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//! Store wire codec tests

use blockdown_core::wire::{self, IdGenerator, SequentialIds, UuidGenerator, WireBlock};
use blockdown_core::{parse, render, Block, ListKind, Style, TextLine, TextSpan, WireError};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn encode_value(markdown: &str) -> Value {
    let blocks = wire::encode(&parse(markdown), &mut SequentialIds::new("id"));
    serde_json::to_value(blocks).unwrap()
}

#[test]
fn test_heading_record() {
    assert_eq!(
        encode_value("## Hello *you*"),
        json!([{
            "type": "HeadingBlock",
            "id": "id-1",
            "level": 2,
            "tokens": [
                {"type": "TextToken", "id": "id-2", "text": "Hello ", "style": {"bold": false, "italic": false}},
                {"type": "TextToken", "id": "id-3", "text": "you", "style": {"bold": false, "italic": true}}
            ]
        }])
    );
}

#[test]
fn test_code_and_rule_records() {
    assert_eq!(
        encode_value("```\nx\n```\n---"),
        json!([
            {"type": "CodeBlock", "id": "id-1", "text": "x", "lang": "text"},
            {"type": "HorizontalLineBlock", "id": "id-2"}
        ])
    );
}

#[test]
fn test_paragraph_record_has_no_list_or_quote() {
    let value = encode_value("plain");
    let block = &value[0];
    assert_eq!(block["type"], "TextBlock");
    assert_eq!(block["blocks"], json!([]));
    assert_eq!(block["hierarchy"], json!({"key": "Base", "val": 0}));
    assert!(block.get("list").is_none());
    assert!(block.get("quote").is_none());
}

#[test]
fn test_list_kinds() {
    let value = encode_value("- a\n1. b");
    assert_eq!(value[0]["list"], json!({"type": "unordered"}));
    assert_eq!(value[1]["list"], json!({"type": "ordered"}));
}

#[test]
fn test_empty_quote_has_no_tokens() {
    let value = encode_value(">");
    assert_eq!(value[0]["tokens"], json!([]));
    assert_eq!(value[0]["quote"], json!({"layout": "default"}));
}

#[test]
fn test_uuid_ids_are_fresh_per_block_and_token() {
    let encoded = wire::encode(&parse("a **b** c\n\n---"), &mut UuidGenerator);
    let value = serde_json::to_value(&encoded).unwrap();
    let mut ids = vec![value[0]["id"].as_str().unwrap().to_string()];
    for token in value[0]["tokens"].as_array().unwrap() {
        ids.push(token["id"].as_str().unwrap().to_string());
    }
    ids.push(value[1]["id"].as_str().unwrap().to_string());

    assert_eq!(ids.len(), 5);
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
    assert!(ids.iter().all(|id| uuid::Uuid::parse_str(id).is_ok()));
}

#[test]
fn test_custom_id_generator() {
    struct Fixed(u32);
    impl IdGenerator for Fixed {
        fn next_id(&mut self) -> String {
            self.0 += 10;
            self.0.to_string()
        }
    }

    let encoded = wire::encode(&parse("---\n---"), &mut Fixed(0));
    let value = serde_json::to_value(&encoded).unwrap();
    assert_eq!(value[0]["id"], "10");
    assert_eq!(value[1]["id"], "20");
}

#[test]
fn test_encode_decode_preserves_blocks() {
    let markdown = "# T\n\npara **b**\n\n- x\n1. y\n> q\n\n```rs\nfn f() {}\n```\n\n---";
    let blocks = parse(markdown);
    let encoded = wire::encode(&blocks, &mut SequentialIds::default());
    let json = wire::to_json(&encoded, true).unwrap();
    assert_eq!(wire::decode_json(&json).unwrap(), blocks);
}

#[test]
fn test_decode_store_export() {
    // Shape returned by the store, including blocks and tokens this
    // crate does not model.
    let json = r#"[
        {"id":"1","type":"HeadingBlock","level":9,"tokens":[{"type":"TextToken","id":"t","text":"Deep"}]},
        {"id":"2","type":"EntityBlock","entityId":"abc"},
        {"id":"3","type":"TextBlock","blocks":[],"hierarchy":{"key":"Base","val":0},
         "tokens":[
            {"type":"TextToken","id":"a","text":"see ","style":{"bold":false,"italic":false}},
            {"type":"LinkToken","id":"b","text":"Other page","entityId":"xyz"},
            {"type":"MathToken","id":"c","latex":"x^2"},
            {"type":"TextToken","id":"d","text":"","style":{"bold":true,"italic":false}},
            {"type":"TextToken","id":"e","text":"!","style":{"bold":true}}
         ]},
        {"id":"4","type":"TextBlock","tokens":[],"list":{"type":"checklist"}},
        {"id":"5","type":"TextBlock","tokens":[{"type":"TextToken","text":"q"}],"quote":{}}
    ]"#;

    let blocks = wire::decode_json(json).unwrap();
    assert_eq!(blocks.len(), 4);
    assert_eq!(blocks[0].kind_name(), "heading");
    assert!(matches!(&blocks[0], Block::Heading(h) if h.level == 6));
    assert_eq!(
        blocks[1],
        Block::TextLine(TextLine::paragraph(vec![
            TextSpan::plain("see "),
            TextSpan::plain("Other page"),
            TextSpan::new("!", Style::BOLD),
        ]))
    );
    assert_eq!(blocks[2], Block::TextLine(TextLine::paragraph(vec![])));
    assert_eq!(blocks[3], Block::TextLine(TextLine::quote(vec![TextSpan::plain("q")])));

    assert_eq!(
        render(&blocks),
        "###### Deep\n\nsee Other page**!**\n\n\n\n> q"
    );
}

#[test]
fn test_decode_list_kinds() {
    let json = r#"[
        {"type":"TextBlock","tokens":[{"type":"TextToken","text":"a"}],"list":{"type":"unordered"}},
        {"type":"TextBlock","tokens":[{"type":"TextToken","text":"b"}],"list":{"type":"ordered"}}
    ]"#;
    assert_eq!(
        wire::decode_json(json).unwrap(),
        vec![
            Block::TextLine(TextLine::item(ListKind::Unordered, vec![TextSpan::plain("a")])),
            Block::TextLine(TextLine::item(ListKind::Ordered, vec![TextSpan::plain("b")])),
        ]
    );
}

#[test]
fn test_unsupported_blocks_deserialize_to_placeholder() {
    let blocks = wire::from_json(r#"[{"type":"TableBlock","rows":[]}]"#).unwrap();
    assert_eq!(blocks, vec![WireBlock::Unsupported]);
    assert!(wire::decode(&blocks).is_empty());
}

#[test]
fn test_invalid_json_errors() {
    assert!(matches!(wire::decode_json("not json"), Err(WireError::Json(_))));
    assert!(matches!(
        wire::decode_json("42"),
        Err(WireError::NotAnArray { found: "a number" })
    ));

    let err = wire::decode_json(r#"[{"type":"CodeBlock","text":1}]"#).unwrap_err();
    assert_eq!(err.block_index(), Some(0));
    assert_eq!(err.to_string(), "invalid block at index 0");
}

#[test]
fn test_compact_and_pretty_json_agree() {
    let encoded = wire::encode(&parse("# a\n\nb"), &mut SequentialIds::default());
    let compact = wire::to_json(&encoded, false).unwrap();
    let pretty = wire::to_json(&encoded, true).unwrap();
    assert!(!compact.contains('\n'));
    assert!(pretty.contains('\n'));
    let a: Value = serde_json::from_str(&compact).unwrap();
    let b: Value = serde_json::from_str(&pretty).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_block_without_type_is_skipped() {
    let blocks = wire::from_json(r#"[{"id":"a"},{"type":7},{"type":"HorizontalLineBlock"}]"#).unwrap();
    assert_eq!(blocks[0], WireBlock::Unsupported);
    assert_eq!(blocks[1], WireBlock::Unsupported);
    assert_eq!(wire::decode(&blocks), vec![Block::HorizontalRule]);
}

#[test]
fn test_bare_and_untyped_tokens_are_text() {
    let json = r#"[{"type":"TextBlock","tokens":[
        "hello ",
        {"type":"TextToken","text":"big","style":{"bold":true}},
        {"text":" world","style":{"italic":true}},
        42
    ]}]"#;
    assert_eq!(
        wire::decode_json(json).unwrap(),
        vec![Block::TextLine(TextLine::paragraph(vec![
            TextSpan::plain("hello "),
            TextSpan::new("big", Style::BOLD),
            TextSpan::new(" world", Style::ITALIC),
        ]))]
    );
}

#[test]
fn test_empty_quote_encodes_without_tokens() {
    // Reading empty text as one empty span would put an empty token on
    // the wire, which decode then drops, so the record would not match
    // the block it came from.
    let with_empty_span = vec![Block::TextLine(TextLine::quote(vec![TextSpan::plain("")]))];
    let encoded = wire::encode(&with_empty_span, &mut SequentialIds::default());
    let value = serde_json::to_value(&encoded).unwrap();
    assert_eq!(value[0]["tokens"].as_array().map(Vec::len), Some(1));
    assert_eq!(value[0]["tokens"][0]["text"], "");
    assert_ne!(wire::decode(&encoded), with_empty_span);

    let parsed = parse(">");
    let encoded = wire::encode(&parsed, &mut SequentialIds::default());
    assert_eq!(wire::decode(&encoded), parsed);
}

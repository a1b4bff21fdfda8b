//! Render and round-trip tests

use blockdown_core::{parse, render, roundtrip, roundtrip_with, Block, Parser};
use pretty_assertions::assert_eq;
use rstest::rstest;

const SAMPLE: &str = r#"# Project Notes

Some intro text with **bold**, *italic* and ***both***.
It continues on a second line.

## Setup

1. Install the tool
2. Run `init`
3. Check the _output_

```bash
cargo build --release
  ./target/release/app
```

---

> Quoted wisdom
> spanning two lines

- first bullet
- second __bullet__

Closing paragraph.
"#;

#[test]
fn test_sample_document_round_trips() {
    let trip = roundtrip(SAMPLE);
    assert!(trip.is_equivalent(), "mismatches: {:?}", trip.mismatches());
    assert!(trip.mismatches().is_empty());
}

#[test]
fn test_sample_document_normal_form() {
    let expected = r#"# Project Notes

Some intro text with **bold**, *italic* and ***both***. It continues on a second line.

## Setup

1. Install the tool
1. Run **init**
1. Check the *output*
```bash
cargo build --release
  ./target/release/app
```

---

> Quoted wisdom
> spanning two lines

- first bullet
- second **bullet**
Closing paragraph."#;
    assert_eq!(render(&parse(SAMPLE)), expected);
}

#[test]
fn test_render_is_idempotent() {
    let once = render(&parse(SAMPLE));
    let twice = render(&parse(&once));
    assert_eq!(once, twice);
}

#[rstest]
#[case("# H1\n## H2\n### H3")]
#[case("- a\n- b\n- c")]
#[case("line1\nline2\n\nline3")]
#[case("```python\nprint(1)\n```")]
#[case("```\n\n```")]
#[case("---\n***\n___")]
#[case("> a\n>\n> b")]
#[case(">")]
#[case("9. nine\n10. ten")]
#[case("a **b** c\n- *d*\n> ***e***")]
#[case("`code` and __strong__ and _em_")]
#[case("2 * 3 and a ** b")]
#[case("#NoSpace and ####### seven")]
#[case("_ x_")]
#[case("_ _")]
#[case("1.\nitem")]
#[case("#\nnot a heading")]
#[case("*\nAfter the fence.")]
#[case("`*`")]
fn test_supported_constructs_round_trip(#[case] input: &str) {
    let trip = roundtrip(input);
    assert!(
        trip.is_equivalent(),
        "input {input:?} rendered as {:?}",
        trip.rendered
    );
}

#[test]
fn test_block_type_sequence_is_preserved() {
    let trip = roundtrip(SAMPLE);
    let before: Vec<_> = trip.original.iter().map(Block::kind_name).collect();
    let after: Vec<_> = trip.reparsed.iter().map(Block::kind_name).collect();
    assert_eq!(before, after);
}

#[test]
fn test_ordered_numbers_are_normalised() {
    let trip = roundtrip("3. c\n4. d");
    assert_eq!(trip.rendered, "1. c\n1. d");
    assert!(trip.is_equivalent());
}

#[test]
fn test_custom_default_language_round_trips() {
    let parser = Parser::new().with_default_language("console");
    let trip = roundtrip_with(&parser, "```\n$ ls\n```");
    assert_eq!(trip.rendered, "```console\n$ ls\n```");
    assert!(trip.is_equivalent());
}

#[test]
fn test_italic_paragraph_stays_a_paragraph() {
    let trip = roundtrip("_ x_");
    assert_eq!(trip.rendered, "*\nx*");
    let kinds: Vec<_> = trip.reparsed.iter().map(Block::kind_name).collect();
    assert_eq!(kinds, ["paragraph"]);
}

#[test]
fn test_lossy_marker_pairing_is_reported() {
    // The italic `_b_` comes back as `*b*`, which pairs with the stray `*`.
    let trip = roundtrip("a*_b_");
    assert_eq!(trip.rendered, "a**b*");
    assert!(!trip.is_equivalent());
    let mismatches = trip.mismatches();
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].index, 0);
    assert_eq!(mismatches[0].expected.map(Block::kind_name), Some("paragraph"));
    assert_eq!(mismatches[0].actual.map(Block::plain_text), Some("a**b*".to_string()));
}

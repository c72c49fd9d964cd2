//! Property-based tests for the converter
//!
//! Arbitrary and markup-shaped inputs must never panic, separation must never
//! stack more than two line breaks, and strip-only output must never carry
//! Markdown syntax that the input did not contain.

use onepass_markdown::{ConversionOptions, HtmlTag, MarkdownConverter, convert, convert_with};
use proptest::prelude::*;

/// Fragments that exercise tags, entities and whitespace
fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("<p>".to_string()),
        Just("</p>".to_string()),
        Just("<div>".to_string()),
        Just("</div>".to_string()),
        Just("<blockquote>".to_string()),
        Just("</blockquote>".to_string()),
        Just("<ul>".to_string()),
        Just("</ul>".to_string()),
        Just("<li>".to_string()),
        Just("</li>".to_string()),
        Just("<br>".to_string()),
        Just("<hr/>".to_string()),
        Just("<h2>".to_string()),
        Just("</h2>".to_string()),
        Just("<b>".to_string()),
        Just("</b>".to_string()),
        Just("<a href=\"http://x.com\">link</a>".to_string()),
        Just("<a href=\"broken\">".to_string()),
        Just("<!-- note -->".to_string()),
        Just("<".to_string()),
        Just(">".to_string()),
        Just("\n\n".to_string()),
        Just("   ".to_string()),
        Just("\u{a0}".to_string()),
        "[a-z*_`]{1,8}",
    ]
}

fn markup() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..40).prop_map(|parts| parts.concat())
}

/// Block structure and text only; hard breaks may legitimately stack
fn block_parts() -> impl Strategy<Value = Vec<&'static str>> {
    let part = prop_oneof![
        Just("<p>"),
        Just("</p>"),
        Just("<div>"),
        Just("</div>"),
        Just("<blockquote>"),
        Just("</blockquote>"),
        Just("<ul>"),
        Just("</ul>"),
        Just("<li>"),
        Just("</li>"),
        Just("<hr>"),
        Just("<h3>"),
        Just("</h3>"),
        Just("<pre>"),
        Just("</pre>"),
        Just("word"),
        Just(">"),
        Just("a > b"),
        Just(" "),
        Just("\n\n\n"),
    ];
    prop::collection::vec(part, 0..40)
}

fn block_markup() -> impl Strategy<Value = String> {
    block_parts().prop_map(|parts| parts.concat())
}

fn max_consecutive_breaks(text: &str) -> usize {
    let mut best = 0;
    let mut run = 0;
    for c in text.chars() {
        match c {
            '\n' => {
                run += 1;
                best = best.max(run);
            }
            '\r' | ' ' | '\t' => {}
            _ => run = 0,
        }
    }
    best
}

proptest! {
    #[test]
    fn prop_arbitrary_input_never_panics(html in any::<String>()) {
        let _ = convert(&html);
        let _ = convert_with(&html, &ConversionOptions {
            only_strip_tags: true,
            html_decode_first: true,
            short_circuit_if_no_tags: true,
        });
    }

    #[test]
    fn prop_arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = MarkdownConverter::new().convert_bytes(&bytes, None);
    }

    #[test]
    fn prop_markup_never_panics(html in markup()) {
        let _ = convert(&html);
    }

    #[test]
    fn prop_plain_separation_never_exceeds_two_breaks(html in block_markup()) {
        let text = convert_with(&html, &ConversionOptions {
            only_strip_tags: true,
            ..Default::default()
        });
        prop_assert!(max_consecutive_breaks(&text) <= 2, "{:?} -> {:?}", html, text);
    }

    #[test]
    fn prop_strip_mode_keeps_every_text_character(parts in block_parts()) {
        let html = parts.concat();
        let expected: String = parts
            .iter()
            .filter(|part| !part.starts_with('<'))
            .flat_map(|part| part.chars())
            .filter(|c| !c.is_ascii_whitespace())
            .collect();

        let text = convert_with(&html, &ConversionOptions {
            only_strip_tags: true,
            ..Default::default()
        });
        let kept: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        prop_assert_eq!(kept, expected, "{:?} -> {:?}", html, text);
    }

    #[test]
    fn prop_paragraph_gap_is_normalized(gap in "[ \t\r\n]{0,20}") {
        let markdown = convert(&format!("<p>A</p>{gap}<p>B</p>"));
        prop_assert_eq!(markdown, "A\r\n\r\nB");
    }

    #[test]
    fn prop_plain_words_round_trip(words in prop::collection::vec("[A-Za-z0-9.,!?]{1,10}", 1..20)) {
        let text = words.join(" ");
        prop_assert_eq!(convert(&text), text);
    }

    #[test]
    fn prop_strip_mode_adds_no_markdown(words in prop::collection::vec("[a-z]{1,8}", 1..10)) {
        let html = format!(
            "<h1>{}</h1><blockquote><p><b>{}</b></p></blockquote><ul><li>{}</li></ul>",
            words[0],
            words.join(" "),
            words.join("</li><li>"),
        );
        let text = convert_with(&html, &ConversionOptions {
            only_strip_tags: true,
            ..Default::default()
        });
        for marker in ['#', '*', '>', '_', '[', '\\'] {
            prop_assert!(!text.contains(marker), "{:?} contains {:?}", text, marker);
        }
    }

    #[test]
    fn prop_tag_parser_never_panics(text in "<[a-zA-Z]{0,6}[ a-z=\"'/:-]{0,30}>?") {
        let _ = HtmlTag::parse(&text, true);
        let _ = HtmlTag::parse(&text, false);
    }

    #[test]
    fn prop_parsed_attribute_values_round_trip(
        name in "[a-z][a-z0-9-]{0,8}",
        value in "[^\"<>]{0,16}",
    ) {
        let text = format!("<div {name}=\"{value}\">");
        let tag = HtmlTag::parse(&text, true).expect("well-formed tag parses");
        prop_assert_eq!(tag.attribute(&name), Some(value.as_str()));
    }
}

#![no_main]

use libfuzzer_sys::fuzz_target;
use onepass_markdown::{ConversionOptions, MarkdownConverter};

fuzz_target!(|data: &[u8]| {
    let markdown = MarkdownConverter::new();
    let _ = markdown.convert_bytes(data, None);

    if let Ok(html) = std::str::from_utf8(data) {
        let plain = MarkdownConverter::with_options(ConversionOptions {
            only_strip_tags: true,
            html_decode_first: true,
            short_circuit_if_no_tags: false,
        });
        let _ = plain.convert(html);
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use onepass_markdown::HtmlTag;

fuzz_target!(|text: &str| {
    let _ = HtmlTag::parse(text, true);
    let _ = HtmlTag::parse(text, false);
});

#!/usr/bin/env rust-script
//! Test corpus conversion
//!
//! Converts one HTML file from the corpus and prints the result, so corpus
//! outputs can be diffed against expected Markdown.
//!
//! ```cargo
//! [dependencies]
//! onepass-markdown = { path = "../.." }
//! ```

use onepass_markdown::{ConversionOptions, MarkdownConverter};
use std::env;
use std::fs;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    let plain = args.iter().any(|a| a == "--plain");
    let files: Vec<&String> = args.iter().skip(1).filter(|a| !a.starts_with("--")).collect();

    let Some(filename) = files.first() else {
        eprintln!("Usage: {} [--plain] <html_file> [content_type]", args[0]);
        process::exit(1);
    };
    let content_type = files.get(1).map(|s| s.as_str());

    // Read HTML file
    let html = match fs::read(filename) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file {}: {}", filename, e);
            process::exit(1);
        }
    };

    let converter = MarkdownConverter::with_options(ConversionOptions {
        only_strip_tags: plain,
        ..Default::default()
    });
    let markdown = match converter.convert_bytes(&html, content_type) {
        Ok(md) => md,
        Err(e) => {
            eprintln!("Error converting {}: {} (code {})", filename, e, e.code());
            process::exit(1);
        }
    };

    println!("{}", markdown);
}

//! Converts every `tests/fixtures/*.svg` document and compares a summary of
//! the result against the sibling `.expected` file.
//!
//! The summary lists the title, description, one line per output element
//! (name and class) and the code of every warning, or the code of the error
//! that stopped the conversion.

use datatest_stable::Utf8Path;
use miette::Diagnostic;
use regex_lite::Regex;
use s100svg::{Attributes, Element, convert};

/// Minimal tag extractor for Illustrator exports: shape tags, the `<svg>`
/// root, style blocks and text content, in document order.
fn extract_elements(source: &str) -> Vec<Element> {
    let tags = Regex::new(
        r"(?s)<style[^>]*>(?P<style>.*?)</style>|<text[^>]*>(?P<text>.*?)</text>|<(?P<name>svg|rect|circle|ellipse|line|path|polygon)\b(?P<attrs>[^>]*?)/?>",
    )
    .unwrap();
    let rule = Regex::new(r"\.[\w-]+\s*\{[^}]*\}").unwrap();
    let attribute = Regex::new(r#"([\w:-]+)\s*=\s*"([^"]*)""#).unwrap();
    let inner_tag = Regex::new(r"<[^>]*>").unwrap();

    let mut elements = Vec::new();
    for caps in tags.captures_iter(source) {
        if let Some(style) = caps.name("style") {
            elements.extend(
                rule.find_iter(style.as_str())
                    .map(|m| Element::style_rule(m.as_str())),
            );
        } else if let Some(text) = caps.name("text") {
            let content = inner_tag.replace_all(text.as_str(), "");
            elements.push(Element::Text(content.into_owned()));
        } else if let Some(name) = caps.name("name") {
            let attrs: Attributes = attribute
                .captures_iter(&caps["attrs"])
                .map(|a| (a[1].to_string(), a[2].to_string()))
                .collect();
            if let Some(element) = Element::from_tag(name.as_str(), attrs) {
                elements.push(element);
            }
        }
    }
    elements
}

fn diagnostic_code(diagnostic: &dyn Diagnostic) -> String {
    diagnostic
        .code()
        .map(|code| code.to_string())
        .unwrap_or_else(|| "<no code>".to_string())
}

fn summarize(source: &str) -> String {
    let class = Regex::new(r#"class="([^"]*)""#).unwrap();

    let conversion = match convert(extract_elements(source)) {
        Ok(conversion) => conversion,
        Err(err) => return format!("error {}", diagnostic_code(&err)),
    };

    let mut lines = vec![
        format!("title {}", conversion.title),
        format!("description {}", conversion.description),
    ];
    for output in &conversion.geometry {
        let fragment = output.to_string();
        lines.push(match class.captures(&fragment) {
            Some(caps) => format!("{} class=\"{}\"", output.element_name(), &caps[1]),
            None => output.element_name().to_string(),
        });
    }
    for warning in &conversion.warnings {
        lines.push(format!("warning {}", diagnostic_code(warning)));
    }
    lines.join("\n")
}

/// Format a colored inline diff using dissimilar
fn format_inline_diff(expected: &str, actual: &str) -> String {
    use dissimilar::Chunk;

    let mut output = String::new();
    output.push_str("\n=== Inline Diff (expected vs actual) ===\n");
    output.push_str("Legend: [-expected only-] [+actual only+] [unchanged]\n\n");

    for chunk in dissimilar::diff(expected, actual) {
        match chunk {
            Chunk::Equal(s) => output.push_str(s),
            Chunk::Delete(s) => {
                output.push_str("\x1b[31m[-");
                output.push_str(s);
                output.push_str("-]\x1b[0m");
            }
            Chunk::Insert(s) => {
                output.push_str("\x1b[32m[+");
                output.push_str(s);
                output.push_str("+]\x1b[0m");
            }
        }
    }
    output
}

fn test_fixture(path: &Utf8Path) -> datatest_stable::Result<()> {
    let source = std::fs::read_to_string(path)?;
    let expected_path: camino::Utf8PathBuf = path.with_extension("expected");
    let expected = std::fs::read_to_string(&expected_path)?;

    let actual = summarize(&source);
    let expected = expected.trim_end();
    if actual != expected {
        panic!(
            "summary mismatch for {}:\n{}",
            path,
            format_inline_diff(expected, &actual)
        );
    }
    Ok(())
}

datatest_stable::harness! {
    { test = test_fixture, root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"), pattern = r"\.svg$" },
}

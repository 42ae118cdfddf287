//! Inspection and patching of the `<link rel="manifest">` element in HTML
//! text.
//!
//! The pipeline only ever needs to find one element and read or replace one
//! attribute, so the markup is treated as text and queried with regular
//! expressions rather than a full parser.

use std::sync::OnceLock;

use regex::Regex;

fn link_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)<link\b[^>]*>").expect("invalid link tag regex"))
}

fn rel_manifest_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)\brel\s*=\s*("manifest"|'manifest'|manifest\b)"#)
            .expect("invalid rel attribute regex")
    })
}

fn href_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
            .expect("invalid href attribute regex")
    })
}

/// Locate the first `<link>` tag whose `rel` attribute equals `manifest`.
fn find_manifest_tag(html: &str) -> Option<(usize, &str)> {
    link_tag_pattern()
        .find_iter(html)
        .find(|tag| rel_manifest_pattern().is_match(tag.as_str()))
        .map(|tag| (tag.start(), tag.as_str()))
}

/// Byte span of the href attribute value within a tag.
fn href_value_span(tag: &str) -> Option<(usize, usize)> {
    let caps = href_pattern().captures(tag)?;
    let group = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?;
    Some((group.start(), group.end()))
}

/// Extract the manifest link's href from an HTML document.
///
/// Returns `None` when the document has no manifest link or when its href is
/// absent or empty; callers treat all three the same way.
pub fn manifest_href(html: &str) -> Option<String> {
    let (_, tag) = find_manifest_tag(html)?;
    let (start, end) = href_value_span(tag)?;
    let value = &tag[start..end];
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Rewrite the manifest link's href, returning the patched document.
///
/// Returns `None` when the document has no manifest link, in which case the
/// caller leaves it untouched. A manifest link without an href attribute
/// gains one.
pub fn set_manifest_href(html: &str, new_href: &str) -> Option<String> {
    let (tag_start, tag) = find_manifest_tag(html)?;

    let patched_tag = match href_value_span(tag) {
        Some((start, end)) => format!("{}{}{}", &tag[..start], new_href, &tag[end..]),
        None => {
            let closer = if tag.ends_with("/>") { 2 } else { 1 };
            let head = tag[..tag.len() - closer].trim_end();
            format!("{} href=\"{}\"{}", head, new_href, &tag[tag.len() - closer..])
        }
    };

    let mut patched = String::with_capacity(html.len() + new_href.len());
    patched.push_str(&html[..tag_start]);
    patched.push_str(&patched_tag);
    patched.push_str(&html[tag_start + tag.len()..]);
    Some(patched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_double_quoted_hrefs() {
        let html = r#"<head><link rel="manifest" href="/manifest.webmanifest"></head>"#;
        assert_eq!(manifest_href(html).as_deref(), Some("/manifest.webmanifest"));
    }

    #[test]
    fn extracts_single_quoted_and_unquoted_hrefs() {
        assert_eq!(
            manifest_href("<link rel='manifest' href='m.json'>").as_deref(),
            Some("m.json")
        );
        assert_eq!(
            manifest_href("<link href=m.json rel=manifest>").as_deref(),
            Some("m.json")
        );
    }

    #[test]
    fn attribute_order_is_irrelevant() {
        let html = r#"<link href="/app.webmanifest" crossorigin rel="manifest">"#;
        assert_eq!(manifest_href(html).as_deref(), Some("/app.webmanifest"));
    }

    #[test]
    fn missing_link_or_empty_href_is_none() {
        assert_eq!(manifest_href("<html><body></body></html>"), None);
        assert_eq!(manifest_href(r#"<link rel="manifest" href="">"#), None);
        assert_eq!(manifest_href(r#"<link rel="manifest">"#), None);
    }

    #[test]
    fn stylesheet_links_are_not_mistaken_for_the_manifest() {
        let html = r#"<link rel="stylesheet" href="style.css">"#;
        assert_eq!(manifest_href(html), None);
    }

    #[test]
    fn rewrites_only_the_manifest_link() {
        let html = concat!(
            r#"<link rel="stylesheet" href="style.css">"#,
            r#"<link rel="manifest" href="/manifest.webmanifest">"#,
        );
        let patched = set_manifest_href(html, "/assets/manifest-1a2b3c4d.webmanifest").unwrap();
        assert!(patched.contains(r#"href="/assets/manifest-1a2b3c4d.webmanifest""#));
        assert!(patched.contains(r#"href="style.css""#));
    }

    #[test]
    fn rewriting_preserves_surrounding_markup() {
        let html = "<head>\n  <link rel=\"manifest\" href=\"old.json\">\n</head>";
        let patched = set_manifest_href(html, "new.json").unwrap();
        assert_eq!(
            patched,
            "<head>\n  <link rel=\"manifest\" href=\"new.json\">\n</head>"
        );
    }

    #[test]
    fn link_without_href_gains_one() {
        let patched = set_manifest_href(r#"<link rel="manifest">"#, "/m.json").unwrap();
        assert_eq!(patched, r#"<link rel="manifest" href="/m.json">"#);

        let self_closing = set_manifest_href(r#"<link rel="manifest" />"#, "/m.json").unwrap();
        assert_eq!(self_closing, r#"<link rel="manifest" href="/m.json"/>"#);
    }

    #[test]
    fn documents_without_a_manifest_link_are_left_alone() {
        assert_eq!(set_manifest_href("<html></html>", "/m.json"), None);
    }
}

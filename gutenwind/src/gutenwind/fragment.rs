//! Substring and regex extraction over editor-produced HTML fragments.
//!
//! This is not an HTML parser. Every function matches the shortest span
//! between an opening tag and the next closing tag of the same name, so
//! nested same-name elements are not handled. Callers get `None` or an
//! empty value when nothing matches; nothing here panics on malformed input.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use regex::Regex;

static OPEN_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<([a-zA-Z][a-zA-Z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*?)\s*(/?)>"#)
        .expect("open tag regex")
});

static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([a-zA-Z_:@][-a-zA-Z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute regex")
});

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag regex"));

static CELL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<(td|th)(\s(?:[^>"']|"[^"]*"|'[^']*')*)?>(.*?)</(?:td|th)\s*>"#)
        .expect("table cell regex")
});

/// An opening tag: lowercased name and its raw attribute source.
#[derive(Clone, Debug, PartialEq)]
pub struct OpenTag<'a> {
    pub name: String,
    pub attrs: &'a str,
    pub self_closing: bool,
    pub start: usize,
    pub end: usize,
}

pub fn opening_tags(html: &str) -> impl Iterator<Item = OpenTag<'_>> {
    OPEN_TAG_RE.captures_iter(html).filter_map(|cap| {
        let whole = cap.get(0)?;
        Some(OpenTag {
            name: cap.get(1)?.as_str().to_ascii_lowercase(),
            attrs: cap.get(2).map(|m| m.as_str()).unwrap_or(""),
            self_closing: cap.get(3).is_some_and(|m| !m.as_str().is_empty()),
            start: whole.start(),
            end: whole.end(),
        })
    })
}

/// Attribute pairs of one tag's source, names lowercased, values entity-decoded.
/// Valueless attributes map to `""`.
pub fn parse_attributes(source: &str) -> Vec<(String, String)> {
    ATTR_RE
        .captures_iter(source)
        .filter_map(|cap| {
            let name = cap.get(1)?.as_str().to_ascii_lowercase();
            let value = cap
                .get(2)
                .or_else(|| cap.get(3))
                .or_else(|| cap.get(4))
                .map(|m| decode_html_entities(m.as_str()).into_owned())
                .unwrap_or_default();
            Some((name, value))
        })
        .collect()
}

pub fn attribute<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// Compiled `<tag ...>(inner)</tag>` patterns keyed by lowercased tag name.
static TAG_PATTERNS: Lazy<Mutex<HashMap<String, Regex>>> = Lazy::new(Default::default);

fn tag_pattern(tag: &str) -> Option<Regex> {
    let tag = tag.trim().to_ascii_lowercase();
    if tag.is_empty() {
        return None;
    }
    let mut patterns = TAG_PATTERNS.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(re) = patterns.get(&tag) {
        return Some(re.clone());
    }
    let name = regex::escape(&tag);
    let re = Regex::new(&format!(
        r#"(?is)<{name}(?:\s(?:[^>"']|"[^"]*"|'[^']*')*)?>(.*?)</{name}\s*>"#
    ))
    .ok()?;
    patterns.insert(tag, re.clone());
    Some(re)
}

/// Inner HTML of the first `<tag>...</tag>`.
pub fn extract_tag_content(html: &str, tag: &str) -> Option<String> {
    let re = tag_pattern(tag)?;
    re.captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Inner HTML of every non-overlapping `<tag>...</tag>`, in document order.
pub fn extract_all_tag_content(html: &str, tag: &str) -> Vec<String> {
    let Some(re) = tag_pattern(tag) else {
        return vec![];
    };
    re.captures_iter(html)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// The first `<tag ...>...</tag>` including the tag itself.
pub fn extract_outer_tag(html: &str, tag: &str) -> Option<String> {
    let re = tag_pattern(tag)?;
    re.find(html).map(|m| m.as_str().to_string())
}

/// Value of `attribute` on the `index`th opening tag that carries it.
///
/// With `tag`, only opening tags with that name count; `index` then selects
/// among those tags. Without it, every opening tag in the fragment counts.
pub fn extract_attribute_value(
    html: &str,
    tag: Option<&str>,
    attribute_name: &str,
    index: usize,
) -> Option<String> {
    let tag = tag.map(str::to_ascii_lowercase);
    let attribute_name = attribute_name.to_ascii_lowercase();
    opening_tags(html)
        .filter(|open| tag.as_deref().is_none_or(|t| open.name == t))
        .filter_map(|open| {
            let attrs = parse_attributes(open.attrs);
            attribute(&attrs, &attribute_name).map(str::to_string)
        })
        .nth(index)
}

/// Attribute of the fragment's outermost (first) opening tag only.
pub fn wrapper_attribute(html: &str, attribute_name: &str) -> Option<String> {
    let open = opening_tags(html).next()?;
    let attrs = parse_attributes(open.attrs);
    attribute(&attrs, &attribute_name.to_ascii_lowercase())
        .map(str::to_string)
        .filter(|v| !v.trim().is_empty())
}

pub fn wrapper_tag(html: &str) -> Option<String> {
    opening_tags(html).next().map(|open| open.name)
}

/// Remove the outer element, keeping its inner HTML. Fragments that are not
/// wrapped in a single element come back trimmed but otherwise unchanged.
pub fn strip_wrapper(html: &str) -> String {
    let trimmed = html.trim();
    let Some(open) = opening_tags(trimmed).next() else {
        return trimmed.to_string();
    };
    if open.start != 0 || open.self_closing {
        return trimmed.to_string();
    }
    let closing = format!("</{}>", open.name);
    let lower = trimmed.to_ascii_lowercase();
    if lower.ends_with(&closing) && trimmed.len() >= open.end + closing.len() {
        trimmed[open.end..trimmed.len() - closing.len()].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Text with every tag removed and entities decoded.
pub fn inner_text(html: &str) -> String {
    decode_html_entities(&TAG_RE.replace_all(html, "")).trim().to_string()
}

/// `<figure>` body without its caption, and the caption's inner HTML.
pub fn split_figure(html: &str) -> (String, Option<String>) {
    let body = extract_tag_content(html, "figure").unwrap_or_else(|| html.to_string());
    let caption = extract_tag_content(&body, "figcaption")
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    let without_caption = match extract_outer_tag(&body, "figcaption") {
        Some(outer) => body.replacen(&outer, "", 1),
        None => body,
    };
    (without_caption.trim().to_string(), caption)
}

/// Text of the first `<cite>`, looking at raw content fragments before the
/// joined inner HTML.
pub fn extract_cite_text(fragments: &[Option<String>], html: &str) -> Option<String> {
    let source = fragments
        .iter()
        .flatten()
        .find(|f| f.contains("<cite"))
        .map(String::as_str)
        .unwrap_or(html);
    extract_tag_content(source, "cite")
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableSectionKind {
    Head,
    Body,
    Foot,
}

impl TableSectionKind {
    pub fn tag(self) -> &'static str {
        match self {
            TableSectionKind::Head => "thead",
            TableSectionKind::Body => "tbody",
            TableSectionKind::Foot => "tfoot",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableCell {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableSection {
    pub kind: TableSectionKind,
    pub rows: Vec<Vec<TableCell>>,
}

/// Split a table fragment into head/body/foot sections of rows of cells.
/// Rows sitting directly in `<table>` without a `<tbody>` form the body.
pub fn extract_table_sections(html: &str) -> Vec<TableSection> {
    let mut sections = vec![];
    for kind in [TableSectionKind::Head, TableSectionKind::Body, TableSectionKind::Foot] {
        if let Some(inner) = extract_tag_content(html, kind.tag()) {
            sections.push(TableSection {
                kind,
                rows: extract_rows(&inner),
            });
        }
    }

    if !sections.iter().any(|s| s.kind == TableSectionKind::Body) {
        let table = extract_tag_content(html, "table").unwrap_or_default();
        let mut bare = table;
        for kind in [TableSectionKind::Head, TableSectionKind::Foot] {
            if let Some(outer) = extract_outer_tag(&bare, kind.tag()) {
                bare = bare.replacen(&outer, "", 1);
            }
        }
        let rows = extract_rows(&bare);
        if !rows.is_empty() {
            let at = sections
                .iter()
                .position(|s| s.kind == TableSectionKind::Foot)
                .unwrap_or(sections.len());
            sections.insert(
                at,
                TableSection {
                    kind: TableSectionKind::Body,
                    rows,
                },
            );
        }
    }
    sections
}

pub fn extract_rows(section: &str) -> Vec<Vec<TableCell>> {
    extract_all_tag_content(section, "tr")
        .iter()
        .map(|row| extract_cells(row))
        .collect()
}

pub fn extract_cells(row: &str) -> Vec<TableCell> {
    CELL_RE
        .captures_iter(row)
        .map(|cap| TableCell {
            tag: cap[1].to_ascii_lowercase(),
            attrs: parse_attributes(cap.get(2).map_or("", |m| m.as_str())),
            content: cap[3].trim().to_string(),
        })
        .collect()
}

/// Drop the named attributes from the first `<tag>` opening in `html`.
pub fn remove_attributes(html: &str, tag: &str, names: &[&str]) -> String {
    let Some(open) = opening_tags(html).find(|o| o.name == tag) else {
        return html.to_string();
    };
    let kept = ATTR_RE
        .find_iter(open.attrs)
        .filter(|m| {
            let name = m.as_str().split('=').next().unwrap_or("").trim();
            !names.iter().any(|n| n.eq_ignore_ascii_case(name))
        })
        .map(|m| m.as_str())
        .collect::<Vec<_>>();

    let mut rebuilt = format!("<{}", open.name);
    for attr in kept {
        rebuilt.push(' ');
        rebuilt.push_str(attr);
    }
    if open.self_closing {
        rebuilt.push_str(" /");
    }
    rebuilt.push('>');

    format!("{}{}{}", &html[..open.start], rebuilt, &html[open.end..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tag_content_is_shortest_match() {
        let html = "<p>one</p><p>two <em>x</em></p>";
        assert_eq!(extract_tag_content(html, "p").as_deref(), Some("one"));
        assert_eq!(extract_all_tag_content(html, "p"), vec!["one", "two <em>x</em>"]);
        assert_eq!(extract_tag_content(html, "h2"), None);
        assert_eq!(extract_tag_content("", "p"), None);
        assert_eq!(extract_tag_content("<p>unclosed", "p"), None);
    }

    #[test]
    fn tag_patterns_are_compiled_once_per_name() {
        let first = tag_pattern("figcaption").expect("pattern");
        let again = tag_pattern(" FIGCAPTION ").expect("pattern");
        assert_eq!(first.as_str(), again.as_str());
        assert!(
            TAG_PATTERNS
                .lock()
                .expect("tag pattern cache")
                .contains_key("figcaption")
        );
        assert!(tag_pattern("  ").is_none());
    }

    #[test]
    fn tag_names_do_not_match_prefixes() {
        let html = r#"<pre class="x">code</pre><p>para</p>"#;
        assert_eq!(extract_tag_content(html, "p").as_deref(), Some("para"));
    }

    #[test]
    fn attribute_occurrences() {
        let html = r#"<div id="outer" class="a"><img src="/one.png" /><img alt='' src="/two.png"></div>"#;
        assert_eq!(
            extract_attribute_value(html, Some("img"), "src", 1).as_deref(),
            Some("/two.png")
        );
        assert_eq!(
            extract_attribute_value(html, None, "id", 0).as_deref(),
            Some("outer")
        );
        assert_eq!(extract_attribute_value(html, Some("img"), "src", 5), None);
        assert_eq!(extract_attribute_value("<div", None, "id", 0), None);
        assert_eq!(wrapper_attribute(html, "class").as_deref(), Some("a"));
        assert_eq!(wrapper_tag(html).as_deref(), Some("div"));
    }

    #[test]
    fn attributes_decode_and_tolerate_odd_quoting() {
        let attrs = parse_attributes(r#" href="/a?x=1&amp;y=2" data-x=plain disabled title='it"s'"#);
        assert_eq!(attribute(&attrs, "href"), Some("/a?x=1&y=2"));
        assert_eq!(attribute(&attrs, "data-x"), Some("plain"));
        assert_eq!(attribute(&attrs, "disabled"), Some(""));
        assert_eq!(attribute(&attrs, "title"), Some("it\"s"));
    }

    #[test]
    fn strips_single_wrapper() {
        assert_eq!(strip_wrapper("<h2 class=\"x\">Hello <b>you</b></h2>"), "Hello <b>you</b>");
        assert_eq!(strip_wrapper("  plain text "), "plain text");
        assert_eq!(strip_wrapper("<br />"), "<br />");
    }

    #[test]
    fn text_and_attributes_decode_entities() {
        assert_eq!(inner_text("<p>Fish &amp; <b>chips</b></p>"), "Fish & chips");
        assert_eq!(
            inner_text("<p>Caf&eacute; &euro;5 &#39;d&#x27; &bogus;</p>"),
            "Caf\u{e9} \u{20ac}5 'd' &bogus;"
        );
        let attrs = parse_attributes(r#" title="na&iuml;ve &middot; ok""#);
        assert_eq!(attribute(&attrs, "title"), Some("na\u{ef}ve \u{b7} ok"));
    }

    #[test]
    fn figure_and_caption_split() {
        let (body, caption) = split_figure(
            r#"<figure class="wp-block-image"><img src="/a.jpg" alt="A"/><figcaption class="wp-element-caption">The <em>cap</em></figcaption></figure>"#,
        );
        assert_eq!(body, r#"<img src="/a.jpg" alt="A"/>"#);
        assert_eq!(caption.as_deref(), Some("The <em>cap</em>"));

        let (_, none) = split_figure("<figure><img src=\"x\"/></figure>");
        assert_eq!(none, None);
    }

    #[test]
    fn cite_prefers_fragments() {
        let fragments = vec![
            Some("<blockquote>".to_string()),
            None,
            Some("<cite> Ada </cite></blockquote>".to_string()),
        ];
        assert_eq!(extract_cite_text(&fragments, "").as_deref(), Some("Ada"));
        assert_eq!(
            extract_cite_text(&[], "<blockquote><p>x</p><cite>Bob</cite></blockquote>").as_deref(),
            Some("Bob")
        );
        assert_eq!(extract_cite_text(&[], "<cite>  </cite>"), None);
    }

    #[test]
    fn table_sections_rows_and_cells() {
        let html = r#"<figure class="wp-block-table"><table><thead><tr><th>Name</th><th class="has-text-align-right" data-align="right">Qty</th></tr></thead><tbody><tr><td>Apples</td><td>3</td></tr><tr><td>Pears</td><td>5</td></tr></tbody><tfoot><tr><td>Total</td><td>8</td></tr></tfoot></table></figure>"#;
        let sections = extract_table_sections(html);
        assert_eq!(
            sections.iter().map(|s| s.kind).collect::<Vec<_>>(),
            vec![TableSectionKind::Head, TableSectionKind::Body, TableSectionKind::Foot]
        );
        assert_eq!(sections[1].rows.len(), 2);
        let qty = &sections[0].rows[0][1];
        assert_eq!(qty.tag, "th");
        assert_eq!(attribute(&qty.attrs, "class"), Some("has-text-align-right"));
        assert_eq!(sections[2].rows[0][0].content, "Total");
    }

    #[test]
    fn bare_rows_become_the_body() {
        let sections = extract_table_sections("<table><tr><td>a</td></tr></table>");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, TableSectionKind::Body);
        assert!(extract_table_sections("<table></table>").is_empty());
        assert!(extract_table_sections("").is_empty());
    }

    #[test]
    fn removes_attributes_from_one_tag() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24"><path d="M0 0"></path></svg>"#;
        assert_eq!(
            remove_attributes(svg, "svg", &["width", "height"]),
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M0 0"></path></svg>"#
        );
        assert_eq!(remove_attributes("no tags", "svg", &["width"]), "no tags");
    }
}

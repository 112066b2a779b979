//! Inline HTML transformer.
//!
//! Rich-text fragments (paragraph bodies, captions, list items) are parsed
//! with `scraper` into a small element tree and every element is rebuilt
//! through the first [`InlineRule`] that claims its tag. Elements no rule
//! claims are dropped.

use log::warn;
use scraper::{ElementRef, Html};

use super::classes::normalize_tokens;
use super::fragment::attribute;
use super::node::{Element, Node};

/// Parsed inline markup before transformation.
#[derive(Clone, Debug, PartialEq)]
pub enum Fragment {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<Fragment>,
    },
    Text(String),
}

impl Fragment {
    fn is_blank_text(&self) -> bool {
        matches!(self, Fragment::Text(t) if t.trim().is_empty())
    }
}

/// Parse inline HTML as `<body>` content. Entities come back decoded,
/// comments are skipped and misnested markup is repaired the way a
/// browser would repair it.
pub fn parse_fragment(html: &str) -> Vec<Fragment> {
    let document = Html::parse_fragment(html);
    collect_children(document.root_element())
}

fn collect_children(parent: ElementRef<'_>) -> Vec<Fragment> {
    parent
        .children()
        .filter_map(|child| match ElementRef::wrap(child) {
            Some(element) => Some(Fragment::Element {
                tag: element.value().name().to_ascii_lowercase(),
                attrs: element
                    .value()
                    .attrs()
                    .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
                    .collect(),
                children: collect_children(element),
            }),
            None => child
                .value()
                .as_text()
                .map(|text| Fragment::Text(text.to_string())),
        })
        .collect()
}

/// Options threaded through one inline transformation.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineOptions {
    /// Warn about dropped tags even in release builds.
    pub diagnostics: bool,
}

type TransformFn = fn(&str, &[(String, String)], &[Fragment], InlineOptions) -> Option<Node>;

pub struct InlineRule {
    pub tags: &'static [&'static str],
    pub transform: TransformFn,
}

const INLINE_RULES: &[InlineRule] = &[
    InlineRule {
        tags: &["strong", "b", "em", "i", "s", "del", "sub"],
        transform: passthrough,
    },
    InlineRule {
        tags: &["a"],
        transform: hyperlink,
    },
    InlineRule {
        tags: &["code"],
        transform: inline_code,
    },
    InlineRule {
        tags: &["kbd"],
        transform: keyboard_key,
    },
    InlineRule {
        tags: &["mark"],
        transform: highlight,
    },
    InlineRule {
        tags: &["img"],
        transform: inline_image,
    },
    InlineRule {
        tags: &["sup"],
        transform: superscript,
    },
    InlineRule {
        tags: &["br"],
        transform: line_break,
    },
    InlineRule {
        tags: &["div", "span"],
        transform: styled_container,
    },
];

/// Transform an inline HTML fragment into output nodes.
pub fn render_inline(html: &str) -> Vec<Node> {
    render_inline_with(html, InlineOptions::default())
}

pub fn render_inline_with(html: &str, options: InlineOptions) -> Vec<Node> {
    if html.is_empty() {
        return vec![];
    }
    transform_all(&parse_fragment(html), options)
}

fn transform_all(fragments: &[Fragment], options: InlineOptions) -> Vec<Node> {
    fragments
        .iter()
        .filter_map(|fragment| transform(fragment, options))
        .collect()
}

fn transform(fragment: &Fragment, options: InlineOptions) -> Option<Node> {
    match fragment {
        Fragment::Text(text) => Some(Node::Text(text.clone())),
        Fragment::Element {
            tag,
            attrs,
            children,
        } => {
            let rule = INLINE_RULES.iter().find(|r| r.tags.contains(&tag.as_str()));
            match rule {
                Some(rule) => (rule.transform)(tag, attrs, children, options),
                None => {
                    if cfg!(debug_assertions) || options.diagnostics {
                        warn!("Dropping unhandled inline tag <{tag}>");
                    }
                    None
                }
            }
        }
    }
}

fn passthrough(
    tag: &str,
    _attrs: &[(String, String)],
    children: &[Fragment],
    options: InlineOptions,
) -> Option<Node> {
    Some(
        Element::new(tag)
            .children(transform_all(children, options))
            .into(),
    )
}

fn is_external(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn hyperlink(
    _tag: &str,
    attrs: &[(String, String)],
    children: &[Fragment],
    options: InlineOptions,
) -> Option<Node> {
    let href = attribute(attrs, "href")
        .filter(|h| !h.trim().is_empty())
        .unwrap_or("#");
    let mut link = Element::new("a")
        .id(attribute(attrs, "id").map(str::to_string))
        .class(normalize_tokens(attribute(attrs, "class").unwrap_or("")))
        .attr("href", href);

    match attribute(attrs, "target") {
        Some(target) => {
            link = link
                .attr("target", target)
                .attr_opt("rel", attribute(attrs, "rel"));
        }
        None if is_external(href) => {
            link = link
                .attr("target", "_blank")
                .attr("rel", "noopener noreferrer");
        }
        None => {}
    }

    Some(link.children(transform_all(children, options)).into())
}

fn inline_code(
    _tag: &str,
    _attrs: &[(String, String)],
    children: &[Fragment],
    options: InlineOptions,
) -> Option<Node> {
    Some(
        Element::new("code")
            .classes("inline-code")
            .children(transform_all(children, options))
            .into(),
    )
}

fn keyboard_key(
    _tag: &str,
    _attrs: &[(String, String)],
    children: &[Fragment],
    options: InlineOptions,
) -> Option<Node> {
    Some(
        Element::new("kbd")
            .classes("kbd")
            .children(transform_all(children, options))
            .into(),
    )
}

fn highlight(
    _tag: &str,
    attrs: &[(String, String)],
    children: &[Fragment],
    options: InlineOptions,
) -> Option<Node> {
    let text_only = children.iter().all(|c| match c {
        Fragment::Text(_) => true,
        Fragment::Element { tag, .. } => tag == "br",
    });
    if !text_only && (cfg!(debug_assertions) || options.diagnostics) {
        warn!("<mark> contains unexpected non-text nodes");
    }

    Some(
        Element::new("mark")
            .class(normalize_tokens(attribute(attrs, "class").unwrap_or("")))
            .styles(parse_style_string(attribute(attrs, "style").unwrap_or("")))
            .children(transform_all(children, options))
            .into(),
    )
}

fn inline_image(
    _tag: &str,
    attrs: &[(String, String)],
    _children: &[Fragment],
    _options: InlineOptions,
) -> Option<Node> {
    let src = attribute(attrs, "src").filter(|s| !s.trim().is_empty())?;
    let style = parse_style_string(attribute(attrs, "style").unwrap_or(""));
    let style = if style.is_empty() {
        vec![
            ("display".to_string(), "inline".to_string()),
            ("maxHeight".to_string(), "1em".to_string()),
            ("verticalAlign".to_string(), "middle".to_string()),
        ]
    } else {
        style
    };

    Some(
        Element::new("img")
            .classes("image-itself")
            .attr("src", src)
            .attr("alt", attribute(attrs, "alt").unwrap_or(""))
            .attr_opt("title", attribute(attrs, "title").filter(|t| !t.is_empty()))
            .attr_opt("width", attribute(attrs, "width"))
            .attr_opt("height", attribute(attrs, "height"))
            .styles(style)
            .into(),
    )
}

/// `<sup><a href="#fn1" id="fnref1">1</a></sup>` is a footnote reference.
fn superscript(
    tag: &str,
    attrs: &[(String, String)],
    children: &[Fragment],
    options: InlineOptions,
) -> Option<Node> {
    let significant: Vec<&Fragment> = children.iter().filter(|c| !c.is_blank_text()).collect();
    if let [Fragment::Element {
        tag: link_tag,
        attrs: link_attrs,
        children: link_children,
    }] = significant.as_slice()
    {
        if link_tag == "a" {
            let link = Element::new("a")
                .classes("footnote")
                .attr("href", attribute(link_attrs, "href").unwrap_or("#"))
                .attr_opt("id", attribute(link_attrs, "id"))
                .children(transform_all(link_children, options));
            return Some(Element::new("sup").child(link).into());
        }
    }
    passthrough(tag, attrs, children, options)
}

fn line_break(
    _tag: &str,
    _attrs: &[(String, String)],
    _children: &[Fragment],
    _options: InlineOptions,
) -> Option<Node> {
    Some(Element::new("br").into())
}

fn styled_container(
    tag: &str,
    attrs: &[(String, String)],
    children: &[Fragment],
    options: InlineOptions,
) -> Option<Node> {
    Some(
        Element::new(tag)
            .id(attribute(attrs, "id").map(str::to_string))
            .class(normalize_tokens(attribute(attrs, "class").unwrap_or("")))
            .styles(parse_style_string(attribute(attrs, "style").unwrap_or("")))
            .children(transform_all(children, options))
            .into(),
    )
}

/// Split `key: value; key: value` into pairs with camelCase keys.
/// Custom properties (`--x`) keep their name.
pub fn parse_style_string(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|rule| {
            let (key, value) = rule.split_once(':')?;
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                return None;
            }
            Some((camel_case_property(key), value.to_string()))
        })
        .collect()
}

fn camel_case_property(key: &str) -> String {
    if key.starts_with("--") {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}

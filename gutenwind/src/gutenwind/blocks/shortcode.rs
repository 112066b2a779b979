//! `core/shortcode`: the block's raw `[name key="value"]` text is parsed and
//! handed to a renderer registered for that shortcode name.

use std::collections::HashMap;

use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::gutenwind::node::{Element, Node};
use crate::gutenwind::types::Block;

use super::traits::{BlockProps, BlockRenderer};

static SHORTCODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\[([A-Za-z0-9_-]+)((?:\s[^\]]*)?)/?\]").expect("shortcode regex")
});

static SHORTCODE_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z0-9_-]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"']+))"#)
        .expect("shortcode attribute regex")
});

const PLACEHOLDER_CLASSES: &str =
    "border-dashed border-gray-300 dark:border-gray-600 rounded-lg p-4 shadow-sm w-full h-full";

#[derive(Clone, Debug, PartialEq)]
pub struct ParsedShortcode {
    pub name: String,
    pub attrs: Vec<(String, String)>,
}

impl ParsedShortcode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// `[contact-form-7 id="12" title="Contact"]` -> name and attributes.
pub fn parse_shortcode(raw: &str) -> Option<ParsedShortcode> {
    let raw = decode_html_entities(raw);
    let cap = SHORTCODE_RE.captures(&raw)?;
    let name = cap.get(1)?.as_str().to_ascii_lowercase();
    let attrs = cap
        .get(2)
        .map(|m| {
            SHORTCODE_ATTR_RE
                .captures_iter(m.as_str())
                .filter_map(|a| {
                    let value = a.get(2).or_else(|| a.get(3)).or_else(|| a.get(4))?;
                    Some((a[1].to_ascii_lowercase(), value.as_str().to_string()))
                })
                .collect()
        })
        .unwrap_or_default();
    Some(ParsedShortcode { name, attrs })
}

/// Renders one shortcode. `wrapper` carries the block's key, id and classes.
pub type ShortcodeFn = fn(&ParsedShortcode, Element) -> Node;

pub struct Shortcode {
    renderers: HashMap<String, ShortcodeFn>,
}

impl Default for Shortcode {
    fn default() -> Self {
        Self {
            renderers: HashMap::new(),
        }
        .with_shortcode("contact-form-7", contact_form_7)
    }
}

impl Shortcode {
    pub fn with_shortcode(mut self, name: &str, render: ShortcodeFn) -> Self {
        self.renderers.insert(name.to_string(), render);
        self
    }
}

impl BlockRenderer for Shortcode {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let raw = block
            .inner_content
            .first()
            .cloned()
            .flatten()
            .unwrap_or_else(|| block.inner_html.clone());

        let mut wrapper = props.element("div");
        if let Some(extra) = block.attr_str("class") {
            wrapper = wrapper.classes(extra);
        }
        let wrapper = wrapper.classes(PLACEHOLDER_CLASSES);

        let Some(shortcode) = parse_shortcode(&raw) else {
            return Some(wrapper.text("[Unrecognised or empty shortcode]").into());
        };
        match self.renderers.get(&shortcode.name) {
            Some(render) => Some(render(&shortcode, wrapper)),
            None => Some(
                wrapper
                    .text(format!("[Unrecognised shortcode: {}]", shortcode.name))
                    .into(),
            ),
        }
    }
}

fn form_group(class: &str, id: &str, label: &str, field: Element) -> Node {
    Element::new("div")
        .classes("form-group flex flex-col gap-2")
        .classes(class)
        .child(
            Element::new("label")
                .attr("for", id)
                .classes("pl-2 font-light text-base")
                .text(label),
        )
        .child(field.attr("id", id))
        .into()
}

fn text_input(kind: &str, placeholder: &str) -> Element {
    Element::new("input")
        .classes("bg-torchlight px-4 py-2 rounded-3xl")
        .attr("type", kind)
        .attr("placeholder", placeholder)
}

/// A static stand-in for a Contact Form 7 form.
fn contact_form_7(shortcode: &ParsedShortcode, wrapper: Element) -> Node {
    let mut form = Element::new("form").classes("contact-form grid grid-cols-2 gap-4 w-full");
    if let Some(key) = wrapper.key {
        form = form.key(key);
    }
    form.id(wrapper.id)
        .attr_opt("data-form-id", shortcode.attr("id"))
        .attr_opt("aria-label", shortcode.attr("title"))
        .child(form_group("col-span-2", "name", "Name", text_input("text", "Your name")))
        .child(form_group(
            "row-start-2",
            "email",
            "Email address",
            text_input("email", "Your email address"),
        ))
        .child(form_group(
            "row-start-2",
            "phone",
            "Phone Number",
            text_input("text", "Your phone number"),
        ))
        .child(form_group(
            "col-span-2",
            "message",
            "Message",
            Element::new("textarea")
                .classes("bg-torchlight px-3 py-3 rounded-xl")
                .attr("rows", "3")
                .attr("placeholder", "Your message"),
        ))
        .child(
            Element::new("div")
                .classes("form-group flex justify-center items-center gap-2 col-span-2")
                .child(
                    Element::new("button")
                        .classes("button-block")
                        .attr("type", "submit")
                        .text("Send me a message"),
                ),
        )
        .into()
}

//! Framework-neutral output tree.
//!
//! Renderers build [`Node`]s; a presentation layer decides what to do with
//! them. [`Node::to_html`] is the serialisation the page engine uses.

use serde::{Serialize, Serializer};

use super::classes::ClassList;

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Node {
    Element(Element),
    Text(String),
    /// Pre-trusted markup (editor-produced SVG) emitted verbatim.
    Raw(String),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Element {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "ClassList::is_empty")]
    pub class: ClassList,
    /// Inline style with camelCase property names.
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "pairs_as_map")]
    pub style: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "pairs_as_map")]
    pub attrs: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

fn pairs_as_map<S: Serializer>(pairs: &[(String, String)], s: S) -> Result<S::Ok, S::Error> {
    s.collect_map(pairs.iter().map(|(k, v)| (k, v)))
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn id(mut self, id: Option<String>) -> Self {
        self.id = id.filter(|s| !s.is_empty());
        self
    }

    pub fn class(mut self, class: ClassList) -> Self {
        self.class = class;
        self
    }

    pub fn classes(mut self, tokens: &str) -> Self {
        self.class.push(tokens);
        self
    }

    /// Set an attribute, replacing an earlier value for the same name.
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(existing) => existing.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
        self
    }

    pub fn attr_opt(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    pub fn style(mut self, property: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.style.iter_mut().find(|(k, _)| k == property) {
            Some(existing) => existing.1 = value,
            None => self.style.push((property.to_string(), value)),
        }
        self
    }

    pub fn styles(mut self, styles: Vec<(String, String)>) -> Self {
        for (property, value) in styles {
            self = self.style(&property, value);
        }
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_style(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Concatenated text of this subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Raw(_) => {}
            Node::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    /// Every element in this subtree, depth-first, parents before children.
    pub fn elements(&self) -> Vec<&Element> {
        let mut out = vec![];
        self.collect_elements(&mut out);
        out
    }

    fn collect_elements<'a>(&'a self, out: &mut Vec<&'a Element>) {
        if let Node::Element(el) = self {
            out.push(el);
            el.children.iter().for_each(|c| c.collect_elements(out));
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Raw(markup) => out.push_str(markup),
            Node::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                if let Some(id) = &el.id {
                    push_attribute(out, "id", id);
                }
                if !el.class.is_empty() {
                    push_attribute(out, "class", &el.class.to_string());
                }
                for (name, value) in &el.attrs {
                    push_attribute(out, name, value);
                }
                if !el.style.is_empty() {
                    let css = el
                        .style
                        .iter()
                        .map(|(k, v)| format!("{}: {}", css_property(k), v))
                        .collect::<Vec<_>>()
                        .join("; ");
                    push_attribute(out, "style", &css);
                }

                if VOID_TAGS.contains(&el.tag.as_str()) {
                    out.push_str(" />");
                    return;
                }

                out.push('>');
                for child in &el.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

pub fn render_html(nodes: &[Node]) -> String {
    nodes.iter().map(Node::to_html).collect()
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&html_escape(value));
    out.push('"');
}

/// camelCase style keys back to CSS property names; custom properties stay as written.
fn css_property(key: &str) -> String {
    if key.starts_with("--") {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

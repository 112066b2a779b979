use once_cell::sync::Lazy;
use regex::Regex;

use crate::gutenwind::fragment::{extract_tag_content, inner_text, strip_wrapper};
use crate::gutenwind::node::{Element, Node};
use crate::gutenwind::types::Block;

use super::traits::{BlockProps, BlockRenderer};

static BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break regex"));

/// Source text of a code fragment: breaks become newlines, markup goes.
pub fn code_text(html: &str) -> String {
    inner_text(&BREAK_RE.replace_all(html, "\n"))
}

/// `core/code`: `pre.hljs > code`, ready for a client-side highlighter.
pub struct Code;

impl BlockRenderer for Code {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let source = extract_tag_content(&block.inner_html, "code")
            .unwrap_or_else(|| strip_wrapper(&block.inner_html));
        let class = props.class_list().with("hljs");
        Some(
            Element::new("pre")
                .key(props.key)
                .id(props.id)
                .class(class)
                .child(Element::new("code").text(code_text(&source)))
                .into(),
        )
    }
}

pub struct Preformatted;

impl BlockRenderer for Preformatted {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let body = extract_tag_content(&block.inner_html, "pre")
            .unwrap_or_else(|| strip_wrapper(&block.inner_html));
        let class = props.class_list().with("whitespace-pre-wrap");
        Some(
            Element::new("pre")
                .key(props.key.clone())
                .id(props.id.clone())
                .class(class)
                .children(props.inline(&body))
                .into(),
        )
    }
}

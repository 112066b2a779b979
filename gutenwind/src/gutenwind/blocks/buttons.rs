use crate::gutenwind::classes::ClassList;
use crate::gutenwind::fragment::{extract_attribute_value, extract_tag_content, strip_wrapper};
use crate::gutenwind::node::{Element, Node};
use crate::gutenwind::tokens::arbitrary_value;
use crate::gutenwind::types::Block;

use super::traits::{BlockProps, BlockRenderer};

const DEFAULT_BACKGROUND: &str = "bg-[#32373c]";
const DEFAULT_TEXT: &str = "text-white";

pub struct Buttons;

impl BlockRenderer for Buttons {
    fn render(&self, _block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let class = props.class_list().with("flex flex-wrap gap-4");
        Some(
            Element::new("div")
                .key(props.key)
                .id(props.id)
                .class(class)
                .children(props.children)
                .into(),
        )
    }
}

/// `core/button`, rendered as the link itself.
pub struct Button;

impl BlockRenderer for Button {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let mut class = props.class_list();
        if !class.iter().any(|c| c.starts_with("bg-")) {
            class.push(DEFAULT_BACKGROUND);
        }
        if block.attr_str("textColor").is_none()
            && block.attr_path(&["style", "color", "text"]).is_none()
        {
            class.push(DEFAULT_TEXT);
        }
        class.push("text-center");
        if let Some(width) = block.attr("buttonWidth").and_then(arbitrary_value) {
            class.push(&format!("w-[{width}]"));
        }
        if let Some(height) = block.attr("buttonHeight").and_then(arbitrary_value) {
            class.push(&format!("h-[{height}]"));
        }

        let html = &block.inner_html;
        let label = extract_tag_content(html, "a").unwrap_or_else(|| strip_wrapper(html));
        let href = extract_attribute_value(html, Some("a"), "href", 0)
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| "#".to_string());

        Some(
            Element::new("a")
                .key(props.key.clone())
                .id(props.id.clone())
                .class(class)
                .attr("href", href)
                .attr_opt("target", extract_attribute_value(html, Some("a"), "target", 0))
                .attr_opt("rel", extract_attribute_value(html, Some("a"), "rel", 0))
                .children(props.inline(label.trim()))
                .into(),
        )
    }
}

/// Text span inside a third-party button block.
pub struct ButtonText;

impl BlockRenderer for ButtonText {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let mut class = ClassList::from("cb-button-text");
        class.extend(&props.classes);
        let text = extract_tag_content(&block.inner_html, "span")
            .unwrap_or_else(|| strip_wrapper(&block.inner_html));
        Some(
            Element::new("span")
                .key(props.key.clone())
                .id(props.id.clone())
                .class(class)
                .children(props.inline(text.trim()))
                .into(),
        )
    }
}

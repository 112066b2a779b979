use crate::gutenwind::fragment::extract_tag_content;
use crate::gutenwind::node::{Element, Node};
use crate::gutenwind::types::Block;

use super::traits::{BlockProps, BlockRenderer};

pub struct Details;

impl BlockRenderer for Details {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let summary = extract_tag_content(&block.inner_html, "summary")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let summary = match summary {
            Some(html) => props.inline(&html),
            None => vec![Node::Text("Details".to_string())],
        };

        let mut details = props.element("details");
        if block.attr_bool("showContent") {
            details = details.attr("open", "");
        }
        Some(
            details
                .child(Element::new("summary").children(summary))
                .children(props.children)
                .into(),
        )
    }
}

use crate::gutenwind::node::Node;
use crate::gutenwind::tokens::css_length;
use crate::gutenwind::types::Block;

use super::traits::{BlockProps, BlockRenderer};

pub struct Spacer;

impl BlockRenderer for Spacer {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let mut spacer = props.element("div").attr("aria-hidden", "true");
        if let Some(height) = block.attr("height").and_then(css_length) {
            spacer = spacer.classes(&format!("h-[{height}]"));
        }
        if let Some(width) = block.attr("width").and_then(css_length) {
            spacer = spacer.classes(&format!("w-[{width}]"));
        }
        Some(spacer.into())
    }
}

pub struct Separator;

impl BlockRenderer for Separator {
    fn render(&self, _block: &Block, props: BlockProps<'_>) -> Option<Node> {
        Some(props.element("hr").into())
    }
}

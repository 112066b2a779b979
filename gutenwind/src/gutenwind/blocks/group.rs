use crate::gutenwind::classes::ClassList;
use crate::gutenwind::node::{Element, Node};
use crate::gutenwind::types::Block;

use super::traits::{BlockProps, BlockRenderer};

/// Tag names a block's `tagName` attribute may choose.
const CONTAINER_TAGS: &[&str] = &[
    "div", "section", "article", "aside", "header", "footer", "main", "nav", "figure",
];

pub(crate) fn container_tag<'a>(block: &'a Block, default: &'a str) -> &'a str {
    block
        .attr_str("tagName")
        .filter(|tag| CONTAINER_TAGS.contains(tag))
        .unwrap_or(default)
}

/// The editor's group, row, stack and grid variations of `core/group`.
pub fn group_variation(block: &Block) -> &'static str {
    let kind = block.attr_path(&["layout", "type"]).and_then(|v| v.as_str());
    let orientation = block
        .attr_path(&["layout", "orientation"])
        .and_then(|v| v.as_str());
    match (kind, orientation) {
        (Some("flex"), Some("vertical")) => "stack-block",
        (Some("flex"), _) => "row-block",
        (Some("grid"), _) => "grid-block",
        _ => "group-block",
    }
}

pub struct Group;

impl BlockRenderer for Group {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let mut class = ClassList::from(group_variation(block));
        class.extend(&props.classes);

        Some(
            Element::new(container_tag(block, "div"))
                .key(props.key)
                .id(props.id)
                .class(class)
                .children(props.children)
                .into(),
        )
    }
}

use crate::gutenwind::classes::ClassList;
use crate::gutenwind::node::{Element, Node};
use crate::gutenwind::types::{Block, InheritedProps};

use super::group::container_tag;
use super::traits::{BlockProps, BlockRenderer};

const GRID_UNITS: usize = 12;

/// Span class for one of `count` equal columns on a 12-unit grid.
pub fn column_share(count: usize) -> String {
    let span = (GRID_UNITS / count.max(1)).max(1);
    format!("col-span-{span}")
}

pub struct Columns;

impl BlockRenderer for Columns {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let mut class = ClassList::from(props.block_class.as_str()).with("grid grid-cols-12");
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

    fn child_props(&self, block: &Block, _inherited: &InheritedProps) -> InheritedProps {
        let count = block.inner_blocks.iter().filter(|b| !b.is_blank()).count();
        InheritedProps {
            column_class: Some(column_share(count)),
        }
    }
}

/// A column takes its width from the parent's share, not its own attributes.
pub struct Column;

impl BlockRenderer for Column {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let mut class = props.class_list();
        if let Some(share) = &props.inherited.column_class {
            class.push(share);
        }

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

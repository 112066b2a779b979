use crate::gutenwind::classes::ClassList;
use crate::gutenwind::inline::{InlineOptions, render_inline_with};
use crate::gutenwind::node::{Element, Node};
use crate::gutenwind::types::{Block, InheritedProps, RenderContext};

/// Everything the dispatcher works out before a block renderer runs.
pub struct BlockProps<'a> {
    pub key: String,
    /// `heading-block`, `cover-block`, ...
    pub block_class: String,
    /// Normalized wrapper classes plus attribute-compiled classes.
    pub classes: ClassList,
    pub id: Option<String>,
    pub context: &'a RenderContext,
    /// Inner blocks, already rendered, in source order.
    pub children: Vec<Node>,
    pub inherited: &'a InheritedProps,
}

impl BlockProps<'_> {
    /// The block class followed by the computed classes.
    pub fn class_list(&self) -> ClassList {
        let mut list = ClassList::from(self.block_class.as_str());
        list.extend(&self.classes);
        list
    }

    /// Wrapper element carrying the block's key, id and classes.
    pub fn element(&self, tag: &str) -> Element {
        Element::new(tag)
            .key(self.key.clone())
            .id(self.id.clone())
            .class(self.class_list())
    }

    pub fn inline(&self, html: &str) -> Vec<Node> {
        render_inline_with(
            html,
            InlineOptions {
                diagnostics: self.context.diagnostics,
            },
        )
    }
}

pub trait BlockRenderer: Send + Sync {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node>;

    /// Context the block's inner blocks render with.
    fn child_context(&self, _block: &Block, context: &RenderContext) -> RenderContext {
        context.clone()
    }

    /// Props forwarded to direct children only.
    fn child_props(&self, _block: &Block, _inherited: &InheritedProps) -> InheritedProps {
        InheritedProps::default()
    }
}

use crate::gutenwind::classes::ClassList;
use crate::gutenwind::fragment::{extract_all_tag_content, extract_tag_content, strip_wrapper};
use crate::gutenwind::node::{Element, Node};
use crate::gutenwind::types::{Block, RenderContext};

use super::traits::{BlockProps, BlockRenderer};

fn item_classes(level: usize) -> ClassList {
    ClassList::from(format!("list-item list-item-level-{level}").as_str())
}

/// `core/list`. Items render one nesting level deeper than the list itself.
pub struct List;

impl BlockRenderer for List {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let ordered = block.attr_bool("ordered");
        let level = props.context.list_level + 1;
        let (tag, kind) = if ordered {
            ("ol", "list-ordered")
        } else {
            ("ul", "list-unordered")
        };

        let mut class = ClassList::from(props.block_class.as_str());
        class.push(&format!("level-{level} {kind}"));
        class.extend(&props.classes);

        let mut list = Element::new(tag)
            .key(props.key.clone())
            .id(props.id.clone())
            .class(class);
        if ordered {
            if let Some(start) = block.attr_f64("start").filter(|start| start.is_finite()) {
                list = list.attr("start", format!("{}", start as i64));
            }
            if block.attr_bool("reversed") {
                list = list.attr("reversed", "");
            }
        }

        // Lists saved before list items were blocks keep their items as markup.
        let items = if block.inner_blocks.is_empty() {
            let body = extract_tag_content(&block.inner_html, tag)
                .unwrap_or_else(|| strip_wrapper(&block.inner_html));
            extract_all_tag_content(&body, "li")
                .iter()
                .map(|item| {
                    Element::new("li")
                        .class(item_classes(level))
                        .children(props.inline(item.trim()))
                        .into()
                })
                .collect()
        } else {
            props.children
        };
        Some(list.children(items).into())
    }

    fn child_context(&self, _block: &Block, context: &RenderContext) -> RenderContext {
        context.nested_list()
    }
}

pub struct ListItem;

impl BlockRenderer for ListItem {
    fn render(&self, block: &Block, props: BlockProps<'_>) -> Option<Node> {
        let mut class = item_classes(props.context.list_level);
        class.extend(&props.classes);

        let body = extract_tag_content(&block.inner_html, "li")
            .unwrap_or_else(|| strip_wrapper(&block.inner_html));
        Some(
            Element::new("li")
                .key(props.key.clone())
                .id(props.id.clone())
                .class(class)
                .children(props.inline(body.trim()))
                .children(props.children)
                .into(),
        )
    }
}
